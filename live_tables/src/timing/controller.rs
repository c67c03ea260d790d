//! Pause state machine.

use super::{
    errors::{PauseError, PauseResult},
    timer::TurnTimer,
};
use crate::{
    net::{
        messages::{ClockUpdate, PauseCommand, PauseStatus},
        session::{ChatService, Session, TableNotifier},
    },
    table::{RegistryHandle, Seat, Table, TableError, TableId, TableState, UserId},
};
use std::{fmt, str::FromStr, sync::Arc};
use tokio::time::Instant;

/// Requested pause transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseSetting {
    Pause,
    Unpause,
    /// Pause automatically when it becomes the requester's turn
    PauseQueue,
    PauseUnqueue,
}

impl FromStr for PauseSetting {
    type Err = PauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pause" => Ok(PauseSetting::Pause),
            "unpause" => Ok(PauseSetting::Unpause),
            "pause-queue" => Ok(PauseSetting::PauseQueue),
            "pause-unqueue" => Ok(PauseSetting::PauseUnqueue),
            _ => Err(PauseError::InvalidSetting),
        }
    }
}

impl fmt::Display for PauseSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PauseSetting::Pause => write!(f, "pause"),
            PauseSetting::Unpause => write!(f, "unpause"),
            PauseSetting::PauseQueue => write!(f, "pause-queue"),
            PauseSetting::PauseUnqueue => write!(f, "pause-unqueue"),
        }
    }
}

/// Applies pause transitions and restarts turn timers on unpause
///
/// Every table-mutating operation has two entry points: one that enters the
/// table's exclusive section itself, and a `_locked` variant for callers that
/// already hold it.
pub struct PauseController {
    chat: Arc<dyn ChatService>,
    notifier: Arc<dyn TableNotifier>,
    pub(super) timer: TurnTimer,
}

impl PauseController {
    pub fn new(
        chat: Arc<dyn ChatService>,
        notifier: Arc<dyn TableNotifier>,
        timer: TurnTimer,
    ) -> Self {
        Self {
            chat,
            notifier,
            timer,
        }
    }

    /// Handle a pause command from the network layer
    ///
    /// Looks the table up in the registry, enters its exclusive section and
    /// applies the requested setting. Rejections are sent to the requester as
    /// a warning and returned.
    pub async fn command_pause(
        &self,
        session: &dyn Session,
        registry: &RegistryHandle,
        command: &PauseCommand,
    ) -> PauseResult<PauseSetting> {
        let table = match registry.lookup_table(command.table_id).await {
            Ok(Some(table)) => table,
            Ok(None) => return Err(reject(session, TableError::NotFound(command.table_id).into())),
            Err(e) => return Err(reject(session, e.into())),
        };

        self.set_pause(session, &table, &command.setting).await
    }

    /// Enter the table's exclusive section and apply `setting`
    pub async fn set_pause(
        &self,
        session: &dyn Session,
        table: &Arc<Table>,
        setting: &str,
    ) -> PauseResult<PauseSetting> {
        let mut state = table.lock().await;
        self.set_pause_locked(session, table, &mut state, setting)
    }

    /// Apply `setting` while the caller holds the table's exclusive section
    ///
    /// `state` must be the guarded state of `table`.
    pub fn set_pause_locked(
        &self,
        session: &dyn Session,
        table: &Arc<Table>,
        state: &mut TableState,
        setting: &str,
    ) -> PauseResult<PauseSetting> {
        match validate(table.id(), state, session.user_id(), setting) {
            Ok((seat, setting)) => {
                self.apply(table, state, seat, session.username(), setting, Instant::now());
                Ok(setting)
            }
            Err(e) => Err(reject(session, e)),
        }
    }

    /// Perform a validated transition for `seat`
    pub(super) fn apply(
        &self,
        table: &Arc<Table>,
        state: &mut TableState,
        seat: Seat,
        username: &str,
        setting: PauseSetting,
        now: Instant,
    ) {
        match setting {
            PauseSetting::PauseQueue => {
                state.players[seat].requested_pause = true;
                log::debug!("Table {}: {} queued a pause", table.id(), username);
                return;
            }
            PauseSetting::PauseUnqueue => {
                state.players[seat].requested_pause = false;
                log::debug!("Table {}: {} unqueued a pause", table.id(), username);
                return;
            }
            PauseSetting::Pause => {
                let game = &mut state.game;
                game.paused = true;
                game.pause_time = now;
                game.pause_count += 1;
                game.pause_player_index = seat;
            }
            PauseSetting::Unpause => {
                let game = &mut state.game;
                game.paused = false;

                // The turn clock is measured from its start, so shift the start
                // by the time spent paused
                game.datetime_turn_begin += now.saturating_duration_since(game.pause_time);

                self.notifier
                    .notify_time(&ClockUpdate::new(table.id(), state, now));

                // Timers scheduled before the pause carry an older pause count
                // and will discard themselves
                self.timer.schedule_turn(table, state);
            }
        }

        self.notifier
            .notify_pause(&PauseStatus::new(table.id(), state));

        let verb = if state.game.paused { "paused" } else { "unpaused" };
        self.chat.send_server_message(
            &format!("{} {} the game.", username, verb),
            &table.room_name(),
        );

        log::info!(
            "Table {}: {} {} the game (pause episode {})",
            table.id(),
            username,
            verb,
            state.game.pause_count
        );
    }
}

/// Deliver a rejection to the requester
fn reject(session: &dyn Session, error: PauseError) -> PauseError {
    session.warning(&error.to_string());
    error
}

/// Check every precondition for `setting`, returning the requester's seat and
/// the setting to apply
fn validate(
    table_id: TableId,
    state: &TableState,
    user_id: UserId,
    setting: &str,
) -> PauseResult<(Seat, PauseSetting)> {
    let parsed = setting.parse::<PauseSetting>();

    if !state.running {
        return Err(PauseError::NotStarted);
    }

    if state.replay {
        return Err(PauseError::Replay);
    }

    let seat = state
        .player_index(user_id)
        .ok_or(PauseError::NotSeated(table_id))?;

    if !state.options.timed {
        return Err(PauseError::NotTimed);
    }

    // Queuing is meaningless once it is already the requester's turn
    let setting = match parsed? {
        PauseSetting::PauseQueue if state.game.active_player_index == seat => PauseSetting::Pause,
        setting => setting,
    };

    let requested = state.players[seat].requested_pause;
    match setting {
        PauseSetting::Pause if state.game.paused => Err(PauseError::AlreadyPaused),
        PauseSetting::Unpause if !state.game.paused => Err(PauseError::NotPaused),
        PauseSetting::PauseQueue if requested => Err(PauseError::AlreadyRequested),
        PauseSetting::PauseUnqueue if !requested => Err(PauseError::NotRequested),
        setting => Ok((seat, setting)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableOptions;
    use std::time::Duration;

    fn running_state() -> TableState {
        let mut state = TableState::new(TableOptions::timed(
            Duration::from_secs(60),
            Duration::from_secs(10),
        ));
        state.seat_player(1, "alice");
        state.seat_player(2, "bob");
        state.running = true;
        state
    }

    #[test]
    fn test_setting_round_trips_through_str() {
        for setting in [
            PauseSetting::Pause,
            PauseSetting::Unpause,
            PauseSetting::PauseQueue,
            PauseSetting::PauseUnqueue,
        ] {
            assert_eq!(setting.to_string().parse::<PauseSetting>(), Ok(setting));
        }
        assert_eq!("resume".parse::<PauseSetting>(), Err(PauseError::InvalidSetting));
    }

    #[test]
    fn test_validate_precondition_order() {
        let mut state = running_state();
        state.running = false;
        assert_eq!(validate(1, &state, 1, "bogus"), Err(PauseError::NotStarted));

        state.running = true;
        state.replay = true;
        assert_eq!(validate(1, &state, 1, "pause"), Err(PauseError::Replay));

        state.replay = false;
        assert_eq!(validate(5, &state, 99, "pause"), Err(PauseError::NotSeated(5)));

        state.options.timed = false;
        assert_eq!(validate(1, &state, 1, "pause"), Err(PauseError::NotTimed));

        state.options.timed = true;
        assert_eq!(validate(1, &state, 1, "bogus"), Err(PauseError::InvalidSetting));
    }

    #[test]
    fn test_validate_queue_by_active_player_becomes_pause() {
        let state = running_state();
        assert_eq!(
            validate(1, &state, 1, "pause-queue"),
            Ok((0, PauseSetting::Pause))
        );
        assert_eq!(
            validate(1, &state, 2, "pause-queue"),
            Ok((1, PauseSetting::PauseQueue))
        );
    }

    #[test]
    fn test_validate_setting_already_in_effect() {
        let mut state = running_state();
        assert_eq!(validate(1, &state, 1, "unpause"), Err(PauseError::NotPaused));
        assert_eq!(
            validate(1, &state, 2, "pause-unqueue"),
            Err(PauseError::NotRequested)
        );

        state.game.paused = true;
        state.players[1].requested_pause = true;
        assert_eq!(validate(1, &state, 2, "pause"), Err(PauseError::AlreadyPaused));
        assert_eq!(
            validate(1, &state, 1, "pause-queue"),
            Err(PauseError::AlreadyPaused)
        );
        assert_eq!(
            validate(1, &state, 2, "pause-queue"),
            Err(PauseError::AlreadyRequested)
        );
    }
}
