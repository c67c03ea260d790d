//! Turn timer watchdog.
//!
//! A timer is never cancelled. Instead it carries the fencing token that was
//! current when it was scheduled and, once its deadline passes, re-reads the
//! live game under the table's exclusive section. Any mismatch means the turn
//! moved on, a new pause episode started, or the active seat changed, and the
//! timer exits quietly. The next unpause or turn start schedules a fresh one.

use crate::table::{Game, Seat, Table, TableState};
use std::{fmt, sync::Arc};
use tokio::{
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Snapshot of `(turn, pause_count, active_player_index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FencingToken {
    pub turn: u64,
    pub pause_count: u64,
    pub active_player_index: Seat,
}

impl FencingToken {
    pub fn capture(game: &Game) -> Self {
        Self {
            turn: game.turn,
            pause_count: game.pause_count,
            active_player_index: game.active_player_index,
        }
    }

    /// Whether the game is still in the turn and pause episode this token names
    pub fn is_current(&self, game: &Game) -> bool {
        *self == Self::capture(game)
    }
}

impl fmt::Display for FencingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turn {} / pause {} / seat {}",
            self.turn, self.pause_count, self.active_player_index
        )
    }
}

/// Forced-move effect applied when the active player runs out of time
pub trait TurnTimeoutHandler: Send + Sync {
    /// Called at most once per token, with the table's exclusive section held
    fn on_turn_timeout(&self, table: &Table, state: &mut TableState, token: FencingToken);
}

/// What a timer did when its deadline passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The token was current; the timeout handler ran
    Fired,
    /// The turn, pause episode or active seat changed, or the game is paused
    Stale,
    /// The table was removed from the registry
    Removed,
}

/// Schedules fenced turn deadlines
#[derive(Clone)]
pub struct TurnTimer {
    handler: Arc<dyn TurnTimeoutHandler>,
}

impl fmt::Debug for TurnTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnTimer").finish_non_exhaustive()
    }
}

impl TurnTimer {
    pub fn new(handler: Arc<dyn TurnTimeoutHandler>) -> Self {
        Self { handler }
    }

    /// Schedule a timer for the active player's current deadline
    ///
    /// Returns `None` for untimed, stopped or paused games. Must be called
    /// from within a Tokio runtime.
    pub fn schedule_turn(
        &self,
        table: &Arc<Table>,
        state: &TableState,
    ) -> Option<JoinHandle<TimerOutcome>> {
        if !state.options.timed || !state.running || state.game.paused {
            return None;
        }

        let deadline = state.turn_deadline()?;
        let token = FencingToken::capture(&state.game);
        Some(self.schedule(Arc::clone(table), token, deadline))
    }

    /// Spawn a timer that checks `token` once `deadline` has passed
    pub fn schedule(
        &self,
        table: Arc<Table>,
        token: FencingToken,
        deadline: Instant,
    ) -> JoinHandle<TimerOutcome> {
        log::debug!(
            "Table {}: timer scheduled for {} in {:?}",
            table.id(),
            token,
            deadline.saturating_duration_since(Instant::now())
        );

        let timer = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut state = table.lock().await;
            timer.check(&table, &mut state, token)
        })
    }

    /// Compare `token` against the live game and fire if it still matches
    ///
    /// The caller must hold the table's exclusive section.
    pub fn check(&self, table: &Table, state: &mut TableState, token: FencingToken) -> TimerOutcome {
        if table.is_removed() {
            log::debug!("Table {}: timer for {} discarded, table removed", table.id(), token);
            return TimerOutcome::Removed;
        }

        if !token.is_current(&state.game) || state.game.paused {
            log::debug!("Table {}: stale timer for {} discarded", table.id(), token);
            return TimerOutcome::Stale;
        }

        log::info!(
            "Table {}: seat {} ran out of time on turn {}",
            table.id(),
            token.active_player_index,
            token.turn
        );
        self.handler.on_turn_timeout(table, state, token);

        TimerOutcome::Fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableOptions;
    use std::sync::Mutex;
    use tokio::time::Duration;

    #[derive(Default)]
    struct Recorder {
        fired: Mutex<Vec<FencingToken>>,
    }

    impl TurnTimeoutHandler for Recorder {
        fn on_turn_timeout(&self, _table: &Table, _state: &mut TableState, token: FencingToken) {
            self.fired.lock().unwrap().push(token);
        }
    }

    fn timed_table() -> Table {
        Table::new(
            1,
            "Timed",
            TableOptions::timed(Duration::from_secs(30), Duration::from_secs(5)),
        )
    }

    #[test]
    fn test_token_detects_each_component() {
        let mut state = TableState::new(TableOptions::default());
        let token = FencingToken::capture(&state.game);
        assert!(token.is_current(&state.game));

        state.game.turn += 1;
        assert!(!token.is_current(&state.game));
        state.game.turn -= 1;

        state.game.pause_count += 1;
        assert!(!token.is_current(&state.game));
        state.game.pause_count -= 1;

        state.game.active_player_index = 1;
        assert!(!token.is_current(&state.game));
    }

    #[test]
    fn test_token_display() {
        let token = FencingToken {
            turn: 3,
            pause_count: 1,
            active_player_index: 2,
        };
        assert_eq!(token.to_string(), "turn 3 / pause 1 / seat 2");
    }

    #[tokio::test]
    async fn test_check_fires_on_current_token() {
        let recorder = Arc::new(Recorder::default());
        let timer = TurnTimer::new(recorder.clone());
        let table = timed_table();
        let mut state = table.lock().await;

        let token = FencingToken::capture(&state.game);
        assert_eq!(timer.check(&table, &mut state, token), TimerOutcome::Fired);
        assert_eq!(*recorder.fired.lock().unwrap(), vec![token]);
    }

    #[tokio::test]
    async fn test_check_discards_stale_and_paused() {
        let recorder = Arc::new(Recorder::default());
        let timer = TurnTimer::new(recorder.clone());
        let table = timed_table();
        let mut state = table.lock().await;

        let stale = FencingToken::capture(&state.game);
        state.game.turn += 1;
        assert_eq!(timer.check(&table, &mut state, stale), TimerOutcome::Stale);

        state.game.paused = true;
        let current = FencingToken::capture(&state.game);
        assert_eq!(timer.check(&table, &mut state, current), TimerOutcome::Stale);

        assert!(recorder.fired.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_discards_removed_table() {
        let recorder = Arc::new(Recorder::default());
        let timer = TurnTimer::new(recorder.clone());
        let table = timed_table();
        table.mark_removed();
        let mut state = table.lock().await;

        let token = FencingToken::capture(&state.game);
        assert_eq!(timer.check(&table, &mut state, token), TimerOutcome::Removed);
        assert!(recorder.fired.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_turn_skips_untimed_and_stopped() {
        let timer = TurnTimer::new(Arc::new(Recorder::default()));

        let untimed = Arc::new(Table::new(1, "Untimed", TableOptions::default()));
        {
            let mut state = untimed.lock().await;
            state.seat_player(1, "alice");
            state.running = true;
            assert!(timer.schedule_turn(&untimed, &state).is_none());
        }

        let timed = Arc::new(timed_table());
        let mut state = timed.lock().await;
        state.seat_player(1, "alice");
        assert!(timer.schedule_turn(&timed, &state).is_none());

        state.running = true;
        state.game.paused = true;
        assert!(timer.schedule_turn(&timed, &state).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_timer_fires_after_deadline() {
        let recorder = Arc::new(Recorder::default());
        let timer = TurnTimer::new(recorder.clone());
        let table = Arc::new(timed_table());

        let handle = {
            let mut state = table.lock().await;
            state.seat_player(1, "alice");
            state.running = true;
            state.game.datetime_turn_begin = Instant::now();
            timer.schedule_turn(&table, &state).unwrap()
        };

        let start = Instant::now();
        assert_eq!(handle.await.unwrap(), TimerOutcome::Fired);
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert_eq!(recorder.fired.lock().unwrap().len(), 1);
    }
}
