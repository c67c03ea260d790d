//! Turn bookkeeping: starting the game and handing the turn to the next seat.

use super::{
    controller::{PauseController, PauseSetting},
    errors::{PauseError, PauseResult},
    timer::TimerOutcome,
};
use crate::table::{Seat, Table, TableState};
use std::sync::Arc;
use tokio::{task::JoinHandle, time::Instant};

impl PauseController {
    /// Enter the table's exclusive section and start the game
    pub async fn start_game(
        &self,
        table: &Arc<Table>,
        first_active: Seat,
    ) -> PauseResult<Option<JoinHandle<TimerOutcome>>> {
        let mut state = table.lock().await;
        self.start_game_locked(table, &mut state, first_active)
    }

    /// Start the game with `first_active` to move
    ///
    /// Every player's time bank is reset to the table's time base. Returns the
    /// turn timer, if one was scheduled.
    pub fn start_game_locked(
        &self,
        table: &Arc<Table>,
        state: &mut TableState,
        first_active: Seat,
    ) -> PauseResult<Option<JoinHandle<TimerOutcome>>> {
        if state.running {
            return Err(PauseError::AlreadyStarted);
        }
        if first_active >= state.players.len() {
            return Err(PauseError::InvalidSeat(first_active));
        }

        let time_base = state.options.time_base;
        for player in &mut state.players {
            player.time = time_base;
        }
        state.running = true;
        state.game.turn = 0;

        log::info!(
            "Table {}: game started with {} player(s)",
            table.id(),
            state.players.len()
        );

        Ok(self.enter_turn(table, state, first_active, Instant::now()))
    }

    /// Enter the table's exclusive section and pass the turn to `next_active`
    pub async fn begin_turn(
        &self,
        table: &Arc<Table>,
        next_active: Seat,
    ) -> PauseResult<Option<JoinHandle<TimerOutcome>>> {
        let mut state = table.lock().await;
        self.begin_turn_locked(table, &mut state, next_active)
    }

    /// End the current turn and pass it to `next_active`
    ///
    /// On timed tables the finishing player is charged the time they took and
    /// credited the per-turn bonus. Timers from the previous turn go stale
    /// because the turn number advances.
    pub fn begin_turn_locked(
        &self,
        table: &Arc<Table>,
        state: &mut TableState,
        next_active: Seat,
    ) -> PauseResult<Option<JoinHandle<TimerOutcome>>> {
        if !state.running {
            return Err(PauseError::NotStarted);
        }
        if next_active >= state.players.len() {
            return Err(PauseError::InvalidSeat(next_active));
        }

        let now = Instant::now();
        if state.options.timed {
            let taken = state.time_taken(now);
            let per_turn = state.options.time_per_turn;
            let finishing = state.game.active_player_index;
            if let Some(player) = state.players.get_mut(finishing) {
                player.time = player.time.saturating_sub(taken).saturating_add(per_turn);
            }
        }

        state.game.turn += 1;

        Ok(self.enter_turn(table, state, next_active, now))
    }

    fn enter_turn(
        &self,
        table: &Arc<Table>,
        state: &mut TableState,
        seat: Seat,
        now: Instant,
    ) -> Option<JoinHandle<TimerOutcome>> {
        state.game.active_player_index = seat;
        state.game.datetime_turn_begin = now;

        if state.game.paused {
            // Start the new turn's clock frozen; unpause shifts it forward
            state.game.pause_time = now;
        }

        let player = &mut state.players[seat];
        if player.requested_pause {
            player.requested_pause = false;
            let username = player.username.clone();

            if !state.game.paused {
                log::info!(
                    "Table {}: executing queued pause for {}",
                    table.id(),
                    username
                );
                self.apply(table, state, seat, &username, PauseSetting::Pause, now);
            }
        }

        self.timer.schedule_turn(table, state)
    }
}
