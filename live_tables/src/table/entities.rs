//! Table, game and player models.

use super::config::TableOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

/// Table ID type
pub type TableId = u64;

/// User ID type
pub type UserId = i64;

/// Index of a seat at a table
pub type Seat = usize;

/// A seated player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub user_id: UserId,
    pub username: String,
    pub seat: Seat,

    /// Pause automatically once it becomes this player's turn
    pub requested_pause: bool,

    /// Remaining time bank
    pub time: Duration,
}

/// Pause and clock bookkeeping for a running game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub paused: bool,
    pub pause_time: Instant,

    /// Number of pause episodes so far; never decreases
    pub pause_count: u64,
    pub pause_player_index: Seat,
    pub datetime_turn_begin: Instant,
    pub active_player_index: Seat,
    pub turn: u64,
}

impl Game {
    fn new(now: Instant) -> Self {
        Self {
            paused: false,
            pause_time: now,
            pause_count: 0,
            pause_player_index: 0,
            datetime_turn_begin: now,
            active_player_index: 0,
            turn: 0,
        }
    }
}

/// Everything guarded by a table's exclusive section
#[derive(Debug)]
pub struct TableState {
    pub options: TableOptions,
    pub game: Game,

    /// Players ordered by seat
    pub players: Vec<Player>,
    pub running: bool,
    pub replay: bool,
}

impl TableState {
    pub fn new(options: TableOptions) -> Self {
        Self {
            options,
            game: Game::new(Instant::now()),
            players: Vec::new(),
            running: false,
            replay: false,
        }
    }

    /// Seat a user in the next free seat, returning their seat
    ///
    /// Users that are already seated keep their seat.
    pub fn seat_player(&mut self, user_id: UserId, username: impl Into<String>) -> Seat {
        if let Some(seat) = self.player_index(user_id) {
            return seat;
        }

        let seat = self.players.len();
        self.players.push(Player {
            user_id,
            username: username.into(),
            seat,
            requested_pause: false,
            time: self.options.time_base,
        });
        seat
    }

    /// Seat of the given user, if they are playing at this table
    pub fn player_index(&self, user_id: UserId) -> Option<Seat> {
        self.players.iter().position(|p| p.user_id == user_id)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.players.get(self.game.active_player_index)
    }

    /// Time the active player has used on the current turn
    ///
    /// While paused the clock is frozen at the moment the pause began.
    pub fn time_taken(&self, now: Instant) -> Duration {
        let until = if self.game.paused {
            self.game.pause_time
        } else {
            now
        };
        until.saturating_duration_since(self.game.datetime_turn_begin)
    }

    /// Instant at which the active player runs out of time
    ///
    /// `None` if no player is active or the deadline is not representable.
    pub fn turn_deadline(&self) -> Option<Instant> {
        self.active_player()
            .and_then(|p| self.game.datetime_turn_begin.checked_add(p.time))
    }
}

/// A live or replay game session
#[derive(Debug)]
pub struct Table {
    id: TableId,
    name: String,

    /// Set by the registry once the table is evicted
    removed: AtomicBool,

    state: Mutex<TableState>,
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, options: TableOptions) -> Self {
        Self {
            id,
            name: name.into(),
            removed: AtomicBool::new(false),
            state: Mutex::new(TableState::new(options)),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chat room shared by everyone at the table
    pub fn room_name(&self) -> String {
        format!("table{}", self.id)
    }

    /// Enter the table's exclusive section
    ///
    /// The section is released when the guard is dropped.
    pub async fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().await
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_state() -> TableState {
        TableState::new(TableOptions::timed(
            Duration::from_secs(60),
            Duration::from_secs(10),
        ))
    }

    #[test]
    fn test_seat_player_assigns_in_order() {
        let mut state = timed_state();
        assert_eq!(state.seat_player(10, "alice"), 0);
        assert_eq!(state.seat_player(20, "bob"), 1);
        assert_eq!(state.players[1].username, "bob");
        assert_eq!(state.players[1].time, Duration::from_secs(60));
    }

    #[test]
    fn test_seat_player_is_idempotent() {
        let mut state = timed_state();
        state.seat_player(10, "alice");
        assert_eq!(state.seat_player(10, "alice"), 0);
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn test_player_index_missing() {
        let state = timed_state();
        assert_eq!(state.player_index(99), None);
        assert!(state.active_player().is_none());
        assert!(state.turn_deadline().is_none());
    }

    #[test]
    fn test_turn_deadline_uses_active_time_bank() {
        let mut state = timed_state();
        state.seat_player(10, "alice");
        state.seat_player(20, "bob");
        state.players[1].time = Duration::from_secs(5);
        state.game.active_player_index = 1;

        let deadline = state.turn_deadline().unwrap();
        assert_eq!(
            deadline.duration_since(state.game.datetime_turn_begin),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_turn_deadline_overflow_is_none() {
        let mut state = timed_state();
        state.seat_player(10, "alice");
        state.players[0].time = Duration::from_secs(u64::MAX);

        assert!(state.turn_deadline().is_none());
    }

    #[test]
    fn test_time_taken_frozen_while_paused() {
        let mut state = timed_state();
        let begin = state.game.datetime_turn_begin;
        state.game.paused = true;
        state.game.pause_time = begin + Duration::from_secs(3);

        let later = begin + Duration::from_secs(30);
        assert_eq!(state.time_taken(later), Duration::from_secs(3));

        state.game.paused = false;
        assert_eq!(state.time_taken(later), Duration::from_secs(30));
    }

    #[test]
    fn test_table_removed_flag() {
        let table = Table::new(7, "Seven", TableOptions::default());
        assert_eq!(table.room_name(), "table7");
        assert!(!table.is_removed());
        table.mark_removed();
        assert!(table.is_removed());
    }
}
