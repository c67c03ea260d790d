//! Pause command input and notification payloads.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::table::{Seat, TableId, TableState};

/// A pause request as received from a client
///
/// `setting` is kept as the raw string so that unknown values reach
/// validation and produce a warning instead of a decode failure.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseCommand {
    #[serde(rename = "tableID")]
    pub table_id: TableId,
    pub setting: String,
}

impl PauseCommand {
    pub fn new(table_id: TableId, setting: impl Into<String>) -> Self {
        Self {
            table_id,
            setting: setting.into(),
        }
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// Clock values for every seat, sent after the clock jumps
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockUpdate {
    pub table_id: TableId,

    /// Remaining time bank per seat, in milliseconds
    pub times: Vec<u64>,
    pub active_player_index: Seat,

    /// Time the active player has used this turn, in milliseconds
    pub time_taken: u64,
}

impl ClockUpdate {
    pub fn new(table_id: TableId, state: &TableState, now: Instant) -> Self {
        Self {
            table_id,
            times: state
                .players
                .iter()
                .map(|p| p.time.as_millis() as u64)
                .collect(),
            active_player_index: state.game.active_player_index,
            time_taken: state.time_taken(now).as_millis() as u64,
        }
    }
}

/// Whether the game is paused and who paused it
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseStatus {
    pub table_id: TableId,
    pub active: bool,
    pub player_index: Seat,
}

impl PauseStatus {
    pub fn new(table_id: TableId, state: &TableState) -> Self {
        Self {
            table_id,
            active: state.game.paused,
            player_index: state.game.pause_player_index,
        }
    }
}
