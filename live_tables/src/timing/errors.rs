//! Pause and turn error types.
//!
//! Every variant is a rejected request: nothing was mutated, and the
//! display text is the warning shown to the requester.

use crate::table::{Seat, TableError, TableId};
use thiserror::Error;

/// Pause command and turn bookkeeping errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PauseError {
    /// Table lookup failed or the registry is closed
    #[error(transparent)]
    Registry(#[from] TableError),

    #[error("The game has not started yet.")]
    NotStarted,

    #[error("The game has already started.")]
    AlreadyStarted,

    #[error("You can not pause or unpause in a replay.")]
    Replay,

    #[error("You are not at table {0}, so you cannot pause / unpause.")]
    NotSeated(TableId),

    #[error("This is not a timed game, so you cannot pause / unpause.")]
    NotTimed,

    #[error("The game is already paused.")]
    AlreadyPaused,

    #[error("The game is not paused, so you cannot unpause.")]
    NotPaused,

    #[error("You have already requested a pause when it gets to your turn.")]
    AlreadyRequested,

    #[error("You have not requested a pause, so you cannot unqueue one.")]
    NotRequested,

    #[error("That is not a valid setting.")]
    InvalidSetting,

    #[error("There is no seat {0} at this table.")]
    InvalidSeat(Seat),
}

/// Result type for pause and turn operations
pub type PauseResult<T> = Result<T, PauseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_seated_message() {
        assert_eq!(
            PauseError::NotSeated(5).to_string(),
            "You are not at table 5, so you cannot pause / unpause."
        );
    }

    #[test]
    fn test_registry_errors_are_transparent() {
        let error: PauseError = TableError::NotFound(12).into();
        assert_eq!(error.to_string(), "Table 12 does not exist.");
    }
}
