//! Collaborator traits consumed by the pause controller.

use super::messages::{ClockUpdate, PauseStatus};
use crate::table::UserId;

/// A connected user issuing commands
pub trait Session: Send + Sync {
    fn user_id(&self) -> UserId;

    fn username(&self) -> &str;

    /// Deliver a warning to this user only
    fn warning(&self, message: &str);
}

/// Table-wide system chat
pub trait ChatService: Send + Sync {
    /// Send a server-authored chat line to everyone in `room`
    fn send_server_message(&self, message: &str, room: &str);
}

/// Table-wide notification dispatch
pub trait TableNotifier: Send + Sync {
    /// Send everyone at the table fresh clock values
    fn notify_time(&self, update: &ClockUpdate);

    /// Send everyone at the table the current pause status
    fn notify_pause(&self, status: &PauseStatus);
}
