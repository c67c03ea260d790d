//! Channel-backed broadcast and session implementations.

use super::{
    messages::{ClockUpdate, PauseStatus},
    session::{ChatService, Session, TableNotifier},
};
use crate::table::UserId;
use tokio::sync::mpsc;

/// Outbound event produced by the table core
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Broadcast {
    /// Server-authored chat line for a room
    Chat { room: String, message: String },
    Clock(ClockUpdate),
    Pause(PauseStatus),
}

/// Try to queue an outbound message, dropping it if the receiver lags
fn forward<T>(sender: &mpsc::Sender<T>, message: T, target: &str) {
    match sender.try_send(message) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            log::warn!("{} channel full, dropping message", target);
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            log::debug!("{} disconnected, dropping message", target);
        }
    }
}

/// Chat and notification dispatch over a bounded mpsc channel
///
/// The network layer drains the receiver and fans events out to clients.
#[derive(Clone, Debug)]
pub struct ChannelBroadcaster {
    sender: mpsc::Sender<Broadcast>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Broadcast>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl ChatService for ChannelBroadcaster {
    fn send_server_message(&self, message: &str, room: &str) {
        forward(
            &self.sender,
            Broadcast::Chat {
                room: room.to_string(),
                message: message.to_string(),
            },
            "Broadcast",
        );
    }
}

impl TableNotifier for ChannelBroadcaster {
    fn notify_time(&self, update: &ClockUpdate) {
        forward(&self.sender, Broadcast::Clock(update.clone()), "Broadcast");
    }

    fn notify_pause(&self, status: &PauseStatus) {
        forward(&self.sender, Broadcast::Pause(status.clone()), "Broadcast");
    }
}

/// Session whose warnings are written to a bounded mpsc channel
#[derive(Clone, Debug)]
pub struct ChannelSession {
    user_id: UserId,
    username: String,
    warnings: mpsc::Sender<String>,
}

impl ChannelSession {
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (warnings, receiver) = mpsc::channel(capacity.max(1));
        let session = Self {
            user_id,
            username: username.into(),
            warnings,
        };
        (session, receiver)
    }
}

impl Session for ChannelSession {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn warning(&self, message: &str) {
        forward(&self.warnings, message.to_string(), "Session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_is_forwarded() {
        let (broadcaster, mut rx) = ChannelBroadcaster::new(4);
        broadcaster.send_server_message("alice paused the game.", "table1");

        assert_eq!(
            rx.try_recv().unwrap(),
            Broadcast::Chat {
                room: "table1".to_string(),
                message: "alice paused the game.".to_string(),
            }
        );
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (broadcaster, mut rx) = ChannelBroadcaster::new(1);
        broadcaster.send_server_message("first", "table1");
        broadcaster.send_server_message("second", "table1");

        assert!(matches!(rx.try_recv(), Ok(Broadcast::Chat { message, .. }) if message == "first"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (session, rx) = ChannelSession::new(1, "alice", 4);
        drop(rx);
        session.warning("nobody is listening");
    }

    #[test]
    fn test_session_warning() {
        let (session, mut rx) = ChannelSession::new(7, "bob", 4);
        assert_eq!(session.user_id(), 7);
        assert_eq!(session.username(), "bob");

        session.warning("The game is already paused.");
        assert_eq!(rx.try_recv().unwrap(), "The game is already paused.");
    }
}
