//! Timing module providing the pause state machine and the turn timer.
//!
//! This module implements:
//! - PauseController: validates and applies pause, unpause, pause-queue and
//!   pause-unqueue requests under a table's exclusive section
//! - TurnTimer: per-turn watchdog fenced by `(turn, pause_count, active seat)`
//! - Turn bookkeeping: game start, turn hand-off, queued pause execution
//!
//! ## Example
//!
//! ```no_run
//! use live_tables::{
//!     net::{broadcast::{ChannelBroadcaster, ChannelSession}, messages::PauseCommand},
//!     table::{RegistryConfig, Table, TableOptions, TableRegistry, TableState},
//!     timing::{FencingToken, PauseController, TurnTimeoutHandler, TurnTimer},
//! };
//! use std::{sync::Arc, time::Duration};
//!
//! struct EndTurn;
//!
//! impl TurnTimeoutHandler for EndTurn {
//!     fn on_turn_timeout(&self, _table: &Table, _state: &mut TableState, _token: FencingToken) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = TableRegistry::spawn(RegistryConfig::default());
//!     let options = TableOptions::timed(Duration::from_secs(120), Duration::from_secs(20));
//!     let table_id = registry.create_table_with_options("Timed", options).await.unwrap();
//!
//!     let (broadcaster, _events) = ChannelBroadcaster::new(64);
//!     let broadcaster = Arc::new(broadcaster);
//!     let controller = PauseController::new(
//!         broadcaster.clone(),
//!         broadcaster,
//!         TurnTimer::new(Arc::new(EndTurn)),
//!     );
//!
//!     let (session, _warnings) = ChannelSession::new(1, "alice", 16);
//!     let command = PauseCommand::new(table_id, "pause");
//!     let _ = controller.command_pause(&session, &registry, &command).await;
//! }
//! ```

pub mod controller;
pub mod errors;
pub mod timer;
pub mod turn;

pub use controller::{PauseController, PauseSetting};
pub use errors::{PauseError, PauseResult};
pub use timer::{FencingToken, TimerOutcome, TurnTimeoutHandler, TurnTimer};
