//! # Live Tables
//!
//! Concurrency core for live multiplayer game tables.
//!
//! The crate owns two problems that are easy to get wrong when many command
//! handlers run at once:
//!
//! - **Table registry**: a single-writer actor owns the table map and the
//!   user/table membership indices. Callers submit requests and await a
//!   response; nothing else mutates those maps.
//! - **Pause and turn clock**: each table has its own exclusive section.
//!   The pause controller validates and applies pause transitions under it,
//!   and turn timers are fenced by `(turn, pause_count, active seat)` so that a
//!   timer from an earlier turn or pause episode never fires.
//!
//! ## Core Modules
//!
//! - [`table`]: registry, table model and configuration
//! - [`timing`]: pause state machine, turn timer and turn bookkeeping
//! - [`net`]: collaborator traits and wire payloads for the network layer
//!
//! ## Example
//!
//! ```
//! use live_tables::table::{RegistryConfig, TableRegistry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = TableRegistry::spawn(RegistryConfig::default());
//! assert_eq!(registry.create_table("Alice's Game").await, Ok(1));
//! registry.shutdown().await;
//! # }
//! ```

/// Boundary types shared with the network layer.
pub mod net;

/// Table registry and table model.
pub mod table;
pub use table::{RegistryConfig, RegistryHandle, Table, TableError, TableId, TableRegistry, UserId};

/// Pause state machine and turn timer.
pub mod timing;
pub use timing::{FencingToken, PauseController, PauseError, PauseSetting, TurnTimer};
