//! Table module providing the table registry and table model.
//!
//! This module implements:
//! - TableRegistry: single-writer actor owning every table and the
//!   user/table membership indices
//! - RegistryHandle: cloneable request/response front end for the registry
//! - Table: a game session guarded by its own exclusive section
//!
//! ## Architecture
//!
//! The registry runs in a separate Tokio task with an mpsc message inbox.
//! Requests carry a oneshot response slot, so callers simply await the
//! answer while the worker applies requests one at a time in arrival order.
//! Tables themselves are shared as `Arc<Table>`; mutating a table's game
//! state requires entering its exclusive section with [`Table::lock`].
//!
//! ## Example
//!
//! ```no_run
//! use live_tables::table::{RegistryConfig, TableRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = TableRegistry::spawn(RegistryConfig::default());
//!
//!     let table_id = registry.create_table("Alice's Game").await.unwrap();
//!     registry.join_playing(1, table_id).await.unwrap();
//!
//!     registry.shutdown().await;
//! }
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod messages;
pub mod registry;

pub use config::{MAX_CLOCK, RegistryConfig, TableOptions, is_valid_table_name};
pub use entities::{Game, Player, Seat, Table, TableId, TableState, UserId};
pub use errors::{TableError, TableResult};
pub use messages::{Membership, RegistryMessage, TableSummary};
pub use registry::{RegistryHandle, TableRegistry};
