//! Boundary between the table core and the network layer.
//!
//! The core never talks to sockets. It consumes a session abstraction and
//! table-wide broadcast services, and exchanges the serde payloads defined
//! in [`messages`].

pub mod broadcast;
pub mod messages;
pub mod session;
