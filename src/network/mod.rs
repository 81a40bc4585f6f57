//! Network Module
//!
//! TCP connection handling and the protocol client.
//!
//! ## Architecture
//! - One `Connection` per `Client`, owning the socket
//! - Blocking I/O bounded by the configured timeouts
//! - One request in flight per client, serialized by a session lock

mod connection;
mod client;

pub use connection::Connection;
pub use client::{Client, ClientState, PING_KEY};
