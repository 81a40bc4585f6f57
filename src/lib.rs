//! # jsondb-client
//!
//! A synchronous client for the jsondb key-value server:
//! - Line-delimited text protocol over one persistent TCP connection
//! - Password handshake when the server asks for it
//! - Typed values (strings, numbers, booleans, null, JSON objects/arrays)
//! - Per-key expiry (TTL)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Caller (CLI, application)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  KeyValueStore: set / get / del / ttl
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Client                               │
//! │        (state machine, handshake, single flight)            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │   Connection    │               │   Value Codec    │
//!   │ (TCP, framing)  │               │ (value <-> text) │
//!   └─────────────────┘               └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jsondb_client::{Client, Config, Value};
//!
//! let config = Config::builder().host("127.0.0.1").port(5555).password("secret").build();
//! let client = Client::connect_with(config)?;
//! client.set_with_ttl("session", Value::object([("user", "ada")]), 60)?;
//! assert_eq!(client.ttl("missing")?, -2);
//! client.close();
//! # Ok::<(), jsondb_client::ClientError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod protocol;
pub mod network;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::{Config, Environment};
pub use network::{Client, ClientState};
pub use protocol::TtlStatus;
pub use store::KeyValueStore;
pub use value::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
