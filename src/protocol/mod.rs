//! Protocol Module
//!
//! Defines the wire protocol spoken with the jsondb server.
//!
//! ## Protocol Format
//!
//! Human-readable text, one command per line and one reply per line:
//! ```text
//! client                         server
//!   |                              | AUTH_REQUIRED (or any greeting)
//!   | AUTH <password>              |
//!   |                              | OK
//!   | SET <key> <encoded-value>    |
//!   |                              | OK
//!   | EXPIRE <key> <seconds>       |
//!   |                              | OK
//!   | GET <key>                    |
//!   |                              | <encoded-value> | nil
//!   | DEL <key>                    |
//!   |                              | 1 | 0
//!   | TTL <key>                    |
//!   |                              | <seconds> | -1 | nil
//!   | PING                         |
//!   |                              | PONG
//! ```

mod command;
mod response;
mod codec;

pub use command::{validate_key, Command, CommandType};
pub use response::{
    Reply, TtlStatus, AUTH_REQUIRED, DELETED, NIL, OK, TTL_MISSING, TTL_NO_EXPIRY,
};
pub use codec::{
    decode_tagged, decode_value, encode_command, encode_value, read_reply, write_command,
    Decoded, MAX_LINE_SIZE,
};
