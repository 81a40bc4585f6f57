//! Command definitions
//!
//! Request lines sent to the server.

use std::fmt;

use crate::error::{ClientError, Result};

/// Command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Auth,
    Set,
    Expire,
    Get,
    Del,
    Ttl,
    Ping,
}

impl CommandType {
    /// The verb as written on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Auth => "AUTH",
            CommandType::Set => "SET",
            CommandType::Expire => "EXPIRE",
            CommandType::Get => "GET",
            CommandType::Del => "DEL",
            CommandType::Ttl => "TTL",
            CommandType::Ping => "PING",
        }
    }
}

/// A request, one line on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Answer an `AUTH_REQUIRED` probe
    Auth { password: String },

    /// Store an already encoded value
    Set { key: String, value: String },

    /// Attach an expiry in seconds
    Expire { key: String, seconds: i64 },

    /// Fetch a value by key
    Get { key: String },

    /// Delete a key
    Del { key: String },

    /// Remaining time-to-live of a key
    Ttl { key: String },

    /// Liveness probe
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Auth { .. } => CommandType::Auth,
            Command::Set { .. } => CommandType::Set,
            Command::Expire { .. } => CommandType::Expire,
            Command::Get { .. } => CommandType::Get,
            Command::Del { .. } => CommandType::Del,
            Command::Ttl { .. } => CommandType::Ttl,
            Command::Ping => CommandType::Ping,
        }
    }

    /// The request line without its terminator
    pub fn to_line(&self) -> String {
        let verb = self.command_type().as_str();
        match self {
            Command::Auth { password } => format!("{} {}", verb, password),
            Command::Set { key, value } => format!("{} {} {}", verb, key, value),
            Command::Expire { key, seconds } => format!("{} {} {}", verb, key, seconds),
            Command::Get { key } | Command::Del { key } | Command::Ttl { key } => {
                format!("{} {}", verb, key)
            }
            Command::Ping => verb.to_string(),
        }
    }
}

/// Log-safe rendering: the AUTH password is masked
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Auth { .. } => write!(f, "AUTH ****"),
            other => f.write_str(&other.to_line()),
        }
    }
}

/// Reject keys that would break the one-command-per-line framing.
///
/// The server splits requests on whitespace, so a key must be a single
/// non-empty token.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return Err(ClientError::InvalidKey(key.to_string()));
    }
    Ok(())
}
