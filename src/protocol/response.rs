//! Reply definitions
//!
//! Interpretation of reply lines received from the server.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Probe line sent by servers that require a password
pub const AUTH_REQUIRED: &str = "AUTH_REQUIRED";

/// Success acknowledgement for SET, EXPIRE and AUTH
pub const OK: &str = "OK";

/// Sentinel for a missing key
pub const NIL: &str = "nil";

/// Reply to a DEL that removed a key
pub const DELETED: &str = "1";

/// TTL of a key that does not exist
pub const TTL_MISSING: i64 = -2;

/// TTL of a key that never expires
pub const TTL_NO_EXPIRY: i64 = -1;

/// A single reply line, terminator already stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    line: String,
}

impl Reply {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// The line as received
    pub fn raw(&self) -> &str {
        &self.line
    }

    /// The line with surrounding whitespace removed
    pub fn text(&self) -> &str {
        self.line.trim()
    }

    pub fn into_string(self) -> String {
        self.line
    }

    /// `OK` exactly (after trimming)
    pub fn is_ok(&self) -> bool {
        self.text() == OK
    }

    /// Looser check used for AUTH: the server may decorate its acknowledgement
    pub fn contains_ok(&self) -> bool {
        self.line.contains(OK)
    }

    pub fn is_auth_required(&self) -> bool {
        self.text() == AUTH_REQUIRED
    }

    pub fn is_nil(&self) -> bool {
        self.text() == NIL
    }

    /// DEL result: `1` removed, anything else means nothing was removed
    pub fn is_deleted(&self) -> bool {
        self.text() == DELETED
    }

    /// TTL result in seconds; `nil` maps to [`TTL_MISSING`]
    pub fn ttl_seconds(&self) -> Result<i64> {
        if self.is_nil() {
            return Ok(TTL_MISSING);
        }
        self.text()
            .parse::<i64>()
            .map_err(|_| ClientError::Protocol(format!("invalid TTL reply: {:?}", self.text())))
    }
}

/// TTL state of a key, mirroring the raw integer convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// Key is missing or already expired
    Missing,
    /// Key exists without expiration
    NoExpiry,
    /// Key expires after the provided duration
    ExpiresIn(Duration),
}

impl TtlStatus {
    /// Interpret a raw TTL. Negative values other than `-1` mean the key is gone.
    pub fn from_seconds(seconds: i64) -> Self {
        match seconds {
            TTL_NO_EXPIRY => TtlStatus::NoExpiry,
            s if s < 0 => TtlStatus::Missing,
            s => TtlStatus::ExpiresIn(Duration::from_secs(s as u64)),
        }
    }
}
