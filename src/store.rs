//! Store capability
//!
//! The operations front-ends program against. `Client` is the one
//! implementation; binaries, benchmarks and tests take `&dyn KeyValueStore`
//! where they don't need anything client specific.

use crate::error::Result;
use crate::protocol::TTL_NO_EXPIRY;
use crate::value::Value;

/// A connected key-value store with expiry
pub trait KeyValueStore {
    /// Establish (and authenticate) the underlying connection
    fn connect(&self) -> Result<()>;

    /// Store without expiry
    fn set(&self, key: &str, value: Value) -> Result<bool> {
        self.set_with_ttl(key, value, TTL_NO_EXPIRY)
    }

    /// Store, expiring after `ttl_seconds` when positive
    fn set_with_ttl(&self, key: &str, value: Value, ttl_seconds: i64) -> Result<bool>;

    /// Fetch; `None` when absent
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Delete; true if something was removed
    fn del(&self, key: &str) -> Result<bool>;

    /// Remaining seconds, `-1` for no expiry, `-2` for absent
    fn ttl(&self, key: &str) -> Result<i64>;

    /// Release the connection
    fn close(&self);
}
