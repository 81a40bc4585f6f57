//! Protocol Client
//!
//! Connection lifecycle, the AUTH handshake and the store commands.
//!
//! ## State Machine
//! ```text
//! Unconnected --connect--> Connected --handshake--> Ready
//!      |                       |                      |
//!      +-------- I/O error, handshake failure, close -+--> Closed
//! ```
//! Commands only run in `Ready`. `Closed` is terminal: build a new client to
//! reconnect.

use std::net::{Shutdown, TcpStream};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::protocol::{
    decode_value, encode_value, validate_key, Command, Reply, TtlStatus, TTL_NO_EXPIRY,
};
use crate::store::KeyValueStore;
use crate::value::Value;
use super::Connection;

/// Key literal that `get` turns into a liveness probe
pub const PING_KEY: &str = "PING";

/// Lifecycle state of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Never connected
    Unconnected,
    /// TCP established, handshake not finished
    Connected,
    /// Authenticated; commands allowed
    Ready,
    /// Torn down after close or an error
    Closed,
}

/// Socket plus the state that must change together with it
struct Session {
    state: ClientState,
    conn: Option<Connection>,
    greeting: Option<String>,
}

impl Session {
    /// The connection, if commands may be issued
    fn ready(&mut self) -> Result<&mut Connection> {
        match self.state {
            ClientState::Ready => self.conn.as_mut().ok_or(ClientError::NotConnected),
            ClientState::Connected => Err(ClientError::NotAuthenticated),
            ClientState::Unconnected | ClientState::Closed => Err(ClientError::NotConnected),
        }
    }

    /// One round trip; any failure tears the connection down
    fn exchange(&mut self, command: &Command) -> Result<Reply> {
        let result = self.ready()?.round_trip(command);
        if let Err(ref e) = result {
            tracing::warn!("{} failed, closing connection: {}", command.command_type().as_str(), e);
            self.teardown();
        }
        result
    }

    fn teardown(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Closing connection to {}", conn.peer_addr());
            conn.shutdown();
        }
        self.state = ClientState::Closed;
    }
}

/// Synchronous client for one server connection
///
/// All operations take `&self`; the session lock is held for a whole
/// exchange, so a client shared between threads still has at most one
/// request in flight. `close` does not wait for that lock: it shuts the
/// socket down through `interrupt` first, failing any blocked exchange.
pub struct Client {
    config: Config,
    session: Mutex<Session>,
    interrupt: Mutex<Option<TcpStream>>,
}

impl Client {
    /// Create an unconnected client
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: Mutex::new(Session {
                state: ClientState::Unconnected,
                conn: None,
                greeting: None,
            }),
            interrupt: Mutex::new(None),
        }
    }

    /// Create a client and connect it
    pub fn connect_with(config: Config) -> Result<Self> {
        let client = Self::new(config);
        client.connect()?;
        Ok(client)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ClientState {
        self.session.lock().state
    }

    /// TCP connection is up (handshake may still be pending)
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), ClientState::Connected | ClientState::Ready)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == ClientState::Ready
    }

    /// First line of a server that did not ask for AUTH
    pub fn greeting(&self) -> Option<String> {
        self.session.lock().greeting.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect and authenticate
    ///
    /// All-or-nothing: on any failure the socket is closed and the client is
    /// left `Closed`. A no-op when already `Ready`.
    pub fn connect(&self) -> Result<()> {
        let mut session = self.session.lock();
        match session.state {
            ClientState::Ready => return Ok(()),
            ClientState::Closed => return Err(ClientError::Closed),
            ClientState::Unconnected | ClientState::Connected => {}
        }

        tracing::debug!("Connecting to {}", self.config.addr());
        let conn = match Connection::open(&self.config) {
            Ok(conn) => conn,
            Err(e) => {
                session.state = ClientState::Closed;
                return Err(e);
            }
        };
        let interrupt = match conn.interrupt_handle() {
            Ok(handle) => handle,
            Err(e) => {
                conn.shutdown();
                session.state = ClientState::Closed;
                return Err(ClientError::Connection(format!("failed to set up connection: {}", e)));
            }
        };
        *self.interrupt.lock() = Some(interrupt);
        session.conn = Some(conn);
        session.state = ClientState::Connected;

        if let Err(e) = self.handshake(&mut session) {
            tracing::warn!("Handshake with {} failed: {}", self.config.addr(), e);
            session.teardown();
            self.interrupt.lock().take();
            return Err(e);
        }

        session.state = ClientState::Ready;
        tracing::info!("Connected to {}", self.config.addr());
        Ok(())
    }

    /// Answer the server's opening line
    ///
    /// `AUTH_REQUIRED` is answered with the configured password. Any other
    /// line means no authentication is needed; it is consumed and kept as the
    /// greeting.
    fn handshake(&self, session: &mut Session) -> Result<()> {
        let conn = session.conn.as_mut().ok_or(ClientError::NotConnected)?;
        let probe = conn.receive()?;

        if !probe.is_auth_required() {
            // If the server meant this line as something else, the stream is
            // now one reply ahead of us.
            tracing::warn!(
                "Server opened with {:?} instead of AUTH_REQUIRED; assuming no authentication",
                probe.text()
            );
            session.greeting = Some(probe.into_string());
            return Ok(());
        }

        let password = self.config.password().ok_or(ClientError::AuthConfig)?;
        tracing::debug!("Attempting authentication");
        let reply = conn.round_trip(&Command::Auth {
            password: password.to_string(),
        })?;

        if !reply.contains_ok() {
            return Err(ClientError::Auth(reply.text().to_string()));
        }
        Ok(())
    }

    /// Close the connection. Safe to call repeatedly or before `connect`.
    ///
    /// An exchange blocked in another thread is cancelled: the socket is shut
    /// down before the session lock is taken, so that exchange fails and
    /// releases it.
    pub fn close(&self) {
        let handle = self.interrupt.lock().take();
        if let Some(stream) = handle {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                tracing::trace!("Interrupting socket reported: {}", e);
            }
        }

        let mut session = self.session.lock();
        match session.state {
            ClientState::Connected | ClientState::Ready => session.teardown(),
            ClientState::Unconnected | ClientState::Closed => {}
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Store a value without expiry. Returns whether the server acknowledged.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        self.set_with_ttl(key, value, TTL_NO_EXPIRY)
    }

    /// Store a value and, when `ttl_seconds > 0`, attach an expiry.
    ///
    /// The expiry is only sent if the store succeeded; the result is then the
    /// EXPIRE acknowledgement.
    pub fn set_with_ttl(&self, key: &str, value: impl Into<Value>, ttl_seconds: i64) -> Result<bool> {
        validate_key(key)?;
        let value = encode_value(&value.into());

        let mut session = self.session.lock();
        let reply = session.exchange(&Command::Set {
            key: key.to_string(),
            value,
        })?;
        if !reply.is_ok() {
            tracing::debug!("SET {} rejected: {:?}", key, reply.text());
            return Ok(false);
        }

        if ttl_seconds > 0 {
            let reply = session.exchange(&Command::Expire {
                key: key.to_string(),
                seconds: ttl_seconds,
            })?;
            return Ok(reply.is_ok());
        }
        Ok(true)
    }

    /// Fetch and decode a value; `None` when the key does not exist.
    ///
    /// The key `PING` is a liveness probe: the reply comes back verbatim as a
    /// string, never decoded.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        if key == PING_KEY {
            return self.ping().map(|pong| Some(Value::String(pong)));
        }
        validate_key(key)?;

        let reply = self.session.lock().exchange(&Command::Get {
            key: key.to_string(),
        })?;
        Ok(decode_value(reply.text()))
    }

    /// Delete a key. True only if the server removed it.
    pub fn del(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let reply = self.session.lock().exchange(&Command::Del {
            key: key.to_string(),
        })?;
        Ok(reply.is_deleted())
    }

    /// Remaining TTL in seconds: `-1` no expiry, `-2` no such key
    pub fn ttl(&self, key: &str) -> Result<i64> {
        validate_key(key)?;
        let reply = self.session.lock().exchange(&Command::Ttl {
            key: key.to_string(),
        })?;
        reply.ttl_seconds()
    }

    /// Typed view of [`Client::ttl`]
    pub fn ttl_status(&self, key: &str) -> Result<TtlStatus> {
        self.ttl(key).map(TtlStatus::from_seconds)
    }

    /// Liveness probe; returns the server's reply text (normally `PONG`)
    pub fn ping(&self) -> Result<String> {
        let reply = self.session.lock().exchange(&Command::Ping)?;
        Ok(reply.text().to_string())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

impl KeyValueStore for Client {
    fn connect(&self) -> Result<()> {
        Client::connect(self)
    }

    fn set_with_ttl(&self, key: &str, value: Value, ttl_seconds: i64) -> Result<bool> {
        Client::set_with_ttl(self, key, value, ttl_seconds)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Client::get(self, key)
    }

    fn del(&self, key: &str) -> Result<bool> {
        Client::del(self, key)
    }

    fn ttl(&self, key: &str) -> Result<i64> {
        Client::ttl(self, key)
    }

    fn close(&self) {
        Client::close(self)
    }
}
