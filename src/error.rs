//! Error types for the jsondb client
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    /// TCP resolve/connect failed or timed out
    #[error("Connection error: {0}")]
    Connection(String),

    /// The client was closed; construct a new one to reconnect
    #[error("Client is closed")]
    Closed,

    /// Peer closed the socket while a reply was expected
    #[error("Connection closed by server")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Authentication Errors
    // -------------------------------------------------------------------------
    #[error("Authentication required but SERVER_PASSWORD not configured")]
    AuthConfig,

    #[error("Authentication failed: {0}")]
    Auth(String),

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("Not connected")]
    NotConnected,

    #[error("Not authenticated with server")]
    NotAuthenticated,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation timed out")]
    Timeout,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Map an I/O error from an established socket, folding the platform
    /// specific timeout kinds into `Timeout`.
    pub(crate) fn from_socket(err: std::io::Error) -> Self {
        match err.kind() {
            // Unix reports read timeouts as WouldBlock, Windows as TimedOut
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => ClientError::Timeout,
            std::io::ErrorKind::UnexpectedEof => ClientError::ConnectionClosed,
            _ => ClientError::Io(err),
        }
    }
}
