//! Connection
//!
//! Owns the TCP socket to one server and moves whole lines across it.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply};

/// A single server connection
///
/// Nothing else reads or writes the socket; the client drives it strictly
/// one request line, then one reply line.
pub struct Connection {
    /// TCP stream reader (buffered for line reads)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered, flushed per command)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Resolve the configured address and connect to the first reachable
    /// candidate, honoring the connect timeout.
    pub fn open(config: &Config) -> Result<Self> {
        let addrs = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| ClientError::Connection(format!("cannot resolve {}: {}", config.addr(), e)))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, config.connect_timeout()) {
                Ok(stream) => {
                    return Self::from_stream(stream)
                        .and_then(|mut conn| {
                            conn.set_timeouts(config.read_timeout(), config.write_timeout())?;
                            Ok(conn)
                        })
                        .map_err(|e| {
                            ClientError::Connection(format!("failed to set up connection to {}: {}", addr, e))
                        });
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(ClientError::Connection(match last_err {
            Some(e) => format!("failed to connect to {}: {}", config.addr(), e),
            None => format!("no addresses found for {}", config.addr()),
        }))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Requests are tiny single lines; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Configure socket timeouts. Zero durations are rejected by the OS.
    pub fn set_timeouts(&mut self, read: Duration, write: Duration) -> Result<()> {
        self.reader.get_ref().set_read_timeout(Some(read))?;
        self.writer.get_ref().set_write_timeout(Some(write))?;
        Ok(())
    }

    /// A second handle on the socket, used to shut it down from another
    /// thread while a read is blocked
    pub fn interrupt_handle(&self) -> Result<TcpStream> {
        Ok(self.reader.get_ref().try_clone()?)
    }

    /// Send one command line
    pub fn send(&mut self, command: &Command) -> Result<()> {
        tracing::debug!("-> {} {}", self.peer_addr, command);
        write_command(&mut self.writer, command)
    }

    /// Block for the next reply line
    pub fn receive(&mut self) -> Result<Reply> {
        let reply = read_reply(&mut self.reader)?;
        tracing::trace!("<- {} {:?}", self.peer_addr, reply.raw());
        Ok(reply)
    }

    /// Send a command and wait for its reply
    pub fn round_trip(&mut self, command: &Command) -> Result<Reply> {
        self.send(command)?;
        self.receive()
    }

    /// Close both directions of the socket
    pub fn shutdown(self) {
        if let Err(e) = self.reader.get_ref().shutdown(std::net::Shutdown::Both) {
            // Already reset by the peer
            tracing::trace!("Shutdown of {} reported: {}", self.peer_addr, e);
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
