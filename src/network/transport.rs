//! Transport
//!
//! The byte stream the protocol runs over. The protocol only needs a
//! reliable, ordered, blocking stream; how it is obtained is up to the
//! `Transport` implementation.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;

/// Source of connected byte streams
pub trait Transport {
    /// Stream type produced by a successful connect
    type Stream: Read + Write;

    /// Open a new stream to the endpoint
    fn connect(&self) -> io::Result<Self::Stream>;

    /// Human readable endpoint, for logs and errors
    fn peer(&self) -> String;
}

/// TCP transport over `std::net`
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    nodelay: bool,
}

impl TcpTransport {
    /// Create a transport for `addr` with no timeouts
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            nodelay: true,
        }
    }

    /// Create a transport from the endpoint and socket options in `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            addr: config.server_addr.clone(),
            connect_timeout: millis(config.connect_timeout_ms),
            read_timeout: millis(config.read_timeout_ms),
            write_timeout: millis(config.write_timeout_ms),
            nodelay: config.nodelay,
        }
    }

    /// Try each resolved address in turn with a bounded connect
    fn connect_with_timeout(&self, timeout: Duration) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} did not resolve to any address", self.addr),
            )
        }))
    }
}

impl Transport for TcpTransport {
    type Stream = TcpStream;

    fn connect(&self) -> io::Result<TcpStream> {
        let stream = match self.connect_timeout {
            Some(timeout) => self.connect_with_timeout(timeout)?,
            None => TcpStream::connect(&self.addr)?,
        };

        // Requests are small and strictly request/response
        stream.set_nodelay(self.nodelay)?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_write_timeout(self.write_timeout)?;

        Ok(stream)
    }

    fn peer(&self) -> String {
        self.addr.clone()
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
