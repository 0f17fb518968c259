//! Connection
//!
//! A single exclusively-owned stream to the server, carrying one request
//! at a time.

use std::io::{Read, Write};

use crate::error::{FossilError, Result};
use crate::protocol::{
    decode_response, encode_request, read_frame_with_limit, write_frame, Request, Response,
    MAX_FRAME_SIZE,
};

/// Whether a connection can still carry requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Framing is intact
    Ready,

    /// A round trip failed part way; the stream position is unknown
    Poisoned,
}

/// A connection to a Fossil server
///
/// Every I/O method takes `&mut self`, so a connection can never have more
/// than one request in flight.
pub struct Connection<S> {
    /// Underlying byte stream
    stream: S,

    /// Peer address for logging
    peer: String,

    /// Largest frame accepted from the server
    max_frame_size: u32,

    state: ConnectionState,

    /// Version reported by the server during the handshake
    server_version: Option<String>,

    /// Database most recently selected with USE
    database: Option<String>,
}

impl<S: Read + Write> Connection<S> {
    /// Wrap a connected stream
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            max_frame_size: MAX_FRAME_SIZE,
            state: ConnectionState::Ready,
            server_version: None,
            database: None,
        }
    }

    /// Override the largest frame accepted from the server
    pub fn with_max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Send a request and wait for its response
    ///
    /// An `ERR` reply is returned as `Ok(Response::Err { .. })`. Any other
    /// failure poisons the connection and every later call fails with
    /// `ConnectionPoisoned`.
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        if self.state == ConnectionState::Poisoned {
            return Err(FossilError::ConnectionPoisoned);
        }

        match self.round_trip(request) {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(
                    "Round trip to {} failed, discarding connection: {}",
                    self.peer, e
                );
                self.state = ConnectionState::Poisoned;
                Err(e)
            }
        }
    }

    fn round_trip(&mut self, request: &Request) -> Result<Response> {
        let frame = encode_request(request);
        write_frame(&mut self.stream, &frame)?;

        let reply = read_frame_with_limit(&mut self.stream, self.max_frame_size)?
            .ok_or(FossilError::ConnectionClosed)?;

        let response = decode_response(&reply)?;
        tracing::trace!(
            "{} -> {}: {}",
            frame.command,
            self.peer,
            response.kind()
        );
        Ok(response)
    }

    /// Append a record to `topic`
    pub fn append(&mut self, topic: &str, data: &[u8]) -> Result<Response> {
        self.send(&Request::append(topic, data))
    }

    /// Switch to another database
    ///
    /// The selection is remembered only if the server answers `OK`.
    pub fn use_database(&mut self, name: &str) -> Result<Response> {
        let response = self.send(&Request::use_database(name))?;
        if let Response::Ok { .. } = response {
            self.database = Some(name.to_string());
        }
        Ok(response)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_usable(&self) -> bool {
        self.state == ConnectionState::Ready
    }

    /// Get the peer address string
    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub(crate) fn set_server_version(&mut self, version: String) {
        self.server_version = Some(version);
    }

    pub(crate) fn set_database(&mut self, name: String) {
        self.database = Some(name);
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}
