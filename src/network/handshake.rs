//! Connection Handshake
//!
//! Brings a fresh stream to the point where it accepts application
//! requests:
//!
//! ```text
//! Disconnected ──connect──▶ SocketConnected ──VERSION──▶ VersionNegotiated ──USE──▶ DatabaseSelected
//!      │                          │                            │
//!      └──────────────────────────┴────────────────────────────┴──────▶ Failed
//! ```
//!
//! Each step runs once. The first failure ends the handshake; later steps
//! are never attempted.

use crate::config::ClientConfig;
use crate::error::{FossilError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::{Request, Response};

/// Stage name reported when the VERSION exchange goes wrong
pub const STAGE_VERSION: &str = "version negotiation";

/// Stage name reported when the USE exchange goes wrong
pub const STAGE_DATABASE: &str = "database selection";

/// Where a handshake currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    Disconnected,
    SocketConnected,
    VersionNegotiated,
    /// Terminal success
    DatabaseSelected,
    /// Terminal failure
    Failed {
        reason: String,
        /// Code and message when the server answered `ERR`
        server_error: Option<(u32, String)>,
    },
}

/// Drives a single connection attempt through the handshake
pub struct Handshake<'a, T: Transport> {
    transport: &'a T,
    config: ClientConfig,
    state: HandshakeState,
}

impl<'a, T: Transport> Handshake<'a, T> {
    /// Prepare a handshake using the version, database and frame limit in `config`
    ///
    /// The config is validated when the handshake runs.
    pub fn new(transport: &'a T, config: &ClientConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
            state: HandshakeState::Disconnected,
        }
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    /// Code and message of the `ERR` that failed the handshake, if any
    pub fn server_error(&self) -> Option<(u32, &str)> {
        match &self.state {
            HandshakeState::Failed {
                server_error: Some((code, message)),
                ..
            } => Some((*code, message.as_str())),
            _ => None,
        }
    }

    /// Run every step, returning a connection ready for application requests
    pub fn run(&mut self) -> Result<Connection<T::Stream>> {
        if self.state != HandshakeState::Disconnected {
            return Err(FossilError::Config(format!(
                "handshake already ran (state {:?})",
                self.state
            )));
        }

        match self.drive() {
            Ok(connection) => {
                tracing::debug!(
                    "Connected to {} (server {}, database {})",
                    self.transport.peer(),
                    connection.server_version().unwrap_or("?"),
                    self.config.database
                );
                Ok(connection)
            }
            Err(e) => {
                tracing::warn!("Handshake with {} failed: {}", self.transport.peer(), e);
                self.state = HandshakeState::Failed {
                    reason: e.to_string(),
                    server_error: e
                        .application_error()
                        .map(|(code, message)| (code, message.to_string())),
                };
                Err(e)
            }
        }
    }

    fn drive(&mut self) -> Result<Connection<T::Stream>> {
        self.config.validate()?;

        let mut connection = self.connect_socket()?;
        self.negotiate_version(&mut connection)?;
        self.select_database(&mut connection)?;
        Ok(connection)
    }

    /// Disconnected → SocketConnected
    fn connect_socket(&mut self) -> Result<Connection<T::Stream>> {
        let peer = self.transport.peer();
        tracing::debug!("Connecting to {}...", peer);

        let stream = self
            .transport
            .connect()
            .map_err(|source| FossilError::Connect {
                addr: peer.clone(),
                source,
            })?;

        self.state = HandshakeState::SocketConnected;
        Ok(Connection::new(stream, peer).with_max_frame_size(self.config.max_frame_size))
    }

    /// SocketConnected → VersionNegotiated
    fn negotiate_version(&mut self, connection: &mut Connection<T::Stream>) -> Result<()> {
        let request = Request::version(self.config.protocol_version.as_str());

        match connection.send(&request)? {
            Response::VersionAck { code, version } => {
                tracing::debug!(
                    "Server accepted version {} with {} (server version {})",
                    self.config.protocol_version, code, version
                );
                connection.set_server_version(version);
                self.state = HandshakeState::VersionNegotiated;
                Ok(())
            }
            Response::Err { code, message } => Err(FossilError::Application { code, message }),
            other => Err(FossilError::ProtocolMismatch {
                stage: STAGE_VERSION,
                response: other.kind(),
            }),
        }
    }

    /// VersionNegotiated → DatabaseSelected
    fn select_database(&mut self, connection: &mut Connection<T::Stream>) -> Result<()> {
        let request = Request::use_database(self.config.database.as_str());

        match connection.send(&request)? {
            Response::Ok { code, .. } => {
                tracing::debug!("Selected database {} ({})", self.config.database, code);
                connection.set_database(self.config.database.clone());
                self.state = HandshakeState::DatabaseSelected;
                Ok(())
            }
            Response::Err { code, message } => Err(FossilError::Application { code, message }),
            other => Err(FossilError::ProtocolMismatch {
                stage: STAGE_DATABASE,
                response: other.kind(),
            }),
        }
    }
}
