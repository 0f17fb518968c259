//! Client
//!
//! The main entry point: a connection that has completed the handshake.

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::network::{Connection, Handshake, TcpTransport, Transport};
use crate::protocol::{Request, Response};

/// A connected, database-selected client
///
/// ## Usage
/// ```no_run
/// use fossil::{Client, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .server_addr("127.0.0.1:8001")
///     .database("logs")
///     .build();
///
/// let mut client = Client::connect(config)?;
/// let response = client.append("/", b"Sent Some Data From Rust!")?;
/// if let fossil::Response::Err { code, message } = response {
///     eprintln!("{} {}", code, message);
/// }
/// # Ok::<(), fossil::FossilError>(())
/// ```
pub struct Client<S = TcpStream> {
    connection: Connection<S>,
    config: ClientConfig,
}

impl Client<TcpStream> {
    /// Connect over TCP to `config.server_addr` and run the handshake
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = TcpTransport::from_config(&config);
        Self::connect_with(&transport, config)
    }
}

impl<S: Read + Write> Client<S> {
    /// Connect through a custom transport and run the handshake
    pub fn connect_with<T>(transport: &T, config: ClientConfig) -> Result<Self>
    where
        T: Transport<Stream = S>,
    {
        let connection = Handshake::new(transport, &config).run()?;
        Ok(Self { connection, config })
    }

    /// Send any request; an `ERR` reply is returned, not raised
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        self.connection.send(request)
    }

    /// Append a record to `topic`
    pub fn append(&mut self, topic: &str, data: &[u8]) -> Result<Response> {
        self.connection.append(topic, data)
    }

    /// Switch to another database on the same connection
    pub fn use_database(&mut self, name: &str) -> Result<Response> {
        self.connection.use_database(name)
    }

    /// Version reported by the server during the handshake
    pub fn server_version(&self) -> Option<&str> {
        self.connection.server_version()
    }

    /// Currently selected database
    pub fn database(&self) -> Option<&str> {
        self.connection.database()
    }

    pub fn is_usable(&self) -> bool {
        self.connection.is_usable()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn into_connection(self) -> Connection<S> {
        self.connection
    }
}
