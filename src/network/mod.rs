//! Network Module
//!
//! Transports, connections and the startup handshake.
//!
//! ## Model
//! - Blocking I/O, one thread per connection
//! - Strictly half-duplex: one request in flight per connection
//! - A failed round trip poisons the connection; reconnect from scratch

mod transport;
mod connection;
mod handshake;

pub use transport::{TcpTransport, Transport};
pub use connection::{Connection, ConnectionState};
pub use handshake::{Handshake, HandshakeState, STAGE_DATABASE, STAGE_VERSION};
