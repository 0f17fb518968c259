//! Error types for the Fossil client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FossilError
pub type Result<T> = std::result::Result<T, FossilError>;

/// Unified error type for Fossil client operations
#[derive(Debug, Error)]
pub enum FossilError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Connection is unusable after a previous failure")]
    ConnectionPoisoned,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Malformed frame: total length {total_length} is below the 8 byte minimum")]
    MalformedFrame { total_length: u32 },

    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Invalid command tag: {0}")]
    InvalidCommand(String),

    // -------------------------------------------------------------------------
    // Message Errors
    // -------------------------------------------------------------------------
    #[error("{command} payload truncated: {len} bytes, need at least {required}")]
    TruncatedPayload {
        command: String,
        len: usize,
        required: usize,
    },

    #[error("Unknown request command: {0}")]
    UnknownRequest(String),

    #[error("Protocol mismatch during {stage}: unexpected {response} response")]
    ProtocolMismatch {
        stage: &'static str,
        response: String,
    },

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("Server error {code}: {message}")]
    Application { code: u32, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FossilError {
    /// Whether the connection that produced this error must be discarded.
    ///
    /// Only an explicit `ERR` from the server leaves the stream usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FossilError::Application { .. })
    }

    /// The server-supplied code and message, if this is an application error
    pub fn application_error(&self) -> Option<(u32, &str)> {
        match self {
            FossilError::Application { code, message } => Some((*code, message.as_str())),
            _ => None,
        }
    }
}
