//! Frame definitions
//!
//! A frame is the unit of data on the wire: a little-endian length prefix,
//! a fixed-width command tag and a payload whose size is implied by the
//! length.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FossilError, Result};

/// Width of the command tag in bytes
pub const COMMAND_LEN: usize = 8;

/// Width of the length prefix in bytes
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Smallest legal `total_length`: a bare command tag with no payload
pub const MIN_FRAME_LENGTH: u32 = COMMAND_LEN as u32;

/// Default upper bound on `total_length` accepted from a peer (16 MB)
pub const MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Largest payload whose `total_length` still fits the 4-byte prefix
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize - COMMAND_LEN;

// =============================================================================
// Command Tag
// =============================================================================

/// An 8-byte, zero-padded ASCII command tag.
///
/// Tags are compared over all eight bytes, so a tag that fills the whole
/// field (and therefore carries no terminator) still compares correctly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandTag([u8; COMMAND_LEN]);

impl CommandTag {
    pub const VERSION: CommandTag = CommandTag::from_static("VERSION");
    pub const USE: CommandTag = CommandTag::from_static("USE");
    pub const APPEND: CommandTag = CommandTag::from_static("APPEND");
    pub const OK: CommandTag = CommandTag::from_static("OK");
    pub const ERR: CommandTag = CommandTag::from_static("ERR");

    /// Build a tag from a compile-time string, panicking (at compile time
    /// when used in a const) if it does not fit.
    pub const fn from_static(tag: &str) -> Self {
        let bytes = tag.as_bytes();
        assert!(bytes.len() <= COMMAND_LEN, "command tag longer than 8 bytes");

        let mut padded = [0u8; COMMAND_LEN];
        let mut i = 0;
        while i < bytes.len() {
            padded[i] = bytes[i];
            i += 1;
        }
        Self(padded)
    }

    /// Build a tag from a runtime string
    pub fn new(tag: &str) -> Result<Self> {
        let bytes = tag.as_bytes();
        if bytes.len() > COMMAND_LEN {
            return Err(FossilError::InvalidCommand(format!(
                "{:?} is {} bytes (max {})",
                tag,
                bytes.len(),
                COMMAND_LEN
            )));
        }
        if !bytes.iter().all(|b| b.is_ascii() && *b != 0) {
            return Err(FossilError::InvalidCommand(format!(
                "{:?} must be non-NUL ASCII",
                tag
            )));
        }

        let mut padded = [0u8; COMMAND_LEN];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(padded))
    }

    /// Wrap the raw bytes of a tag read off the wire
    pub fn from_bytes(bytes: [u8; COMMAND_LEN]) -> Self {
        Self(bytes)
    }

    /// The full padded tag as it appears on the wire
    pub fn as_bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.0
    }

    /// The tag text with trailing padding removed
    pub fn name(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandTag({:?})", self.name())
    }
}

// =============================================================================
// Frame
// =============================================================================

/// A single frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command tag
    pub command: CommandTag,

    /// Payload bytes, bounded by the frame length
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame from a tag and payload
    pub fn new(command: CommandTag, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Value of the length prefix for this frame (command + payload)
    ///
    /// Saturates at `u32::MAX` for payloads above `MAX_PAYLOAD_LEN`; such
    /// frames cannot be encoded.
    pub fn total_length(&self) -> u32 {
        u32::try_from(COMMAND_LEN + self.payload.len()).unwrap_or(u32::MAX)
    }

    /// Serialize the frame to its exact wire representation
    ///
    /// Format: total_length (4, LE) + command (8) + payload
    pub fn encode(&self) -> Result<BytesMut> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(FossilError::FrameTooLarge {
                size: COMMAND_LEN + self.payload.len(),
                max: u32::MAX as usize,
            });
        }

        let total_length = self.total_length();
        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_LEN + total_length as usize);
        buf.put_u32_le(total_length);
        buf.put_slice(self.command.as_bytes());
        buf.put_slice(&self.payload);
        Ok(buf)
    }
}
