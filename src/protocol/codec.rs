//! Frame codec
//!
//! Blocking reads and writes of whole frames on a byte stream. The codec
//! knows nothing about what a command means.
//!
//! ## Wire Format
//!
//! ```text
//! ┌────────────────┬──────────────────┬─────────────────────────────┐
//! │ total_len (4)  │   command (8)    │  payload (total_len - 8)    │
//! └────────────────┴──────────────────┴─────────────────────────────┘
//! ```
//!
//! `total_len` is little-endian and counts the command tag plus payload,
//! never the prefix itself.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;

use super::frame::{CommandTag, Frame, COMMAND_LEN, LENGTH_PREFIX_LEN, MAX_FRAME_SIZE, MIN_FRAME_LENGTH};
use crate::error::{FossilError, Result};

// =============================================================================
// Reading
// =============================================================================

/// Read a complete frame from a stream
///
/// Blocks until a complete frame is received or an error occurs. Returns
/// `Ok(None)` when the peer closed the stream before sending any byte of a
/// new frame.
///
/// Frames longer than `MAX_FRAME_SIZE` are rejected with `FrameTooLarge`,
/// even if `write_frame` produced them. Use `read_frame_with_limit` with a
/// larger bound (`u32::MAX` accepts every legal frame) to read those.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Frame>> {
    read_frame_with_limit(reader, MAX_FRAME_SIZE)
}

/// Read a complete frame, rejecting declared lengths above `max_frame_size`
/// before anything is allocated for the payload. The bound is inclusive.
pub fn read_frame_with_limit<R: Read>(reader: &mut R, max_frame_size: u32) -> Result<Option<Frame>> {
    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    if !read_length_prefix(reader, &mut prefix)? {
        return Ok(None);
    }

    let total_length = u32::from_le_bytes(prefix);
    if total_length < MIN_FRAME_LENGTH {
        return Err(FossilError::MalformedFrame { total_length });
    }
    if total_length > max_frame_size {
        return Err(FossilError::FrameTooLarge {
            size: total_length as usize,
            max: max_frame_size as usize,
        });
    }

    // read_exact reports a short read as UnexpectedEof, which surfaces as a
    // transport error: a partially filled tag or payload never escapes.
    let mut command = [0u8; COMMAND_LEN];
    reader.read_exact(&mut command)?;

    let mut payload = vec![0u8; total_length as usize - COMMAND_LEN];
    if !payload.is_empty() {
        reader.read_exact(&mut payload)?;
    }

    let frame = Frame::new(CommandTag::from_bytes(command), Bytes::from(payload));
    tracing::trace!(
        command = %frame.command,
        total_length,
        "Read frame"
    );

    Ok(Some(frame))
}

/// Fill the length prefix.
///
/// Returns `Ok(false)` on a clean end of stream (zero bytes read). Running
/// out of bytes part way through the prefix is a transport error.
fn read_length_prefix<R: Read>(reader: &mut R, prefix: &mut [u8; LENGTH_PREFIX_LEN]) -> Result<bool> {
    let mut filled = 0;
    while filled < LENGTH_PREFIX_LEN {
        match reader.read(&mut prefix[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(FossilError::Transport(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!(
                        "stream ended after {} of {} length prefix bytes",
                        filled, LENGTH_PREFIX_LEN
                    ),
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

// =============================================================================
// Writing
// =============================================================================

/// Write a frame to a stream
///
/// The frame is serialized into one buffer and written in full. A failed
/// or short write leaves the stream in an unknown state; nothing is retried.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    let bytes = frame.encode()?;
    writer.write_all(&bytes)?;
    writer.flush()?;

    tracing::trace!(
        command = %frame.command,
        total_length = frame.total_length(),
        "Wrote frame"
    );
    Ok(())
}
