//! Response definitions
//!
//! Responses returned by the server and their unmarshaling from frames.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::frame::{CommandTag, Frame};
use crate::error::{FossilError, Result};

/// Length of the status code that leads every known response payload
const CODE_SIZE: usize = 4;

/// A response from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Server accepted the version advertisement
    VersionAck { code: u32, version: String },

    /// Request succeeded
    Ok { code: u32, message: String },

    /// Request was rejected
    Err { code: u32, message: String },

    /// Command tag this client does not understand; payload is not parsed
    Unknown { command: CommandTag },
}

impl Response {
    /// Get the status code, if the response carries one
    pub fn code(&self) -> Option<u32> {
        match self {
            Response::VersionAck { code, .. }
            | Response::Ok { code, .. }
            | Response::Err { code, .. } => Some(*code),
            Response::Unknown { .. } => None,
        }
    }

    /// Get the text that follows the status code
    pub fn text(&self) -> Option<&str> {
        match self {
            Response::VersionAck { version, .. } => Some(version),
            Response::Ok { message, .. } | Response::Err { message, .. } => Some(message),
            Response::Unknown { .. } => None,
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Response::Err { .. })
    }

    /// Name used in logs and errors
    pub fn kind(&self) -> String {
        match self {
            Response::VersionAck { .. } => CommandTag::VERSION.name(),
            Response::Ok { .. } => CommandTag::OK.name(),
            Response::Err { .. } => CommandTag::ERR.name(),
            Response::Unknown { command } => format!("unknown ({})", command),
        }
    }

    /// Turn an `Err` response into `FossilError::Application`
    pub fn into_result(self) -> Result<Response> {
        match self {
            Response::Err { code, message } => Err(FossilError::Application { code, message }),
            other => Ok(other),
        }
    }
}

/// Decode a response frame
///
/// Tags are matched over their full padded width. Unrecognized tags decode
/// to `Response::Unknown` so that newer servers do not break older clients.
pub fn decode_response(frame: &Frame) -> Result<Response> {
    match frame.command {
        CommandTag::VERSION => {
            let (code, version) = decode_coded_text(frame)?;
            Ok(Response::VersionAck { code, version })
        }
        CommandTag::OK => {
            let (code, message) = decode_coded_text(frame)?;
            Ok(Response::Ok { code, message })
        }
        CommandTag::ERR => {
            let (code, message) = decode_coded_text(frame)?;
            Ok(Response::Err { code, message })
        }
        command => {
            tracing::debug!(%command, len = frame.payload.len(), "Ignoring unknown response");
            Ok(Response::Unknown { command })
        }
    }
}

/// Decode `code (4, LE) + text`
fn decode_coded_text(frame: &Frame) -> Result<(u32, String)> {
    let mut buf = &frame.payload[..];
    if buf.remaining() < CODE_SIZE {
        return Err(FossilError::TruncatedPayload {
            command: frame.command.name(),
            len: buf.remaining(),
            required: CODE_SIZE,
        });
    }

    let code = buf.get_u32_le();
    let text = String::from_utf8_lossy(buf).into_owned();
    Ok((code, text))
}

/// Encode a response into a frame, as a server would
///
/// `Unknown` is encoded under its original tag with an empty payload.
pub fn encode_response(response: &Response) -> Frame {
    let (command, code, text) = match response {
        Response::VersionAck { code, version } => (CommandTag::VERSION, *code, version.as_str()),
        Response::Ok { code, message } => (CommandTag::OK, *code, message.as_str()),
        Response::Err { code, message } => (CommandTag::ERR, *code, message.as_str()),
        Response::Unknown { command } => return Frame::new(*command, Bytes::new()),
    };

    let mut payload = BytesMut::with_capacity(CODE_SIZE + text.len());
    payload.put_u32_le(code);
    payload.put_slice(text.as_bytes());
    Frame::new(command, payload.freeze())
}
