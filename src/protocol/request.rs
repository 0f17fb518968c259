//! Request definitions
//!
//! Requests sent by the client and their marshaling into frames.

use bytes::{Buf, BufMut, BytesMut};

use super::frame::{CommandTag, Frame};
use crate::error::{FossilError, Result};

/// Length of the topic length field in an APPEND payload
const TOPIC_LEN_SIZE: usize = 4;

/// A request to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Advertise the client's protocol version
    Version { client_version: String },

    /// Select the database subsequent requests operate on
    UseDatabase { name: String },

    /// Append a record to a topic
    AppendRecord { topic: String, data: Vec<u8> },
}

impl Request {
    pub fn version(client_version: impl Into<String>) -> Self {
        Request::Version {
            client_version: client_version.into(),
        }
    }

    pub fn use_database(name: impl Into<String>) -> Self {
        Request::UseDatabase { name: name.into() }
    }

    pub fn append(topic: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Request::AppendRecord {
            topic: topic.into(),
            data: data.into(),
        }
    }

    /// Get the command tag this request is sent under
    pub fn command(&self) -> CommandTag {
        match self {
            Request::Version { .. } => CommandTag::VERSION,
            Request::UseDatabase { .. } => CommandTag::USE,
            Request::AppendRecord { .. } => CommandTag::APPEND,
        }
    }
}

/// Encode a request into a frame
///
/// Payload by command:
/// - VERSION: version string
/// - USE:     database name
/// - APPEND:  topic_len (4, LE) + topic + data
///
/// Strings are written without a terminator; the frame length bounds them.
pub fn encode_request(request: &Request) -> Frame {
    let payload = match request {
        Request::Version { client_version } => BytesMut::from(client_version.as_bytes()),
        Request::UseDatabase { name } => BytesMut::from(name.as_bytes()),
        Request::AppendRecord { topic, data } => {
            let mut payload = BytesMut::with_capacity(TOPIC_LEN_SIZE + topic.len() + data.len());
            // A topic too long for u32 makes the payload exceed
            // MAX_PAYLOAD_LEN, which Frame::encode rejects.
            payload.put_u32_le(topic.len() as u32);
            payload.put_slice(topic.as_bytes());
            payload.put_slice(data);
            payload
        }
    };

    Frame::new(request.command(), payload.freeze())
}

/// Decode a request frame, as a server would
pub fn decode_request(frame: &Frame) -> Result<Request> {
    let payload = &frame.payload[..];

    match frame.command {
        CommandTag::VERSION => Ok(Request::Version {
            client_version: String::from_utf8_lossy(payload).into_owned(),
        }),
        CommandTag::USE => Ok(Request::UseDatabase {
            name: String::from_utf8_lossy(payload).into_owned(),
        }),
        CommandTag::APPEND => decode_append(payload),
        other => Err(FossilError::UnknownRequest(other.name())),
    }
}

/// Decode APPEND payload; data is whatever follows the topic
fn decode_append(payload: &[u8]) -> Result<Request> {
    let truncated = |required: usize| FossilError::TruncatedPayload {
        command: CommandTag::APPEND.name(),
        len: payload.len(),
        required,
    };

    let mut buf = payload;
    if buf.remaining() < TOPIC_LEN_SIZE {
        return Err(truncated(TOPIC_LEN_SIZE));
    }

    let topic_len = buf.get_u32_le() as usize;
    if buf.remaining() < topic_len {
        return Err(truncated(TOPIC_LEN_SIZE + topic_len));
    }

    let topic = String::from_utf8_lossy(&buf[..topic_len]).into_owned();
    let data = buf[topic_len..].to_vec();

    Ok(Request::AppendRecord { topic, data })
}
