//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Frame Format
//! ```text
//! ┌────────────────┬──────────────────┬─────────────────────────────┐
//! │ total_len (4)  │   command (8)    │          Payload            │
//! └────────────────┴──────────────────┴─────────────────────────────┘
//! ```
//! All integers are little-endian. `total_len` = 8 + payload length.
//! Commands are ASCII, zero-padded to 8 bytes.
//!
//! ### Requests
//! - VERSION: version string
//! - USE:     database name
//! - APPEND:  topic_len (4) + topic + data
//!
//! ### Responses
//! - VERSION: code (4) + server version string
//! - OK:      code (4) + message
//! - ERR:     code (4) + message
//! - other:   decoded as `Response::Unknown`

mod frame;
mod codec;
mod request;
mod response;

pub use frame::{
    CommandTag, Frame, COMMAND_LEN, LENGTH_PREFIX_LEN, MAX_FRAME_SIZE, MAX_PAYLOAD_LEN,
    MIN_FRAME_LENGTH,
};
pub use codec::{read_frame, read_frame_with_limit, write_frame};
pub use request::{decode_request, encode_request, Request};
pub use response::{decode_response, encode_response, Response};
