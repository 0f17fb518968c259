//! Shared test helpers
//!
//! In-memory streams and transports that replay canned server bytes and
//! record everything the client writes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use fossil::network::Transport;
use fossil::protocol::{encode_response, read_frame, Frame};
use fossil::Response;

// =============================================================================
// Byte Helpers
// =============================================================================

/// Wire bytes of a single frame
pub fn frame_bytes(frame: &Frame) -> Vec<u8> {
    frame.encode().unwrap().to_vec()
}

/// Wire bytes of a sequence of server responses
pub fn response_bytes(responses: &[Response]) -> Vec<u8> {
    responses
        .iter()
        .flat_map(|r| frame_bytes(&encode_response(r)))
        .collect()
}

/// Split captured client output back into frames
pub fn parse_frames(bytes: &[u8]) -> Vec<Frame> {
    let mut cursor = Cursor::new(bytes);
    let mut frames = Vec::new();
    while let Some(frame) = read_frame(&mut cursor).unwrap() {
        frames.push(frame);
    }
    frames
}

// =============================================================================
// Scripted Stream
// =============================================================================

/// A duplex stream: reads come from a fixed script, writes are captured
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
}

impl ScriptedStream {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            written: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn replying(responses: &[Response]) -> Self {
        Self::new(response_bytes(responses))
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Scripted Transport
// =============================================================================

/// A transport whose single connection replays a script
pub struct ScriptedTransport {
    input: Vec<u8>,
    written: Rc<RefCell<Vec<u8>>>,
    refuse: bool,
}

impl ScriptedTransport {
    pub fn replying(responses: &[Response]) -> Self {
        Self::raw(response_bytes(responses))
    }

    pub fn raw(input: Vec<u8>) -> Self {
        Self {
            input,
            written: Rc::new(RefCell::new(Vec::new())),
            refuse: false,
        }
    }

    /// A transport whose connect always fails
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::raw(Vec::new())
        }
    }

    /// Every frame the client sent over this transport
    pub fn sent_frames(&self) -> Vec<Frame> {
        parse_frames(&self.written.borrow())
    }
}

impl Transport for ScriptedTransport {
    type Stream = ScriptedStream;

    fn connect(&self) -> io::Result<ScriptedStream> {
        if self.refuse {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted refusal",
            ));
        }
        Ok(ScriptedStream {
            input: Cursor::new(self.input.clone()),
            written: Rc::clone(&self.written),
        })
    }

    fn peer(&self) -> String {
        "scripted".to_string()
    }
}
