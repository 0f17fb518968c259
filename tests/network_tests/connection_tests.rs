//! Connection Tests
//!
//! Tests for the request/response round trip on an established stream.

#[path = "../common/mod.rs"]
mod common;

use common::{frame_bytes, parse_frames, response_bytes, ScriptedStream};
use fossil::network::{Connection, ConnectionState};
use fossil::protocol::{encode_request, CommandTag, Frame};
use fossil::{FossilError, Request, Response};

fn ok(message: &str) -> Response {
    Response::Ok {
        code: 200,
        message: message.to_string(),
    }
}

fn connection(responses: &[Response]) -> Connection<ScriptedStream> {
    Connection::new(ScriptedStream::replying(responses), "test")
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_send_writes_request_and_returns_response() {
    let mut conn = connection(&[ok("appended")]);
    let request = Request::append("events", b"AB".to_vec());

    let response = conn.send(&request).unwrap();

    assert_eq!(response, ok("appended"));
    assert_eq!(
        conn.get_ref().written(),
        frame_bytes(&encode_request(&request))
    );
    assert!(conn.is_usable());
}

#[test]
fn test_server_error_is_a_response_not_a_failure() {
    let rejected = Response::Err {
        code: 403,
        message: "read only".to_string(),
    };
    let mut conn = connection(&[rejected.clone(), ok("")]);

    let response = conn.append("t", b"d").unwrap();
    assert_eq!(response, rejected);
    assert_eq!(conn.state(), ConnectionState::Ready);

    // The connection keeps working after an ERR
    assert_eq!(conn.append("t", b"d").unwrap(), ok(""));
}

#[test]
fn test_sequential_requests_are_written_in_order() {
    let mut conn = connection(&[ok("1"), ok("2"), ok("3")]);

    conn.append("a", b"1").unwrap();
    conn.use_database("other").unwrap();
    conn.append("b", b"2").unwrap();

    let sent: Vec<CommandTag> = parse_frames(&conn.get_ref().written())
        .into_iter()
        .map(|f| f.command)
        .collect();
    assert_eq!(sent, vec![CommandTag::APPEND, CommandTag::USE, CommandTag::APPEND]);
}

#[test]
fn test_unknown_response_is_returned() {
    let pong = CommandTag::new("PONG").unwrap();
    let mut conn = connection(&[Response::Unknown { command: pong }]);

    let response = conn.append("t", b"d").unwrap();
    assert_eq!(response, Response::Unknown { command: pong });
    assert!(conn.is_usable());
}

// =============================================================================
// Database Selection Tests
// =============================================================================

#[test]
fn test_use_database_records_selection_on_ok() {
    let mut conn = connection(&[ok("")]);
    assert_eq!(conn.database(), None);

    conn.use_database("archive").unwrap();
    assert_eq!(conn.database(), Some("archive"));
}

#[test]
fn test_use_database_keeps_selection_on_err() {
    let mut conn = connection(&[
        ok(""),
        Response::Err {
            code: 404,
            message: "no such database".to_string(),
        },
    ]);

    conn.use_database("first").unwrap();
    let response = conn.use_database("missing").unwrap();

    assert!(response.is_err());
    assert_eq!(conn.database(), Some("first"));
}

// =============================================================================
// Failure and Poisoning Tests
// =============================================================================

#[test]
fn test_peer_close_poisons_connection() {
    let mut conn = connection(&[]);

    let result = conn.append("t", b"d");
    assert!(matches!(result, Err(FossilError::ConnectionClosed)));
    assert_eq!(conn.state(), ConnectionState::Poisoned);

    let again = conn.append("t", b"d");
    assert!(matches!(again, Err(FossilError::ConnectionPoisoned)));

    // Nothing is written once poisoned
    assert_eq!(parse_frames(&conn.get_ref().written()).len(), 1);
}

#[test]
fn test_truncated_response_poisons_connection() {
    let bad = frame_bytes(&Frame::new(CommandTag::OK, vec![0x01]));
    let mut conn = Connection::new(ScriptedStream::new(bad), "test");

    let result = conn.append("t", b"d");
    assert!(matches!(result, Err(FossilError::TruncatedPayload { .. })));
    assert!(!conn.is_usable());
}

#[test]
fn test_partial_response_is_transport_error() {
    let mut bytes = response_bytes(&[ok("complete")]);
    bytes.truncate(10);
    let mut conn = Connection::new(ScriptedStream::new(bytes), "test");

    let err = conn.append("t", b"d").unwrap_err();
    assert!(matches!(err, FossilError::Transport(_)));
    assert!(err.is_fatal());
    assert!(!conn.is_usable());
}

#[test]
fn test_oversized_response_rejected() {
    let mut conn =
        connection(&[ok(&"x".repeat(100))]).with_max_frame_size(32);

    let result = conn.append("t", b"d");
    assert!(matches!(
        result,
        Err(FossilError::FrameTooLarge { size: 112, max: 32 })
    ));
    assert!(!conn.is_usable());
}
