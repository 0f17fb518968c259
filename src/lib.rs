//! # Fossil
//!
//! A blocking client for the Fossil record store:
//! - Length-prefixed binary framing
//! - Typed requests (VERSION, USE, APPEND) and responses (VERSION, OK, ERR)
//! - Startup handshake: version negotiation, then database selection
//! - Forward compatible: unknown responses decode to a placeholder
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │               (append / use_database / send)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Handshake  →  Connection                        │
//! │        (VERSION, USE)      (one request in flight)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Marshaler  │          │ Unmarshaler │
//!   │  (Request)  │          │ (Response)  │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │            Frame Codec              │
//!   │   (Transport: TCP or any stream)    │
//!   └─────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FossilError, Result};
pub use config::ClientConfig;
pub use client::Client;
pub use protocol::{Request, Response};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol version advertised in the VERSION request by default
pub const PROTOCOL_VERSION: &str = "v1.0.0";
