//! Error definitions for bridge calls.
//!
//! Every failure is surfaced through the asynchronous call outcome; nothing
//! in the public API fails synchronously or panics on untrusted input.
//! Malformed and unmatched inbound messages are not errors at all — they are
//! dropped inside the dispatch path and only logged.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors a bridge call can resolve with.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host answered with an explicit error message, preserved verbatim.
    #[error("{0}")]
    Host(String),

    /// No reply arrived within the deadline.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The outbound envelope could not be handed to any sink.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The engine was torn down while the call was still pending.
    #[error("bridge closed before a reply arrived")]
    Closed,

    /// A typed convenience call got a success reply whose payload did not
    /// match the expected shape.
    #[error("malformed {action} reply: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
