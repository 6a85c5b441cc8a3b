//! Error types for the SmugMug API client.
//!
//! # Design
//! Three failure categories are kept apart so callers and monitoring can tell
//! them apart without inspecting messages:
//!
//! - `ArgumentCount`: the caller broke the positional contract of a method.
//!   `WrongMode` is its sibling for a method sent through the wrong endpoint.
//! - `Network`: anything that went wrong moving bytes, including non-2xx
//!   statuses. The original cause is kept as the error `source()`.
//! - `ResponseFormat`: bytes arrived but are not the expected JSON envelope.
//!
//! A service-reported failure (`"stat":"fail"`) is not an error at this level;
//! it is a normal `Response` with `is_error()` set.

use thiserror::Error;

/// Boxed cause carried by [`ApiError::Network`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by method invocation and response parsing.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The number of positional values does not match the method's arguments.
    #[error("method {method} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A form method was called as a raw upload, or the raw upload as a form
    /// method. Like `ArgumentCount`, this is a caller contract violation and
    /// nothing is sent.
    #[error("method {method} cannot be sent as a {mode} request")]
    WrongMode { method: String, mode: &'static str },

    /// The request could not be completed at the transport level.
    #[error("network error: {0}")]
    Network(#[source] TransportError),

    /// The response body is not a well-formed response envelope.
    #[error("malformed response: {0}")]
    ResponseFormat(#[from] FormatError),

    /// A local file backing an upload could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_response_format(&self) -> bool {
        matches!(self, ApiError::ResponseFormat(_))
    }
}

/// Ways a received body can fail to be a response envelope.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,

    #[error("missing \"stat\" field")]
    MissingStatus,

    #[error("unrecognised stat value {0:?}")]
    UnknownStatus(String),
}

/// The server answered with a non-2xx status.
///
/// Reported through [`ApiError::Network`]; the body is kept for debugging.
#[derive(Debug, Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}
