//! Error type shared by the core parser and the async SDK.
//!
//! # Design
//! Every non-2xx response lands in `Request`, whatever the status code. The
//! message is taken from the server's `{"message": ...}` error body when one
//! is present so callers see what the server said rather than a bare code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LudiksError {
    /// A global-form call was made before `configure`.
    #[error("Ludiks SDK not configured. Call configure() first")]
    NotConfigured,

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl LudiksError {
    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            LudiksError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
