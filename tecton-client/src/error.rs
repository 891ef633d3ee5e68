//! Client-side error types.
//!
//! This module provides [`ClientError`], the error type for all client
//! operations, and [`ServerErrorKind`], the classification of error
//! responses returned by the feature server.

use http::StatusCode;
use tecton_client_core::{DecodeError, ValidationError};

/// Classification of a non-success HTTP response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    GatewayTimeout,
    TooManyRequests,
    InternalServerError,
    ServiceUnavailable,
    Unknown,
}

impl ServerErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ServerErrorKind::BadRequest,
            401 => ServerErrorKind::Unauthorized,
            403 => ServerErrorKind::Forbidden,
            404 => ServerErrorKind::NotFound,
            408 | 504 => ServerErrorKind::GatewayTimeout,
            429 => ServerErrorKind::TooManyRequests,
            500 => ServerErrorKind::InternalServerError,
            502 | 503 => ServerErrorKind::ServiceUnavailable,
            _ => ServerErrorKind::Unknown,
        }
    }

    /// Returns whether this kind indicates a transient condition.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ServerErrorKind::GatewayTimeout
                | ServerErrorKind::TooManyRequests
                | ServerErrorKind::ServiceUnavailable
        )
    }
}

/// Client error variants.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The request was rejected before being sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The service URL is empty or malformed.
    #[error("cannot connect to the feature server because the URL is invalid: {0:?}")]
    InvalidUrl(String),

    /// The API key is empty or cannot be sent as a header.
    #[error("API key cannot be empty")]
    InvalidApiKey,

    /// Request serialization failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Transport-level error (connection failed, TLS setup, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// No response arrived within the read timeout.
    #[error("request timed out")]
    Timeout,

    /// The server returned a non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        kind: ServerErrorKind,
        status: u16,
        message: String,
    },
}

impl ClientError {
    /// Create a server error from an HTTP status and message.
    pub fn server<S: Into<String>>(status: StatusCode, message: S) -> Self {
        ClientError::Server {
            kind: ServerErrorKind::from_status(status),
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Get the server error kind, if this is a server error.
    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            ClientError::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns whether retrying the same request may succeed.
    ///
    /// Transport failures, timeouts and transient server errors are
    /// retryable. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout => true,
            ClientError::Server { kind, .. } => kind.is_retryable(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Encode(err.to_string())
    }
}
