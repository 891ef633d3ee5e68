//! Error response parsing.
//!
//! Parses JSON error responses from the feature server into [`ClientError`].

use http::StatusCode;
use serde::Deserialize;

use crate::ClientError;

/// Parse an error response from the server.
///
/// Feature server error responses have the format:
/// ```json
/// {
///   "error": "invalid 'Tecton-key' authorization header",
///   "message": "invalid 'Tecton-key' authorization header",
///   "code": 16
/// }
/// ```
///
/// If the body cannot be parsed or carries no message, falls back to the
/// body text and then to the HTTP reason phrase.
pub fn parse_error_response(status: StatusCode, body: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<ErrorResponseJson>(body) {
        Ok(error_json) => error_json.message.or(error_json.error),
        Err(_) => std::str::from_utf8(body)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    };

    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    ClientError::server(status, message)
}

/// JSON structure for feature server error responses.
#[derive(Deserialize)]
struct ErrorResponseJson {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    // "code" is the gRPC status code; the HTTP status already classifies it
}
