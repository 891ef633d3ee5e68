//! Error types for the typed-value boundary.
//!
//! This module provides the two error enums shared by request building and
//! response decoding:
//! - [`ValidationError`]: A request parameter was rejected before serialization
//! - [`DecodeError`]: A response could not be turned into typed values

/// Request-side validation failures.
///
/// Returned before any request body is produced; a request that fails
/// validation is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required request parameter is missing or empty.
    ///
    /// The payload names the parameter (`"workspace"`, `"feature_service_name"`,
    /// or `"empty maps"` when neither lookup map has entries).
    #[error("invalid parameter: {0} cannot be empty")]
    InvalidParameter(&'static str),

    /// A lookup map entry has an empty key or an empty value.
    #[error("invalid entry in {map}: key/value cannot be empty (key: {key:?})")]
    InvalidKeyValue {
        /// Wire name of the map holding the entry.
        map: &'static str,
        /// The offending key.
        key: String,
    },
}

/// Response-side decoding failures.
///
/// Any of these aborts the whole decode; no partially decoded response is
/// ever handed back.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The response carried no feature values.
    #[error("received an empty feature vector in the response")]
    EmptyResult,

    /// A required response field is absent.
    #[error("required field {0:?} is missing from the response metadata")]
    MissingField(&'static str),

    /// A type descriptor names a type outside the supported set, or a
    /// container type lacks its nested descriptor.
    #[error("unsupported data type {0:?}")]
    UnsupportedType(String),

    /// A raw value cannot be converted to the declared type without loss.
    #[error("cannot decode {raw} as {expected}")]
    TypeMismatch {
        /// Display name of the target type.
        expected: String,
        /// The offending raw value, rendered as JSON.
        raw: String,
    },

    /// A positional sequence has the wrong number of elements.
    #[error("expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Declared element count.
        expected: usize,
        /// Element count found on the wire.
        actual: usize,
    },

    /// A struct declares the same field name twice.
    #[error("struct field {0:?} is declared more than once")]
    DuplicateField(String),

    /// A feature name is not of the form `<namespace>.<feature>`.
    #[error("feature name {0:?} is not in the expected format of 'namespace.name'")]
    InvalidName(String),

    /// An effective time could not be parsed as an RFC 3339 timestamp.
    #[error("invalid effective time {0:?}")]
    InvalidTimestamp(String),

    /// The response body is not valid JSON.
    #[error("malformed response body: {0}")]
    Json(String),
}

impl DecodeError {
    /// Create a type mismatch error for a raw JSON value.
    pub fn type_mismatch(expected: impl ToString, raw: &serde_json::Value) -> Self {
        DecodeError::TypeMismatch {
            expected: expected.to_string(),
            raw: raw.to_string(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}
