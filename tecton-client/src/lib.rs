//! HTTP client for the Tecton online feature-serving API.
//!
//! This crate builds get-features requests, sends them over HTTP/1.1 or
//! HTTP/2, and decodes the responses into typed feature values.
//!
//! ## Features
//!
//! - Join-key and request-context maps with client-side validation
//! - Selectable per-feature metadata (name, data type, effective time, status, SLO info)
//! - Typed decoding of scalar, array and struct values, nulls included
//! - Connection pooling and TLS via hyper and rustls
//! - Pluggable [`Transport`] for custom HTTP stacks and tests
//!
//! ## Example
//!
//! ```ignore
//! use tecton_client::{
//!     GetFeaturesRequest, GetFeaturesRequestData, MetadataOption, MetadataOptions, TectonClient,
//! };
//!
//! let client = TectonClient::builder("https://example.tecton.ai", "my-api-key").build()?;
//!
//! let data = GetFeaturesRequestData::new()
//!     .join_key("user_id", "123")
//!     .request_context("amount", 42.5);
//! let options = MetadataOptions::new().with(MetadataOption::SloInfo);
//! let request = GetFeaturesRequest::new("prod", "fraud_detection", data, options)?;
//!
//! let response = client.get_features(&request).await?;
//! for (name, value) in response.feature_values_map() {
//!     println!("{name}: {value:?}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Flag | Default | Description |
//! |------|---------|-------------|
//! | `tls` | yes | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` | via `tls` | ring crypto provider |
//! | `tls-aws-lc` | no | aws-lc-rs crypto provider |
//! | `tls-native-roots` | via `tls` | System root certificates |
//! | `tls-webpki-roots` | no | Bundled Mozilla root certificates |
//! | `tracing` | yes | Spans and events for each request |

mod builder;
mod client;
mod error;
mod error_parser;
mod options;
pub mod request;
pub mod response;
pub mod transport;

// Re-export main types
pub use builder::{API_KEY_PREFIX, ClientBuilder};
pub use client::TectonClient;
pub use error::{ClientError, ServerErrorKind};
pub use error_parser::parse_error_response;
pub use options::{
    ClientOptions, DEFAULT_CONNECT_TIMEOUT, DEFAULT_KEEPALIVE_EXPIRY, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_READ_TIMEOUT,
};

// Re-export request types
pub use request::{
    GetFeaturesRequest, GetFeaturesRequestData, JoinKeyValue, MetadataOption, MetadataOptions,
    RequestContextValue,
};

// Re-export response types
pub use response::{FeatureStatus, FeatureValue, GetFeaturesResponse, SloInformation};

// Re-export transport types
pub use transport::{HyperTransport, HyperTransportBuilder, TlsClientConfig, Transport};

// Re-export core value types
pub use tecton_client_core::{
    DataType, DecodeError, StructField, StructValue, ValidationError, Value, decode_value,
};

pub use bytes::Bytes;
