//! HTTP transport layer.
//!
//! This module provides the [`Transport`] trait the client sends requests
//! through, and [`HyperTransport`], the default implementation on top of
//! hyper_util's legacy client. It supports:
//!
//! - HTTP/1.1 and HTTP/2 with automatic protocol negotiation
//! - TLS with rustls (feature-gated)
//! - Connection pooling
//!
//! # Feature Flags
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! # Custom Transports
//!
//! Implement [`Transport`] to route requests through something other than
//! hyper, for example an in-memory fake in tests:
//!
//! ```ignore
//! use bytes::Bytes;
//! use tecton_client::{ClientError, transport::Transport};
//!
//! struct Canned(Bytes);
//!
//! impl Transport for Canned {
//!     async fn send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>, ClientError> {
//!         Ok(http::Response::new(self.0.clone()))
//!     }
//! }
//! ```

use std::future::Future;

use bytes::Bytes;

use crate::ClientError;

mod connector;
mod hyper;

pub use self::connector::{build_https_connector, default_tls_config, has_tls_support};
pub use self::hyper::{HyperTransport, HyperTransportBuilder};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;

/// Sends one HTTP request and returns the fully read response.
///
/// The client calls [`send`](Transport::send) exactly once per logical
/// request and never retries.
pub trait Transport: Send + Sync {
    /// Send a request and read the complete response body.
    ///
    /// Non-success statuses are returned as responses, not errors.
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> impl Future<Output = Result<http::Response<Bytes>, ClientError>> + Send;
}
