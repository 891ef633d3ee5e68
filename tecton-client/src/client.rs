//! Feature-serving client implementation.
//!
//! This module provides the main [`TectonClient`] type for fetching feature
//! values.

use bytes::Bytes;
use http::{HeaderValue, Method, Request, header};
use tokio::time::timeout;

#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

use crate::builder::ClientBuilder;
use crate::error_parser::parse_error_response;
use crate::request::GetFeaturesRequest;
use crate::response::GetFeaturesResponse;
use crate::transport::{HyperTransport, Transport};
use crate::{ClientError, ClientOptions};

/// Content type sent and accepted by the feature server.
const APPLICATION_JSON: &str = "application/json";

/// Client for the online feature-serving API.
///
/// The client is generic over `T`: the transport type. This defaults to
/// [`HyperTransport`]. Cloning is cheap when the transport is; clones of a
/// [`HyperTransport`] share one connection pool.
///
/// # Example
///
/// ```ignore
/// use tecton_client::{GetFeaturesRequest, GetFeaturesRequestData, MetadataOptions, TectonClient};
///
/// let client = TectonClient::builder("https://example.tecton.ai", "my-api-key").build()?;
///
/// let data = GetFeaturesRequestData::new().join_key("user_id", "123");
/// let request = GetFeaturesRequest::new("prod", "fraud_detection", data, MetadataOptions::new())?;
///
/// let response = client.get_features(&request).await?;
/// for feature in response.feature_values() {
///     println!("{} = {:?}", feature.full_name(), feature.value());
/// }
/// ```
#[derive(Clone)]
pub struct TectonClient<T = HyperTransport> {
    /// Transport the requests are sent through.
    transport: T,
    /// Base URL without trailing slash.
    base_url: String,
    /// Pre-built `Authorization` header.
    authorization: HeaderValue,
    /// Connection and timeout options.
    options: ClientOptions,
}

impl<T> std::fmt::Debug for TectonClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TectonClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TectonClient {
    /// Create a new [`ClientBuilder`] for the given base URL and API key.
    pub fn builder<U, K>(url: U, api_key: K) -> ClientBuilder
    where
        U: Into<String>,
        K: Into<String>,
    {
        ClientBuilder::new(url, api_key)
    }
}

impl<T: Transport> TectonClient<T> {
    pub(crate) fn new(
        transport: T,
        base_url: String,
        authorization: HeaderValue,
        options: ClientOptions,
    ) -> Self {
        Self {
            transport,
            base_url,
            authorization,
            options,
        }
    }

    /// Base URL of the feature server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Full URL of the get-features endpoint.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, GetFeaturesRequest::ENDPOINT)
    }

    /// Fetch feature values for one entity.
    ///
    /// Sends exactly one request; there are no retries.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Encode`] if the request cannot be serialized.
    /// - [`ClientError::Transport`] if the connection fails.
    /// - [`ClientError::Timeout`] if no complete response arrives within
    ///   the read timeout.
    /// - [`ClientError::Server`] for a non-success status.
    /// - [`ClientError::Decode`] if the response body is malformed.
    pub async fn get_features(
        &self,
        request: &GetFeaturesRequest,
    ) -> Result<GetFeaturesResponse, ClientError> {
        let call = self.execute(request);

        #[cfg(feature = "tracing")]
        let call = call.instrument(info_span!(
            "tecton.get_features",
            workspace = %request.workspace_name(),
            feature_service = %request.feature_service_name(),
            otel.kind = "client",
        ));

        call.await
    }

    async fn execute(
        &self,
        request: &GetFeaturesRequest,
    ) -> Result<GetFeaturesResponse, ClientError> {
        let body = request.to_json_bytes()?;
        let http_request = self.build_http_request(body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %http_request.uri(), "sending get-features request");

        let response = timeout(self.options.read_timeout, self.transport.send(http_request))
            .await
            .map_err(|_| ClientError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            let err = parse_error_response(status, response.body());
            #[cfg(feature = "tracing")]
            tracing::warn!(status = status.as_u16(), error = %err, "get-features request failed");
            return Err(err);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            status = status.as_u16(),
            bytes = response.body().len(),
            "received get-features response"
        );

        GetFeaturesResponse::from_slice(response.body()).map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "failed to decode get-features response");
            ClientError::from(e)
        })
    }

    fn build_http_request(&self, body: Bytes) -> Result<Request<Bytes>, ClientError> {
        Request::builder()
            .method(Method::POST)
            .uri(self.endpoint_url())
            .header(header::AUTHORIZATION, self.authorization.clone())
            .header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
            .header(header::ACCEPT, HeaderValue::from_static(APPLICATION_JSON))
            .body(body)
            .map_err(|e| ClientError::Encode(format!("failed to build HTTP request: {e}")))
    }
}
