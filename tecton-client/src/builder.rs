//! Client builder for the feature-serving client.
//!
//! Provides a fluent API for configuring and building a [`TectonClient`].

use http::HeaderValue;
use url::Url;

use crate::client::TectonClient;
use crate::transport::{HyperTransport, Transport};
use crate::{ClientError, ClientOptions};

/// Prefix of the `Authorization` header value.
pub const API_KEY_PREFIX: &str = "Tecton-key";

/// Builder for creating a [`TectonClient`].
///
/// The builder is generic over `T`: the transport type. This defaults to
/// `()`, meaning a [`HyperTransport`] is created from the client options
/// at build time.
///
/// # Example
///
/// ```ignore
/// use tecton_client::{ClientBuilder, ClientOptions};
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("https://example.tecton.ai", "my-api-key")
///     .options(ClientOptions::new().read_timeout(Duration::from_secs(5)))
///     .build()?;
/// ```
pub struct ClientBuilder<T = ()> {
    /// Base URL of the feature server.
    url: String,
    /// API key sent in the `Authorization` header.
    api_key: String,
    /// Connection and timeout options.
    options: ClientOptions,
    /// User-provided transport, or `()`.
    transport: T,
}

impl<T> std::fmt::Debug for ClientBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder<()> {
    /// Create a new ClientBuilder with the given base URL and API key.
    ///
    /// The base URL should include the scheme and host, e.g.,
    /// `"https://example.tecton.ai"`.
    pub fn new<U, K>(url: U, api_key: K) -> Self
    where
        U: Into<String>,
        K: Into<String>,
    {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            options: ClientOptions::default(),
            transport: (),
        }
    }

    /// Build the client with a [`HyperTransport`] configured from the
    /// client options.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] if the URL is empty, does not parse,
    ///   has no host, or is not `http`/`https`.
    /// - [`ClientError::InvalidApiKey`] if the API key is empty.
    /// - [`ClientError::Transport`] if the HTTP transport cannot be created.
    pub fn build(self) -> Result<TectonClient<HyperTransport>, ClientError> {
        let base_url = validate_url(&self.url)?;
        let authorization = authorization_header(&self.api_key)?;
        let transport = HyperTransport::from_options(&self.options)?;

        Ok(TectonClient::new(
            transport,
            base_url,
            authorization,
            self.options,
        ))
    }
}

impl<T> ClientBuilder<T> {
    /// Set the client options.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom transport instead of the default [`HyperTransport`].
    ///
    /// Connection options in [`ClientOptions`] are not applied to a custom
    /// transport; the read timeout still is.
    pub fn transport<U: Transport>(self, transport: U) -> ClientBuilder<U> {
        ClientBuilder {
            url: self.url,
            api_key: self.api_key,
            options: self.options,
            transport,
        }
    }
}

impl<T: Transport> ClientBuilder<T> {
    /// Build the client with the configured transport.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] if the URL is empty, does not parse,
    ///   has no host, or is not `http`/`https`.
    /// - [`ClientError::InvalidApiKey`] if the API key is empty.
    pub fn build(self) -> Result<TectonClient<T>, ClientError> {
        let base_url = validate_url(&self.url)?;
        let authorization = authorization_header(&self.api_key)?;

        Ok(TectonClient::new(
            self.transport,
            base_url,
            authorization,
            self.options,
        ))
    }
}

/// Validate the base URL and normalize it (remove trailing slashes).
fn validate_url(url: &str) -> Result<String, ClientError> {
    let invalid = || ClientError::InvalidUrl(url.to_string());

    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }

    Ok(url.trim().trim_end_matches('/').to_string())
}

/// Build the `Authorization` header value for an API key.
fn authorization_header(api_key: &str) -> Result<HeaderValue, ClientError> {
    if api_key.trim().is_empty() {
        return Err(ClientError::InvalidApiKey);
    }

    let mut value = HeaderValue::try_from(format!("{API_KEY_PREFIX} {api_key}"))
        .map_err(|_| ClientError::InvalidApiKey)?;
    value.set_sensitive(true);
    Ok(value)
}
