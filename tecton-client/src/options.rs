//! Client options for connection and timeout configuration.
//!
//! This module provides [`ClientOptions`] for configuring how the client
//! connects to the feature server and how long it waits for responses.

use std::time::Duration;

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
/// Default time allowed for a complete request/response exchange.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);
/// Default idle time after which pooled connections are closed.
pub const DEFAULT_KEEPALIVE_EXPIRY: Duration = Duration::from_secs(300);
/// Default number of idle connections kept per host.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Options for configuring a [`TectonClient`](crate::TectonClient).
///
/// # Example
///
/// ```ignore
/// use tecton_client::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .connect_timeout(Duration::from_secs(10))
///     .keepalive_expiry(Some(Duration::from_secs(600)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) keepalive_expiry: Option<Duration>,
    pub(crate) max_connections: Option<usize>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            keepalive_expiry: Some(DEFAULT_KEEPALIVE_EXPIRY),
            max_connections: Some(DEFAULT_MAX_CONNECTIONS),
        }
    }
}

impl ClientOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum time to wait for a connection to be established.
    ///
    /// Default: 2 seconds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the maximum time to wait for a complete response.
    ///
    /// The timeout covers sending the request and reading the whole body.
    ///
    /// Default: 2 seconds.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set how long idle keep-alive connections are kept, or `None` for no limit.
    ///
    /// Default: 300 seconds.
    pub fn keepalive_expiry(mut self, expiry: Option<Duration>) -> Self {
        self.keepalive_expiry = expiry;
        self
    }

    /// Set the maximum number of idle connections kept per host, or `None`
    /// for no limit.
    ///
    /// Default: 10.
    pub fn max_connections(mut self, max: Option<usize>) -> Self {
        self.max_connections = max;
        self
    }

    pub fn get_connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn get_read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn get_keepalive_expiry(&self) -> Option<Duration> {
        self.keepalive_expiry
    }

    pub fn get_max_connections(&self) -> Option<usize> {
        self.max_connections
    }
}
