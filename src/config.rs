//! Default transport configuration.

use std::env;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::{GraphQLError, Result};

const TIMEOUT_VAR: &str = "ARMATURE_GRAPHQL_TIMEOUT_MS";
const USER_AGENT_VAR: &str = "ARMATURE_GRAPHQL_USER_AGENT";

/// What is fixed when [`DefaultFetcher`](crate::DefaultFetcher) creates its
/// HTTP client.
///
/// Anything that can vary per call lives in
/// [`FetcherOptions`](crate::FetcherOptions) instead.
#[derive(Debug, Clone)]
pub struct GraphQLClientConfig {
    /// Whole-request timeout; unbounded when `None`.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Option<Duration>,
    /// Sent with every request. Fetch option headers of the same name win.
    pub default_headers: HeaderMap,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Accept and decode gzip bodies.
    pub gzip: bool,
}

impl Default for GraphQLClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            default_headers: HeaderMap::new(),
            user_agent: concat!("armature-graphql-client/", env!("CARGO_PKG_VERSION")).to_string(),
            gzip: true,
        }
    }
}

impl GraphQLClientConfig {
    /// Create a configuration builder.
    pub fn builder() -> GraphQLClientConfigBuilder {
        GraphQLClientConfigBuilder::default()
    }

    /// Defaults overridden by the environment:
    ///
    /// - `ARMATURE_GRAPHQL_TIMEOUT_MS`: request timeout in milliseconds
    /// - `ARMATURE_GRAPHQL_USER_AGENT`: user agent
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(TIMEOUT_VAR) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|e| GraphQLError::Config(format!("{}={:?}: {}", TIMEOUT_VAR, raw, e)))?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        if let Ok(user_agent) = env::var(USER_AGENT_VAR) {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .gzip(self.gzip);

        let builder = match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let builder = match self.connect_timeout {
            Some(timeout) => builder.connect_timeout(timeout),
            None => builder,
        };

        builder.build().map_err(GraphQLError::from)
    }
}

/// Chained setters for [`GraphQLClientConfig`].
#[derive(Debug, Default)]
pub struct GraphQLClientConfigBuilder {
    inner: GraphQLClientConfig,
}

impl GraphQLClientConfigBuilder {
    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.inner.connect_timeout = Some(timeout);
        self
    }

    /// Add a default header. An invalid name or value is dropped with a
    /// warning.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        match (HeaderName::try_from(name), HeaderValue::try_from(value.as_ref())) {
            (Ok(name), Ok(value)) => {
                self.inner.default_headers.insert(name, value);
            }
            _ => warn!(header = %name, "Dropping invalid default header"),
        }
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip decompression.
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.inner.gzip = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GraphQLClientConfig {
        self.inner
    }
}
