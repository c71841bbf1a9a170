//! Default HTTP transport.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::HeaderValue;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::fetcher::Query;
use crate::request::GraphQLRequest;
use crate::{
    Fetcher, FetcherBinding, FetcherOptions, GraphQLClientConfig, GraphQLError, GraphQLResponse,
    OperationType, Queryable, Result,
};

/// The built-in fetcher: one JSON `POST` per call, with header layering and
/// cookie propagation.
///
/// The HTTP client is created on first use and shared by every operation
/// bound from the same fetcher (and its clones).
#[derive(Clone, Default)]
pub struct DefaultFetcher {
    config: Arc<GraphQLClientConfig>,
    http_client: Arc<OnceCell<reqwest::Client>>,
}

impl DefaultFetcher {
    /// Create a fetcher with custom configuration.
    pub fn new(config: GraphQLClientConfig) -> Self {
        Self {
            config: Arc::new(config),
            http_client: Arc::default(),
        }
    }

    /// Create a fetcher around an existing HTTP client.
    pub fn with_http_client(config: GraphQLClientConfig, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http_client: Arc::new(OnceCell::with_value(client)),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GraphQLClientConfig {
        &self.config
    }

    fn http_client(&self) -> Result<&reqwest::Client> {
        self.http_client
            .get_or_try_init(|| self.config.http_client())
    }
}

impl Fetcher for DefaultFetcher {
    fn bind(&self, binding: FetcherBinding) -> Queryable {
        Queryable::new(HttpQuery {
            fetcher: self.clone(),
            endpoint: binding.endpoint,
            query: binding.document.print(),
            operation_type: binding.operation_type,
            operation_name: binding.operation_name,
            client_options: binding.options,
        })
    }
}

/// An operation bound to the default transport.
struct HttpQuery {
    fetcher: DefaultFetcher,
    endpoint: String,
    query: String,
    operation_type: OperationType,
    operation_name: Option<String>,
    client_options: Option<FetcherOptions>,
}

#[async_trait]
impl Query for HttpQuery {
    async fn execute(
        &self,
        variables: Value,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        let options = FetcherOptions::layered(self.client_options.as_ref(), options.as_ref());
        let cookie_store = options.active_cookie_store();

        let url = Url::parse(&self.endpoint)
            .map_err(|e| GraphQLError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;

        debug!(
            endpoint = %url,
            operation = self.operation_name.as_deref().unwrap_or("<anonymous>"),
            operation_type = %self.operation_type,
            "Executing GraphQL operation"
        );

        let mut headers = self.fetcher.config.default_headers.clone();
        headers.extend(options.fetch_options.headers.clone());
        if let Some(store) = cookie_store
            && !store.is_empty()
        {
            // Stored cookies follow any cookie header the caller set.
            let stored = store.serialize();
            let cookie = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
                Some(given) if !given.trim().is_empty() => format!("{}; {}", given, stored),
                _ => stored,
            };
            let cookie = HeaderValue::try_from(cookie)
                .map_err(|e| GraphQLError::Config(format!("invalid cookie header: {}", e)))?;
            headers.insert(COOKIE, cookie);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut request = self
            .fetcher
            .http_client()?
            .post(url)
            .headers(headers)
            .json(&GraphQLRequest::new(self.query.as_str(), variables));

        if let Some(timeout) = options.fetch_options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if let Some(store) = cookie_store {
            store.ingest(
                response
                    .headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok()),
            );
        }

        let body = response.bytes().await?;
        let graphql_response: GraphQLResponse<Value> = serde_json::from_slice(&body)?;

        debug!(
            status = %status,
            errors = graphql_response.errors().map_or(0, |e| e.len()),
            "Received GraphQL response"
        );

        Ok(graphql_response)
    }
}
