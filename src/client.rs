//! GraphQL client factory.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    DefaultFetcher, Fetcher, FetcherBinding, FetcherOptions, GraphQLClientConfig, GraphQLError,
    GraphQLResponse, Operation, Queryable, Result, Source, call_name,
};

/// A set of operations bound to one endpoint, keyed by call name.
///
/// Built from a [`Source`]: every export that is a parsed document becomes
/// one [`Queryable`] under [`call_name`] of its key. Everything else in the
/// source is ignored.
#[derive(Clone)]
pub struct GraphQLClient {
    endpoint: String,
    operations: IndexMap<String, Queryable>,
}

impl GraphQLClient {
    /// Build a client over the default transport.
    pub fn new(source: Source, endpoint: impl Into<String>) -> Self {
        Self::builder(endpoint).build(source)
    }

    /// Create a client builder.
    pub fn builder(endpoint: impl Into<String>) -> GraphQLClientBuilder {
        GraphQLClientBuilder::new(endpoint)
    }

    /// The endpoint operations were bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get an operation by call name.
    pub fn get(&self, name: &str) -> Option<&Queryable> {
        self.operations.get(name)
    }

    /// Check if an operation exists.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Call names, in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the client has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Call an operation with untyped variables.
    pub async fn call<V: Serialize>(
        &self,
        name: &str,
        variables: V,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        self.queryable(name)?.call(variables, options).await
    }

    /// Call an operation with the variables and result types of `O`.
    pub async fn call_typed<O: Operation>(
        &self,
        name: &str,
        variables: O::Variables,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<O::Result>> {
        self.queryable(name)?.call_as(variables, options).await
    }

    fn queryable(&self, name: &str) -> Result<&Queryable> {
        self.get(name)
            .ok_or_else(|| GraphQLError::UnknownOperation(name.to_string()))
    }
}

impl fmt::Debug for GraphQLClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("endpoint", &self.endpoint)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`GraphQLClient`].
pub struct GraphQLClientBuilder {
    endpoint: String,
    fetcher: Option<Arc<dyn Fetcher>>,
    options: Option<FetcherOptions>,
    config: Option<GraphQLClientConfig>,
}

impl GraphQLClientBuilder {
    /// Create a builder for an endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetcher: None,
            options: None,
            config: None,
        }
    }

    /// Use a custom fetcher instead of [`DefaultFetcher`].
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Use a shared fetcher.
    pub fn shared_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Set client-level options.
    pub fn options(mut self, options: FetcherOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Configure the default transport. Ignored when a custom fetcher is set.
    pub fn config(mut self, config: GraphQLClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Bind every document in `source`.
    ///
    /// Never fails: a document without a query or mutation is bound to a
    /// queryable that fails when called. When two keys derive the same call
    /// name, the later one in source order wins.
    pub fn build(self, source: Source) -> GraphQLClient {
        let fetcher = self.fetcher.unwrap_or_else(|| {
            Arc::new(DefaultFetcher::new(self.config.unwrap_or_default()))
        });

        let mut operations = IndexMap::new();
        for (key, value) in source.iter() {
            let Some(document) = value.as_document() else {
                trace!(export = %key, "Skipping non-document export");
                continue;
            };

            let queryable = match document.first_operation() {
                Some(operation) => fetcher.bind(FetcherBinding {
                    endpoint: self.endpoint.clone(),
                    document: document.clone(),
                    operation_type: operation.operation_type,
                    operation_name: operation.name.map(str::to_string),
                    options: self.options.clone(),
                }),
                None => {
                    trace!(export = %key, "Document has no query or mutation");
                    Queryable::missing_operation(key)
                }
            };

            operations.insert(call_name(key), queryable);
        }

        debug!(
            endpoint = %self.endpoint,
            operations = operations.len(),
            "Built GraphQL client"
        );

        GraphQLClient {
            endpoint: self.endpoint,
            operations,
        }
    }
}
