//! Pluggable transports.
//!
//! A [`Fetcher`] binds one operation document to an endpoint and returns a
//! [`Queryable`]. Binding must not perform I/O; requests happen only when
//! the queryable is invoked.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{DocumentNode, FetcherOptions, GraphQLError, GraphQLResponse, OperationType, Result};

/// Everything a fetcher receives when binding an operation.
#[derive(Debug, Clone)]
pub struct FetcherBinding {
    /// Endpoint the operation is sent to.
    pub endpoint: String,
    /// The document holding the operation.
    pub document: DocumentNode,
    /// Query or mutation.
    pub operation_type: OperationType,
    /// Declared operation name, if any.
    pub operation_name: Option<String>,
    /// Client-level options.
    pub options: Option<FetcherOptions>,
}

/// Transport strategy used by the client factory.
///
/// Implemented for [`DefaultFetcher`](crate::DefaultFetcher) and for any
/// `Fn(FetcherBinding) -> Queryable` closure.
pub trait Fetcher: Send + Sync {
    /// Bind one operation. Called once per operation at client construction.
    fn bind(&self, binding: FetcherBinding) -> Queryable;
}

impl<F> Fetcher for F
where
    F: Fn(FetcherBinding) -> Queryable + Send + Sync,
{
    fn bind(&self, binding: FetcherBinding) -> Queryable {
        self(binding)
    }
}

/// One executable operation.
#[async_trait]
pub trait Query: Send + Sync {
    /// Execute the operation with JSON variables and optional call-level
    /// options.
    async fn execute(
        &self,
        variables: Value,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>>;
}

struct FnQuery<F>(F);

#[async_trait]
impl<F, Fut> Query for FnQuery<F>
where
    F: Fn(Value, Option<FetcherOptions>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<GraphQLResponse<Value>>> + Send,
{
    async fn execute(
        &self,
        variables: Value,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        (self.0)(variables, options).await
    }
}

/// Stands in for a document that has no query or mutation.
struct MissingOperation {
    key: String,
}

#[async_trait]
impl Query for MissingOperation {
    async fn execute(
        &self,
        _variables: Value,
        _options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        Err(GraphQLError::NoSuchOperation(self.key.clone()))
    }
}

/// A callable bound to one operation and one transport.
#[derive(Clone)]
pub struct Queryable {
    query: Arc<dyn Query>,
}

impl Queryable {
    /// Wrap a [`Query`] implementation.
    pub fn new(query: impl Query + 'static) -> Self {
        Self {
            query: Arc::new(query),
        }
    }

    /// Wrap an async closure.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, Option<FetcherOptions>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GraphQLResponse<Value>>> + Send + 'static,
    {
        Self::new(FnQuery(f))
    }

    /// A queryable whose every invocation fails with
    /// [`GraphQLError::NoSuchOperation`].
    pub(crate) fn missing_operation(key: impl Into<String>) -> Self {
        Self::new(MissingOperation { key: key.into() })
    }

    /// Invoke with raw JSON variables.
    pub async fn execute(
        &self,
        variables: Value,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        self.query.execute(variables, options).await
    }

    /// Invoke with any serializable variables.
    pub async fn call<V: Serialize>(
        &self,
        variables: V,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<Value>> {
        let variables = serde_json::to_value(variables)?;
        self.execute(variables, options).await
    }

    /// Invoke and deserialize the response data into `R`.
    pub async fn call_as<R: DeserializeOwned, V: Serialize>(
        &self,
        variables: V,
        options: Option<FetcherOptions>,
    ) -> Result<GraphQLResponse<R>> {
        self.call(variables, options).await?.into_typed()
    }
}

impl fmt::Debug for Queryable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queryable").finish_non_exhaustive()
    }
}
