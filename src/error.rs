//! Errors raised by clients and transports.

use thiserror::Error;

use crate::GraphQLResponseError;

pub type Result<T> = std::result::Result<T, GraphQLError>;

/// Everything that can make a call fail.
///
/// Errors reported by the server inside a response body are not failures;
/// they arrive in [`GraphQLResponse::errors`](crate::GraphQLResponse::errors)
/// and only become [`GraphQLError::GraphQL`] through
/// [`GraphQLResponse::into_result`](crate::GraphQLResponse::into_result).
#[derive(Debug, Error)]
pub enum GraphQLError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A body or variables value was not valid JSON for the expected type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server returned {} error(s): {}", .0.len(), join_messages(.0))]
    GraphQL(Vec<GraphQLResponseError>),

    /// The bound document contained no query or mutation definition.
    #[error("No such operation in document `{0}`")]
    NoSuchOperation(String),

    /// The client has no operation under the requested call name.
    #[error("Unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("invalid GraphQL document: {0}")]
    Document(String),

    #[error("invalid endpoint URL {0}")]
    InvalidUrl(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

fn join_messages(errors: &[GraphQLResponseError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl GraphQLError {
    /// The transport failed to exchange a request and response.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// The call never reached the transport because the operation could not
    /// be resolved.
    pub fn is_operation_error(&self) -> bool {
        matches!(self, Self::NoSuchOperation(_) | Self::UnknownOperation(_))
    }

    /// Server-reported errors carried by [`GraphQLError::GraphQL`].
    pub fn graphql_errors(&self) -> Option<&[GraphQLResponseError]> {
        if let Self::GraphQL(errors) = self {
            Some(errors)
        } else {
            None
        }
    }
}
