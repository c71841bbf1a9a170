//! GraphQL request payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// GraphQL request body sent by the default transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLRequest {
    /// The printed GraphQL document.
    pub query: String,
    /// Variables for the operation, always a JSON object.
    pub variables: Value,
}

impl GraphQLRequest {
    /// Create a new request. A `null` variables value becomes `{}`.
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        let variables = match variables {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        Self {
            query: query.into(),
            variables,
        }
    }
}
