//! Response payloads.
//!
//! GraphQL execution errors are part of a successful response. Nothing in
//! this crate turns them into [`GraphQLError`]s unless the caller asks via
//! [`GraphQLResponse::into_result`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{GraphQLError, Result};

/// The JSON body returned for one operation.
///
/// Deserialization never rejects a JSON object. An `errors` value that is not
/// a list is read as a single entry, and keys outside `data`, `errors` and
/// `extensions` are kept in [`extra`](Self::extra).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphQLResponse<T = Value> {
    /// Operation result. `None` when absent or `null`.
    #[serde(default)]
    pub data: Option<T>,
    /// Execution errors, absent on success.
    #[serde(
        default,
        deserialize_with = "deserialize_errors",
        skip_serializing_if = "Option::is_none"
    )]
    pub errors: Option<Vec<GraphQLResponseError>>,
    /// Server-defined extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    /// Any other top-level keys of the body.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

fn deserialize_errors<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<GraphQLResponseError>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => None,
        Some(Value::Array(entries)) => {
            Some(entries.into_iter().map(GraphQLResponseError::from).collect())
        }
        Some(entry) => Some(vec![GraphQLResponseError::from(entry)]),
    })
}

impl<T> GraphQLResponse<T> {
    /// True when the server reported at least one error.
    pub fn has_errors(&self) -> bool {
        matches!(&self.errors, Some(errors) if !errors.is_empty())
    }

    /// Errors reported by the server.
    pub fn errors(&self) -> Option<&[GraphQLResponseError]> {
        self.errors.as_deref()
    }

    /// The data, discarding errors and extensions.
    pub fn data(self) -> Option<T> {
        self.data
    }

    /// The data, or the server's errors as [`GraphQLError::GraphQL`].
    ///
    /// A response with neither data nor errors is a [`GraphQLError::Json`].
    pub fn into_result(self) -> Result<T> {
        match (self.data, self.errors) {
            (_, Some(errors)) if !errors.is_empty() => Err(GraphQLError::GraphQL(errors)),
            (Some(data), _) => Ok(data),
            (None, _) => Err(GraphQLError::Json(serde::de::Error::custom(
                "response contained no data",
            ))),
        }
    }

    /// Transform the data, keeping errors and extensions.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> GraphQLResponse<U> {
        GraphQLResponse {
            data: self.data.map(f),
            errors: self.errors,
            extensions: self.extensions,
            extra: self.extra,
        }
    }
}

impl GraphQLResponse<Value> {
    /// Deserialize the raw data into an operation's result type.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<GraphQLResponse<T>> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };

        Ok(GraphQLResponse {
            data,
            errors: self.errors,
            extensions: self.extensions,
            extra: self.extra,
        })
    }
}

/// One entry of a response's `errors` list.
///
/// Read leniently from any JSON value: a non-string `message` is kept as its
/// JSON text, unreadable locations are skipped and path segments that are
/// neither indices nor names become [`PathSegment::Field`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value")]
pub struct GraphQLResponseError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl From<Value> for GraphQLResponseError {
    fn from(entry: Value) -> Self {
        let mut fields = match entry {
            Value::Object(fields) => fields,
            other => {
                return Self {
                    message: text_of(other),
                    locations: None,
                    path: None,
                    extensions: None,
                };
            }
        };

        let locations = match fields.remove("locations") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => None,
        };

        let path = match fields.remove("path") {
            Some(Value::Array(items)) => Some(items.into_iter().map(PathSegment::from).collect()),
            _ => None,
        };

        Self {
            message: fields.remove("message").map(text_of).unwrap_or_default(),
            locations,
            path,
            extensions: fields.remove("extensions").filter(|value| !value.is_null()),
        }
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl fmt::Display for GraphQLResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        let locations = self.locations.as_deref().unwrap_or_default();
        if !locations.is_empty() {
            let rendered: Vec<String> = locations.iter().map(ToString::to_string).collect();
            write!(f, " at {}", rendered.join(", "))?;
        }

        Ok(())
    }
}

/// Line and column of an error in the document, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A response path element: a list index or a field name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl From<Value> for PathSegment {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(ref n) => match n.as_u64().and_then(|n| usize::try_from(n).ok()) {
                Some(index) => PathSegment::Index(index),
                None => PathSegment::Field(value.to_string()),
            },
            other => PathSegment::Field(text_of(other)),
        }
    }
}

/// Render an error path, e.g. `books[0].title`.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
        }
    }
    out
}
