//! Source mappings handed to the client factory.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::document::{DocumentNode, TypedDocumentNode};

/// A value that can appear in a [`Source`].
///
/// Anything can be exported; only values that expose a parsed document
/// through [`as_document`](Export::as_document) become client operations.
pub trait Export: Send + Sync + 'static {
    /// The parsed document behind this value, if it is one.
    fn as_document(&self) -> Option<&DocumentNode> {
        None
    }
}

impl Export for DocumentNode {
    fn as_document(&self) -> Option<&DocumentNode> {
        Some(self)
    }
}

impl<R: 'static, V: 'static> Export for TypedDocumentNode<R, V> {
    fn as_document(&self) -> Option<&DocumentNode> {
        Some(&**self)
    }
}

impl<T: Export> Export for Arc<T> {
    fn as_document(&self) -> Option<&DocumentNode> {
        (**self).as_document()
    }
}

impl<T: Export> Export for Option<T> {
    fn as_document(&self) -> Option<&DocumentNode> {
        self.as_ref().and_then(|value| value.as_document())
    }
}

macro_rules! opaque_exports {
    ($($ty:ty),* $(,)?) => {
        $(impl Export for $ty {})*
    };
}

opaque_exports!(
    serde_json::Value,
    String,
    &'static str,
    bool,
    i32,
    i64,
    u32,
    u64,
    f64,
    (),
);

/// An ordered mapping of export names to values.
///
/// Iteration follows insertion order. Exporting an existing key replaces its
/// value in place.
#[derive(Default)]
pub struct Source {
    entries: IndexMap<String, Box<dyn Export>>,
}

impl Source {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an export.
    pub fn export(mut self, key: impl Into<String>, value: impl Export) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an export in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Export) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Look up an export.
    pub fn get(&self, key: &str) -> Option<&dyn Export> {
        self.entries.get(key).map(|value| value.as_ref())
    }

    /// Number of exports, documents or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all exports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Export)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Iterate over the exports that are parsed documents.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &DocumentNode)> {
        self.iter()
            .filter_map(|(key, value)| value.as_document().map(|doc| (key, doc)))
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(key, value)| (key, value.as_document().is_some())),
            )
            .finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Box<dyn Export>)> for Source {
    fn from_iter<I: IntoIterator<Item = (K, Box<dyn Export>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
