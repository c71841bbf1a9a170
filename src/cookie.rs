//! In-memory session cookie store.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::trace;

/// A flat, in-memory cookie jar shared between calls.
///
/// Clones share the same cookies. There is no expiry and no path or domain
/// scoping. When responses to concurrent calls set the same cookie, the one
/// processed last wins.
#[derive(Clone, Default)]
pub struct CookieStore {
    cookies: Arc<Mutex<IndexMap<String, String>>>,
}

impl CookieStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cookie value.
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().get(name).cloned()
    }

    /// Set a cookie, replacing any previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.lock().insert(name.into(), value.into());
    }

    /// Remove a cookie.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.cookies.lock().shift_remove(name)
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.cookies.lock().is_empty()
    }

    /// Remove every cookie.
    pub fn clear(&self) {
        self.cookies.lock().clear();
    }

    /// Render the store as a `Cookie` header value.
    ///
    /// Pairs are `name=value`, in insertion order, joined with `;` and not
    /// encoded.
    pub fn serialize(&self) -> String {
        self.cookies
            .lock()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Store every cookie found in a set of `Set-Cookie` header values.
    pub fn ingest<'a>(&self, headers: impl IntoIterator<Item = &'a str>) {
        for header in headers {
            if let Some((name, value)) = Self::parse_set_cookie(header) {
                trace!(cookie = %name, "Storing cookie from response");
                self.set(name, value);
            }
        }
    }

    /// Extract the `name=value` pair of a `Set-Cookie` header value.
    ///
    /// Attributes after the first `;` are dropped and the pair is split on
    /// its first `=`. Returns `None` when there is no `=` or no name.
    pub fn parse_set_cookie(header: &str) -> Option<(String, String)> {
        let pair = header.split(';').next().unwrap_or_default();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.trim().to_string()))
    }
}

impl fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieStore")
            .field("names", &self.cookies.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_in_insertion_order() {
        let store = CookieStore::new();
        store.set("session", "1");
        store.set("theme", "dark");
        store.set("session", "2");

        assert_eq!(store.serialize(), "session=2;theme=dark");
        assert_eq!(store.get("session").as_deref(), Some("2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_store_serializes_empty() {
        let store = CookieStore::new();
        assert!(store.is_empty());
        assert_eq!(store.serialize(), "");
    }

    #[test]
    fn test_parse_set_cookie() {
        assert_eq!(
            CookieStore::parse_set_cookie("session=1"),
            Some(("session".to_string(), "1".to_string()))
        );
        assert_eq!(
            CookieStore::parse_set_cookie("token=YWJj==; Path=/; HttpOnly"),
            Some(("token".to_string(), "YWJj==".to_string()))
        );
        assert_eq!(CookieStore::parse_set_cookie("HttpOnly"), None);
        assert_eq!(CookieStore::parse_set_cookie("=orphan"), None);
    }

    #[test]
    fn test_ingest_overwrites_and_skips_invalid() {
        let store = CookieStore::new();
        store.set("session", "0");
        store.ingest(["session=1; Path=/", "garbage", "lang=en"]);

        assert_eq!(store.serialize(), "session=1;lang=en");
    }

    #[test]
    fn test_clear() {
        let store = CookieStore::new();
        store.ingest(["session=1", "lang=en"]);
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.serialize(), "");
    }

    #[test]
    fn test_clones_share_cookies() {
        let store = CookieStore::new();
        let handle = store.clone();
        handle.set("session", "1");

        assert_eq!(store.get("session").as_deref(), Some("1"));
        assert_eq!(store.remove("session").as_deref(), Some("1"));
        assert!(handle.is_empty());
    }
}
