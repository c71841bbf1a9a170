//! Client-level and call-level fetcher options.
//!
//! Options come in two layers: the client layer given once to
//! [`GraphQLClientBuilder::options`](crate::GraphQLClientBuilder::options)
//! and the call layer given to each invocation. [`FetcherOptions::layered`]
//! merges them with the call layer winning key by key.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::warn;

use crate::CookieStore;

/// Credentials mode of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// Never send cookies, even when a cookie store is configured.
    Omit,
    /// Send cookies to the configured endpoint.
    SameOrigin,
    /// Always send cookies.
    Include,
}

/// Transport-level request options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Extra request headers.
    pub headers: HeaderMap,
    /// Credentials mode.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Custom fields for custom fetchers.
    pub extensions: Map<String, Value>,
}

impl FetchOptions {
    /// Create empty fetch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Invalid names or values are dropped with a warning.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let (name, value) = (name.as_ref(), value.as_ref());
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = %name, "Dropping invalid header from fetch options"),
        }
        self
    }

    /// Set the credentials mode.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom field.
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Merge `overrides` over `self`.
    ///
    /// Headers merge per header name, so an overriding name replaces every
    /// value of that name. Extensions merge per key. Every other option is
    /// taken from `overrides` when set there.
    pub fn merged(&self, overrides: &FetchOptions) -> FetchOptions {
        let mut headers = self.headers.clone();
        for name in overrides.headers.keys() {
            headers.remove(name);
            for value in overrides.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let mut extensions = self.extensions.clone();
        extensions.extend(
            overrides
                .extensions
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        FetchOptions {
            headers,
            credentials: overrides.credentials.or(self.credentials),
            timeout: overrides.timeout.or(self.timeout),
            extensions,
        }
    }
}

/// Options understood by fetchers.
#[derive(Clone, Default)]
pub struct FetcherOptions {
    /// Transport-level request options.
    pub fetch_options: FetchOptions,
    /// Session cookie store.
    pub cookie_store: Option<CookieStore>,
    context: Option<Arc<dyn Any + Send + Sync>>,
}

impl FetcherOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch options.
    pub fn fetch_options(mut self, fetch_options: FetchOptions) -> Self {
        self.fetch_options = fetch_options;
        self
    }

    /// Add a header to the fetch options.
    ///
    /// A `cookie` header is sent ahead of the active cookie store's cookies
    /// in the same header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.fetch_options = self.fetch_options.header(name, value);
        self
    }

    /// Set the credentials mode of the fetch options.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.fetch_options.credentials = Some(credentials);
        self
    }

    /// Use a cookie store.
    pub fn cookie_store(mut self, store: CookieStore) -> Self {
        self.cookie_store = Some(store);
        self
    }

    /// Attach caller data for a custom fetcher.
    pub fn context<T: Any + Send + Sync>(mut self, context: T) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// Caller data, if present and of type `T`.
    pub fn get_context<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.as_deref()?.downcast_ref()
    }

    /// Check if caller data is attached.
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Merge call-level options over client-level options.
    pub fn layered(client: Option<&FetcherOptions>, call: Option<&FetcherOptions>) -> FetcherOptions {
        match (client, call) {
            (None, None) => FetcherOptions::default(),
            (Some(options), None) | (None, Some(options)) => options.clone(),
            (Some(client), Some(call)) => FetcherOptions {
                fetch_options: client.fetch_options.merged(&call.fetch_options),
                cookie_store: call
                    .cookie_store
                    .clone()
                    .or_else(|| client.cookie_store.clone()),
                context: call.context.clone().or_else(|| client.context.clone()),
            },
        }
    }

    /// The cookie store that should take part in a request, honouring
    /// [`Credentials::Omit`].
    pub fn active_cookie_store(&self) -> Option<&CookieStore> {
        match self.fetch_options.credentials {
            Some(Credentials::Omit) => None,
            _ => self.cookie_store.as_ref(),
        }
    }
}

impl fmt::Debug for FetcherOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherOptions")
            .field("fetch_options", &self.fetch_options)
            .field("cookie_store", &self.cookie_store)
            .field("context", &self.context.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_headers_override_client_headers() {
        let client = FetcherOptions::new()
            .header("x-api-version", "1")
            .header("x-tenant", "acme");
        let call = FetcherOptions::new().header("X-Api-Version", "2");

        let merged = FetcherOptions::layered(Some(&client), Some(&call));
        let headers = &merged.fetch_options.headers;

        assert_eq!(headers.get("x-api-version").unwrap(), "2");
        assert_eq!(headers.get("x-tenant").unwrap(), "acme");
        assert_eq!(headers.get_all("x-api-version").iter().count(), 1);

        // The client layer is untouched.
        assert_eq!(client.fetch_options.headers.get("x-api-version").unwrap(), "1");
    }

    #[test]
    fn test_non_header_options_last_write_wins() {
        let client = FetchOptions::new()
            .credentials(Credentials::Include)
            .timeout(Duration::from_secs(5))
            .extension("mode", "cors");
        let call = FetchOptions::new()
            .credentials(Credentials::Omit)
            .extension("cache", "no-store");

        let merged = client.merged(&call);
        assert_eq!(merged.credentials, Some(Credentials::Omit));
        assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
        assert_eq!(merged.extensions["mode"], "cors");
        assert_eq!(merged.extensions["cache"], "no-store");
    }

    #[test]
    fn test_call_cookie_store_takes_precedence() {
        let client_store = CookieStore::new();
        client_store.set("owner", "client");
        let call_store = CookieStore::new();
        call_store.set("owner", "call");

        let client = FetcherOptions::new().cookie_store(client_store);
        let call = FetcherOptions::new().cookie_store(call_store);

        let merged = FetcherOptions::layered(Some(&client), Some(&call));
        let store = merged.active_cookie_store().unwrap();
        assert_eq!(store.get("owner").as_deref(), Some("call"));

        let inherited = FetcherOptions::layered(Some(&client), Some(&FetcherOptions::new()));
        let store = inherited.active_cookie_store().unwrap();
        assert_eq!(store.get("owner").as_deref(), Some("client"));

        assert!(FetcherOptions::layered(None, None).active_cookie_store().is_none());
    }

    #[test]
    fn test_omit_credentials_disables_cookie_store() {
        let options = FetcherOptions::new()
            .cookie_store(CookieStore::new())
            .credentials(Credentials::Omit);

        assert!(options.cookie_store.is_some());
        assert!(options.active_cookie_store().is_none());
    }

    #[test]
    fn test_context_passthrough() {
        #[derive(Debug, PartialEq)]
        struct Tenant(&'static str);

        assert!(!FetcherOptions::new().has_context());

        let client = FetcherOptions::new().context(Tenant("acme"));
        assert!(client.has_context());
        let merged = FetcherOptions::layered(Some(&client), Some(&FetcherOptions::new()));

        assert_eq!(merged.get_context::<Tenant>(), Some(&Tenant("acme")));
        assert!(merged.get_context::<String>().is_none());

        let call = FetcherOptions::new().context(Tenant("globex"));
        let merged = FetcherOptions::layered(Some(&client), Some(&call));
        assert_eq!(merged.get_context::<Tenant>(), Some(&Tenant("globex")));
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let options = FetchOptions::new().header("bad header", "x").header("x-ok", "1");
        assert_eq!(options.headers.len(), 1);
    }
}
