//! Settings for the bundled `UreqTransport`.
//!
//! The facade itself takes no configuration; everything here shapes how
//! requests leave the process.

use serde::{Deserialize, Serialize};

/// Base URL, default headers, and status handling for `UreqTransport`.
///
/// Every field has a default, so a host can deserialize a partial document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Prepended to every request path. A trailing `/` is ignored.
    pub base_url: String,
    /// Sent with every request, in order.
    pub headers: Vec<(String, String)>,
    /// Treat non-2xx responses as transport errors instead of returning them.
    pub status_as_error: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: Vec::new(),
            status_as_error: true,
        }
    }
}

impl HttpConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_as_error(mut self, enabled: bool) -> Self {
        self.status_as_error = enabled;
        self
    }

    /// Join the base URL and a `/`-prefixed request path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = HttpConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.url_for("/users"), "http://localhost:3000/users");
    }

    #[test]
    fn deserialized_base_url_joins_cleanly() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"base_url": "http://api.test/v1/"}"#).unwrap();
        assert_eq!(config.url_for("/items"), "http://api.test/v1/items");
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"headers": [["x-client", "facade"]]}"#).unwrap();
        assert!(config.status_as_error);
        assert_eq!(config.headers, vec![("x-client".to_string(), "facade".to_string())]);
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn builder_sets_headers_and_status_mode() {
        let config = HttpConfig::new("http://h")
            .with_header("accept", "application/json")
            .status_as_error(false);
        assert_eq!(config.headers.len(), 1);
        assert!(!config.status_as_error);
    }
}
