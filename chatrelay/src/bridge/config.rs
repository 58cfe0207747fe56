//! Configuration for the message bridge.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::errors::RelayError;

/// Configuration for relaying messages to the remote endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// The fixed endpoint messages are POSTed to. HTTPS in production.
    pub endpoint: String,
    /// Request timeout in milliseconds; the in-flight request is aborted
    /// when it elapses.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Primary reply field name in JSON responses.
    #[serde(default = "default_reply_field")]
    pub reply_field: String,
    /// Fallback reply field name, consulted when the primary is absent.
    #[serde(default = "default_reply_fallback_field")]
    pub reply_fallback_field: String,
    /// Text shown when a reply cannot be extracted from the response.
    #[serde(default = "default_reply_placeholder")]
    pub reply_placeholder: String,
}

fn default_timeout_ms() -> u64 {
    12_000
}

fn default_user_agent() -> String {
    "chatrelay/0.1".to_string()
}

fn default_reply_field() -> String {
    "reply".to_string()
}

fn default_reply_fallback_field() -> String {
    "message".to_string()
}

fn default_reply_placeholder() -> String {
    "reply pending…".to_string()
}

impl RelayConfig {
    /// Creates a configuration for an endpoint, with defaults for the rest.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
            reply_field: default_reply_field(),
            reply_fallback_field: default_reply_fallback_field(),
            reply_placeholder: default_reply_placeholder(),
        }
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the reply placeholder text.
    #[must_use]
    pub fn with_reply_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.reply_placeholder = placeholder.into();
        self
    }

    /// Gets the timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks that the endpoint is a usable http(s) URL.
    pub fn validate(&self) -> Result<(), RelayError> {
        let url = Url::parse(&self.endpoint).map_err(|err| RelayError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: err.to_string(),
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(RelayError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RelayConfig::new("https://relay.example.com/fire");
        assert_eq!(config.timeout_ms, 12_000);
        assert_eq!(config.reply_field, "reply");
        assert_eq!(config.reply_fallback_field, "message");
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = RelayConfig::new("https://relay.example.com/fire")
            .with_timeout_ms(500)
            .with_user_agent("widget/2.0")
            .with_header("X-Widget", "chat");

        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.user_agent, "widget/2.0");
        assert_eq!(config.headers.get("X-Widget"), Some(&"chat".to_string()));
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let config: RelayConfig =
            serde_json::from_str(r#"{"endpoint": "https://relay.example.com/fire"}"#).unwrap();

        assert_eq!(config.timeout_ms, 12_000);
        assert_eq!(config.reply_placeholder, "reply pending…");
    }

    #[test]
    fn test_validate_accepts_https() {
        assert!(RelayConfig::new("https://relay.example.com/fire").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let err = RelayConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, crate::errors::RelayError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_validate_rejects_unsupported_scheme() {
        let err = RelayConfig::new("ftp://relay.example.com").validate().unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}
