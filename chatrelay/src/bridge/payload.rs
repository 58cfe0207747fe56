//! The outbound wire payload and reply extraction.

use serde::{Deserialize, Serialize};

use super::config::RelayConfig;
use super::transport::RelayResponse;
use crate::context::IdentityContext;
use crate::utils::epoch_millis;

/// The JSON body POSTed to the relay endpoint.
///
/// Field names are the wire names; `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The resolved user identifier (or the sentinel).
    pub openid: String,
    /// The session trace token.
    pub trace_id: String,
    /// The trimmed user message.
    pub message: String,
    /// Send time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl OutboundMessage {
    /// Builds a payload from the published identity context, stamped with
    /// the current time.
    #[must_use]
    pub fn new(identity: &IdentityContext, message: impl Into<String>) -> Self {
        Self {
            openid: identity.user_id().to_string(),
            trace_id: identity.trace_id().to_string(),
            message: message.into(),
            timestamp: epoch_millis(),
        }
    }
}

/// Extracts the reply text from a successful response.
///
/// JSON bodies are checked under the primary reply field, then the fallback
/// field; an empty or missing value falls through. Non-JSON bodies are used
/// verbatim. When nothing usable remains, the configured placeholder is
/// returned.
#[must_use]
pub fn extract_reply(response: &RelayResponse, config: &RelayConfig) -> String {
    if response.is_json() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
            for field in [&config.reply_field, &config.reply_fallback_field] {
                if let Some(text) = value.get(field).and_then(serde_json::Value::as_str) {
                    if !text.is_empty() {
                        return text.to_string();
                    }
                }
            }
        }
        return config.reply_placeholder.clone();
    }

    if response.body.is_empty() {
        config.reply_placeholder.clone()
    } else {
        response.body.clone()
    }
}
