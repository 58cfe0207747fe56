//! Transport trait and the HTTP implementation.

use async_trait::async_trait;
use reqwest::header;
use reqwest::Client;

use super::config::RelayConfig;
use super::payload::OutboundMessage;
use crate::errors::RelayError;

/// What came back from the endpoint, regardless of status.
///
/// Status interpretation is left to the bridge; the transport only fails on
/// transport-level errors.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Lowercased content type, if the endpoint sent one.
    pub content_type: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl RelayResponse {
    /// Whether the status is in the success range (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the endpoint declared a JSON body.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

/// Protocol for posting payloads to the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Posts one payload and returns the response.
    ///
    /// Implementations must not interpret non-success statuses as errors;
    /// only transport-level failures map to `Err`.
    async fn post(
        &self,
        payload: &OutboundMessage,
        config: &RelayConfig,
    ) -> Result<RelayResponse, RelayError>;
}

/// HTTP transport backed by a shared reqwest client.
///
/// Sends no cookies or credentials, follows redirects, and asks caches to
/// stand aside. Timeouts are enforced by the bridge's cancellation race, not
/// here.
#[derive(Debug, Clone, Default)]
pub struct HttpRelayTransport {
    client: Client,
}

impl HttpRelayTransport {
    /// Creates a transport with a fresh client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport reusing an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn post(
        &self,
        payload: &OutboundMessage,
        config: &RelayConfig,
    ) -> Result<RelayResponse, RelayError> {
        let mut request = self
            .client
            .post(&config.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-store")
            .header(header::USER_AGENT, &config.user_agent)
            .json(payload);

        for (key, value) in &config.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);
        let body = response.text().await.unwrap_or_default();

        Ok(RelayResponse {
            status,
            content_type,
            body,
        })
    }
}
