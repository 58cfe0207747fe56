//! Test doubles for the bridge's collaborators.
//!
//! These are exported so embedders can exercise their wiring without a live
//! endpoint or a real UI.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::bridge::{OutboundMessage, RelayConfig, RelayResponse, RelayTransport};
use crate::errors::RelayError;
use crate::surface::ChatSurface;

/// A transport that replays scripted responses and records payloads.
///
/// With an empty script it answers `200` with an empty JSON object.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<RelayResponse, RelayError>>>,
    payloads: Mutex<Vec<OutboundMessage>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response to replay.
    pub fn push_response(&self, response: RelayResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queues an error to replay.
    pub fn push_error(&self, error: RelayError) {
        self.script.lock().push_back(Err(error));
    }

    /// Builds a `200` response with a JSON body.
    #[must_use]
    pub fn json_ok(body: &str) -> RelayResponse {
        RelayResponse {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    /// Builds a `200` response with a plain-text body.
    #[must_use]
    pub fn text_ok(body: &str) -> RelayResponse {
        RelayResponse {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: body.to_string(),
        }
    }

    /// Builds a response with an arbitrary status.
    #[must_use]
    pub fn status(code: u16, body: &str) -> RelayResponse {
        RelayResponse {
            status: code,
            content_type: Some("text/plain".to_string()),
            body: body.to_string(),
        }
    }

    /// Returns every payload the bridge posted.
    #[must_use]
    pub fn recorded_payloads(&self) -> Vec<OutboundMessage> {
        self.payloads.lock().clone()
    }

    /// Returns the number of posts received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.payloads.lock().len()
    }
}

#[async_trait]
impl RelayTransport for MockTransport {
    async fn post(
        &self,
        payload: &OutboundMessage,
        _config: &RelayConfig,
    ) -> Result<RelayResponse, RelayError> {
        self.payloads.lock().push(payload.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::json_ok("{}")))
    }
}

/// A transport that sleeps before answering.
///
/// With a delay beyond the bridge timeout it models an endpoint that never
/// responds within the window.
#[derive(Debug)]
pub struct SlowTransport {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowTransport {
    /// Creates a slow transport.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a slow transport with delay in milliseconds.
    #[must_use]
    pub fn with_delay_ms(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Returns the number of posts received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayTransport for SlowTransport {
    async fn post(
        &self,
        _payload: &OutboundMessage,
        _config: &RelayConfig,
    ) -> Result<RelayResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(MockTransport::json_ok(r#"{"reply": "late"}"#))
    }
}

/// A transport that always fails at the transport level.
#[derive(Debug)]
pub struct FailingTransport {
    error: String,
}

impl FailingTransport {
    /// Creates a failing transport.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl Default for FailingTransport {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

#[async_trait]
impl RelayTransport for FailingTransport {
    async fn post(
        &self,
        _payload: &OutboundMessage,
        _config: &RelayConfig,
    ) -> Result<RelayResponse, RelayError> {
        Err(RelayError::Transport(self.error.clone()))
    }
}

/// A surface with settable input that records what the bridge does to it.
#[derive(Debug)]
pub struct ScriptedSurface {
    input: Mutex<String>,
    enabled: AtomicBool,
    clears: AtomicUsize,
    focuses: AtomicUsize,
    disables: AtomicUsize,
}

impl ScriptedSurface {
    /// Creates a surface with empty input and the send control enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: Mutex::new(String::new()),
            enabled: AtomicBool::new(true),
            clears: AtomicUsize::new(0),
            focuses: AtomicUsize::new(0),
            disables: AtomicUsize::new(0),
        }
    }

    /// Creates a surface pre-filled with input text.
    #[must_use]
    pub fn with_input(text: impl Into<String>) -> Self {
        let surface = Self::new();
        *surface.input.lock() = text.into();
        surface
    }

    /// Replaces the input text, as typing would.
    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock() = text.into();
    }

    /// Whether the send control is currently enabled.
    #[must_use]
    pub fn send_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// How many times the input was cleared.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// How many times focus was returned to the input.
    #[must_use]
    pub fn focus_count(&self) -> usize {
        self.focuses.load(Ordering::SeqCst)
    }

    /// How many times the send control was disabled.
    #[must_use]
    pub fn disable_count(&self) -> usize {
        self.disables.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSurface for ScriptedSurface {
    fn read_input(&self) -> String {
        self.input.lock().clone()
    }

    fn clear_input(&self) {
        self.input.lock().clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn focus_input(&self) {
        self.focuses.fetch_add(1, Ordering::SeqCst);
    }

    fn set_send_enabled(&self, enabled: bool) {
        if !enabled {
            self.disables.fetch_add(1, Ordering::SeqCst);
        }
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}
