//! The message bridge.
//!
//! Wires the chat surface to the relay endpoint: reads and trims the input,
//! tags it with the published identity context, POSTs it with a timeout, and
//! appends the outcome to the transcript. At most one send is in flight per
//! bridge instance, enforced by an explicit atomic flag (the surface's
//! disabled send control mirrors it).

mod config;
#[cfg(test)]
mod integration_tests;
mod payload;
mod transport;

pub use config::RelayConfig;
pub use payload::{extract_reply, OutboundMessage};
pub use transport::{HttpRelayTransport, RelayResponse, RelayTransport};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cancellation::CancellationToken;
use crate::context::IdentityContext;
use crate::errors::RelayError;
use crate::observability::{SendSpanAttributes, SpanTimer};
use crate::surface::ChatSurface;
use crate::transcript::{TranscriptEntry, TranscriptSink};

/// Transcript notice for aborted requests (timeout or cancellation).
const ABORT_NOTICE: &str = "request timed out, please retry";
/// Transcript notice for transport failures.
const NETWORK_NOTICE: &str = "network error, please retry";
/// Reason recorded on the token when the timer fires.
const TIMEOUT_REASON: &str = "timeout";

/// The result of one send cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; no request, no transcript entry.
    Empty,
    /// A send was already in flight; the trigger was inert.
    Busy,
    /// The endpoint replied; the reply text was appended to the transcript.
    Delivered(String),
    /// The cycle failed; a system notice was appended to the transcript.
    Failed(RelayError),
}

impl SendOutcome {
    /// Whether a reply was delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Relays messages from a chat surface to the remote endpoint.
pub struct MessageBridge {
    config: RelayConfig,
    identity: IdentityContext,
    surface: Arc<dyn ChatSurface>,
    transcript: Arc<dyn TranscriptSink>,
    transport: Arc<dyn RelayTransport>,
    in_flight: AtomicBool,
}

impl MessageBridge {
    /// Creates a bridge from already-validated collaborators.
    #[must_use]
    pub fn new(
        config: RelayConfig,
        identity: IdentityContext,
        surface: Arc<dyn ChatSurface>,
        transcript: Arc<dyn TranscriptSink>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        Self {
            config,
            identity,
            surface,
            transcript,
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Binds a bridge to its collaborators, validating the configuration.
    ///
    /// A missing surface or transcript aborts initialization with a warning
    /// and yields `None` - the page simply has no working widget, which is
    /// not a crash. A missing identity context falls back to an anonymous
    /// one with a fabricated trace token.
    #[must_use]
    pub fn bind(
        config: RelayConfig,
        identity: Option<IdentityContext>,
        surface: Option<Arc<dyn ChatSurface>>,
        transcript: Option<Arc<dyn TranscriptSink>>,
        transport: Arc<dyn RelayTransport>,
    ) -> Option<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "message bridge not initialized");
            return None;
        }

        let Some(surface) = surface else {
            warn!("message bridge not initialized: no input surface bound");
            return None;
        };

        let Some(transcript) = transcript else {
            warn!("message bridge not initialized: no transcript sink bound");
            return None;
        };

        let identity = identity.unwrap_or_else(|| {
            warn!("no identity context published, falling back to anonymous");
            IdentityContext::fallback()
        });

        Some(Self::new(config, identity, surface, transcript, transport))
    }

    /// The published identity context this bridge tags messages with.
    #[must_use]
    pub fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    /// Whether a send is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one send cycle with an internally managed cancellation token.
    ///
    /// Both the send-control trigger and the Enter-key trigger call this.
    pub async fn send_message(&self) -> SendOutcome {
        let token = CancellationToken::new();
        self.send_message_with_token(&token).await
    }

    /// Runs one send cycle racing the given token.
    ///
    /// The token doubles as the external cancel handle: cancelling it aborts
    /// the in-flight request. The bridge arms its own timer on top and
    /// reports timer expiry as the distinct timeout failure.
    pub async fn send_message_with_token(&self, token: &CancellationToken) -> SendOutcome {
        let text = self.surface.read_input().trim().to_string();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SendOutcome::Busy;
        }

        self.transcript.try_append(TranscriptEntry::user(text.clone()));
        self.surface.set_send_enabled(false);

        let payload = OutboundMessage::new(&self.identity, text);
        debug!(
            openid = %payload.openid,
            trace_id = %payload.trace_id,
            "dispatching message"
        );

        let timer = SpanTimer::start("relay.send");
        let result = self.dispatch(&payload, token).await;

        let mut attrs = SendSpanAttributes::new(&self.config.endpoint)
            .with_user_id(self.identity.user_id())
            .with_trace_id(self.identity.trace_id())
            .with_duration_ms(timer.finish());
        if let Ok(ref response) = result {
            attrs = attrs.with_status(response.status);
        }
        if let Err(ref err) = result {
            attrs = attrs.with_error(err.to_string());
        }
        debug!(fields = ?attrs.to_fields(), "send cycle finished");

        let outcome = self.record(result);

        // Unconditional cleanup: every request cycle ends with the bridge
        // ready for the next manual retry.
        self.in_flight.store(false, Ordering::SeqCst);
        self.surface.set_send_enabled(true);
        self.surface.clear_input();
        self.surface.focus_input();

        outcome
    }

    /// Races the network call against the timeout timer and the token.
    async fn dispatch(
        &self,
        payload: &OutboundMessage,
        token: &CancellationToken,
    ) -> Result<RelayResponse, RelayError> {
        tokio::select! {
            result = self.transport.post(payload, &self.config) => result,
            () = token.cancelled() => {
                let reason = token.reason().unwrap_or_else(|| "cancelled".to_string());
                if reason == TIMEOUT_REASON {
                    Err(RelayError::Timeout)
                } else {
                    Err(RelayError::Cancelled(reason))
                }
            }
            () = tokio::time::sleep(self.config.timeout()) => {
                token.cancel(TIMEOUT_REASON);
                Err(RelayError::Timeout)
            }
        }
    }

    /// Turns the dispatch result into transcript entries and an outcome.
    fn record(&self, result: Result<RelayResponse, RelayError>) -> SendOutcome {
        match result {
            Ok(response) if !response.is_success() => {
                // Body goes to diagnostics only, never to the transcript.
                debug!(
                    status = response.status,
                    body = %response.body,
                    "endpoint returned non-success status"
                );
                self.transcript.try_append(TranscriptEntry::system(format!(
                    "service busy ({})",
                    response.status
                )));
                SendOutcome::Failed(RelayError::HttpStatus {
                    code: response.status,
                })
            }
            Ok(response) => {
                let reply = extract_reply(&response, &self.config);
                self.transcript
                    .try_append(TranscriptEntry::assistant(reply.clone()));
                SendOutcome::Delivered(reply)
            }
            Err(err) if err.is_abort() => {
                debug!(%err, "request aborted");
                self.transcript.try_append(TranscriptEntry::system(ABORT_NOTICE));
                SendOutcome::Failed(err)
            }
            Err(err) => {
                warn!(%err, "request failed");
                self.transcript
                    .try_append(TranscriptEntry::system(NETWORK_NOTICE));
                SendOutcome::Failed(err)
            }
        }
    }
}

impl std::fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBridge")
            .field("endpoint", &self.config.endpoint)
            .field("identity", &self.identity)
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}
