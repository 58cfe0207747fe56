//! End-to-end send cycle tests against scripted collaborators.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::{MessageBridge, RelayConfig, RelayTransport, SendOutcome};
use crate::cancellation::CancellationToken;
use crate::context::IdentityContext;
use crate::errors::RelayError;
use crate::surface::ChatSurface;
use crate::testing::{FailingTransport, MockTransport, ScriptedSurface, SlowTransport};
use crate::transcript::{CollectingTranscriptSink, Role};

fn harness(
    transport: Arc<dyn RelayTransport>,
    timeout_ms: u64,
) -> (MessageBridge, Arc<ScriptedSurface>, Arc<CollectingTranscriptSink>) {
    let surface = Arc::new(ScriptedSurface::new());
    let transcript = Arc::new(CollectingTranscriptSink::new());
    let bridge = MessageBridge::new(
        RelayConfig::new("https://relay.example.com/fire").with_timeout_ms(timeout_ms),
        IdentityContext::new("abcdefghij", "t_token"),
        surface.clone(),
        transcript.clone(),
        transport,
    );
    (bridge, surface, transcript)
}

#[tokio::test]
async fn whitespace_only_input_is_a_noop() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, surface, transcript) = harness(transport.clone(), 1_000);
    surface.set_input("   \t  ");

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Empty);
    assert!(transcript.is_empty());
    assert_eq!(transport.call_count(), 0);
    // No request cycle ran, so the input was left alone.
    assert_eq!(surface.clear_count(), 0);
}

#[tokio::test]
async fn empty_input_is_a_noop() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, _surface, transcript) = harness(transport.clone(), 1_000);

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Empty);
    assert!(transcript.is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn json_reply_is_delivered() -> anyhow::Result<()> {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(MockTransport::json_ok(r#"{"reply": "hello"}"#));
    let (bridge, surface, transcript) = harness(transport.clone(), 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Delivered("hello".to_string()));

    let entries = transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[0].text, "hi");
    assert_eq!(entries[1].role, Role::Assistant);
    assert_eq!(entries[1].text, "hello");

    let payloads = transport.recorded_payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].openid, "abcdefghij");
    assert_eq!(payloads[0].trace_id, "t_token");
    assert_eq!(payloads[0].message, "hi");

    Ok(())
}

#[tokio::test]
async fn input_is_trimmed_before_sending() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, surface, _transcript) = harness(transport.clone(), 1_000);
    surface.set_input("  hi there  ");

    bridge.send_message().await;

    assert_eq!(transport.recorded_payloads()[0].message, "hi there");
}

#[tokio::test]
async fn cleanup_runs_after_success() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, surface, _transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    bridge.send_message().await;

    assert!(surface.send_enabled());
    assert_eq!(surface.read_input(), "");
    assert_eq!(surface.clear_count(), 1);
    assert_eq!(surface.focus_count(), 1);
    assert_eq!(surface.disable_count(), 1);
    assert!(!bridge.is_in_flight());
}

#[tokio::test]
async fn http_error_appends_one_system_entry_with_code() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(MockTransport::status(500, "internal diagnostics"));
    let (bridge, surface, transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert_eq!(
        outcome,
        SendOutcome::Failed(RelayError::HttpStatus { code: 500 })
    );

    let system_entries = transcript.entries_for(Role::System);
    assert_eq!(system_entries.len(), 1);
    assert!(system_entries[0].text.contains("500"));
    // The body stays out of the transcript.
    assert!(!system_entries[0].text.contains("diagnostics"));

    // The control is usable again for a manual retry.
    assert!(surface.send_enabled());
    assert_eq!(surface.read_input(), "");
}

#[tokio::test]
async fn timeout_cancels_the_request() {
    let transport = Arc::new(SlowTransport::with_delay_ms(10_000));
    let (bridge, surface, transcript) = harness(transport.clone(), 50);
    surface.set_input("hi");

    let token = CancellationToken::new();
    let outcome = bridge.send_message_with_token(&token).await;

    assert_eq!(outcome, SendOutcome::Failed(RelayError::Timeout));
    assert!(token.is_cancelled());
    assert_eq!(transport.call_count(), 1);

    let system_entries = transcript.entries_for(Role::System);
    assert_eq!(system_entries.len(), 1);
    assert!(system_entries[0].text.contains("timed out"));

    assert!(surface.send_enabled());
}

#[tokio::test]
async fn transport_failure_appends_network_notice() {
    let transport = Arc::new(FailingTransport::default());
    let (bridge, surface, transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert!(matches!(
        outcome,
        SendOutcome::Failed(RelayError::Transport(_))
    ));

    let system_entries = transcript.entries_for(Role::System);
    assert_eq!(system_entries.len(), 1);
    assert!(system_entries[0].text.contains("network error"));

    assert!(surface.send_enabled());
}

#[tokio::test]
async fn external_cancellation_aborts_the_request() {
    let transport = Arc::new(SlowTransport::with_delay_ms(10_000));
    let (bridge, surface, _transcript) = harness(transport, 60_000);
    surface.set_input("hi");

    let token = CancellationToken::new();
    token.cancel("page torn down");

    let outcome = bridge.send_message_with_token(&token).await;

    assert_eq!(
        outcome,
        SendOutcome::Failed(RelayError::Cancelled("page torn down".to_string()))
    );
    assert!(surface.send_enabled());
}

#[tokio::test]
async fn second_trigger_while_in_flight_is_inert() {
    let transport = Arc::new(SlowTransport::with_delay_ms(50));
    let (bridge, surface, _transcript) = harness(transport.clone(), 5_000);
    surface.set_input("hi");

    let (first, second) = tokio::join!(bridge.send_message(), bridge.send_message());

    let outcomes = [first, second];
    let busy = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, SendOutcome::Busy))
        .count();
    let delivered = outcomes.iter().filter(|outcome| outcome.is_delivered()).count();

    assert_eq!(busy, 1);
    assert_eq!(delivered, 1);
    assert_eq!(transport.call_count(), 1);
    assert!(surface.send_enabled());
}

#[tokio::test]
async fn markup_in_input_stays_literal_text() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, surface, transcript) = harness(transport, 1_000);
    surface.set_input("<script>alert(1)</script>");

    bridge.send_message().await;

    let user_entries = transcript.entries_for(Role::User);
    assert_eq!(user_entries[0].text, "<script>alert(1)</script>");
}

#[tokio::test]
async fn missing_reply_fields_surface_the_placeholder() {
    let transport = Arc::new(MockTransport::new());
    let (bridge, surface, _transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Delivered("reply pending…".to_string()));
}

#[tokio::test]
async fn plain_text_reply_is_used_verbatim() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(MockTransport::text_ok("plain reply"));
    let (bridge, surface, _transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Delivered("plain reply".to_string()));
}

#[tokio::test]
async fn fallback_reply_field_is_consulted() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(MockTransport::json_ok(r#"{"message": "from fallback"}"#));
    let (bridge, surface, _transcript) = harness(transport, 1_000);
    surface.set_input("hi");

    let outcome = bridge.send_message().await;

    assert_eq!(outcome, SendOutcome::Delivered("from fallback".to_string()));
}

#[test]
fn bind_without_surface_aborts_quietly() {
    let bridge = MessageBridge::bind(
        RelayConfig::new("https://relay.example.com/fire"),
        Some(IdentityContext::new("abcdefghij", "t_token")),
        None,
        Some(Arc::new(CollectingTranscriptSink::new())),
        Arc::new(MockTransport::new()),
    );
    assert!(bridge.is_none());
}

#[test]
fn bind_without_transcript_aborts_quietly() {
    let bridge = MessageBridge::bind(
        RelayConfig::new("https://relay.example.com/fire"),
        Some(IdentityContext::new("abcdefghij", "t_token")),
        Some(Arc::new(ScriptedSurface::new())),
        None,
        Arc::new(MockTransport::new()),
    );
    assert!(bridge.is_none());
}

#[test]
fn bind_with_invalid_endpoint_aborts_quietly() {
    let bridge = MessageBridge::bind(
        RelayConfig::new("not a url"),
        Some(IdentityContext::new("abcdefghij", "t_token")),
        Some(Arc::new(ScriptedSurface::new())),
        Some(Arc::new(CollectingTranscriptSink::new())),
        Arc::new(MockTransport::new()),
    );
    assert!(bridge.is_none());
}

#[test]
fn bind_without_identity_falls_back_to_anonymous() {
    let bridge = MessageBridge::bind(
        RelayConfig::new("https://relay.example.com/fire"),
        None,
        Some(Arc::new(ScriptedSurface::new())),
        Some(Arc::new(CollectingTranscriptSink::new())),
        Arc::new(MockTransport::new()),
    )
    .unwrap();

    assert!(bridge.identity().is_anonymous());
    assert!(bridge.identity().trace_id().starts_with("t_"));
}
