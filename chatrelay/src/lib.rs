//! # Chatrelay
//!
//! An embeddable chat relay bridge for Rust hosts.
//!
//! Chatrelay wires a user-facing chat surface to a remote relay endpoint:
//!
//! - **Identity context**: a frozen per-session `{user_id, trace_id}` pair,
//!   resolved once from the page URL and a session-scoped store
//! - **Message bridge**: trims user input, tags it with the identity context,
//!   POSTs it to the endpoint with a timeout, and appends the reply (or a
//!   failure notice) to a transcript sink
//! - **Cancellation handling**: the in-flight request is a cancellable
//!   operation raced against a timer
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatrelay::prelude::*;
//!
//! let store = MemorySessionStore::new();
//! let resolution = resolve_identity(page_url, &store);
//!
//! let bridge = MessageBridge::bind(
//!     RelayConfig::new("https://relay.example.com/fire"),
//!     Some(resolution.context),
//!     Some(surface),
//!     Some(transcript),
//!     Arc::new(HttpRelayTransport::new()),
//! )?;
//!
//! bridge.send_message().await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bridge;
pub mod cancellation;
pub mod context;
pub mod errors;
pub mod observability;
pub mod session;
pub mod surface;
pub mod testing;
pub mod transcript;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{
        HttpRelayTransport, MessageBridge, OutboundMessage, RelayConfig,
        RelayResponse, RelayTransport, SendOutcome,
    };
    pub use crate::cancellation::CancellationToken;
    pub use crate::context::{
        resolve_identity, IdentityContext, IdentityResolution, ANONYMOUS_USER,
    };
    pub use crate::errors::RelayError;
    pub use crate::session::{MemorySessionStore, SessionStore};
    pub use crate::surface::ChatSurface;
    pub use crate::transcript::{
        CollectingTranscriptSink, LoggingTranscriptSink, NoOpTranscriptSink,
        Role, TranscriptEntry, TranscriptSink,
    };
    pub use crate::utils::{epoch_millis, generate_trace_token, is_valid_user_id};
}
