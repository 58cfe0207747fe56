//! Transcript sink system.
//!
//! The transcript is the user-visible message log. Sinks receive append-only
//! entries with a role prefix; entries carry plain text only, so user input
//! containing markup-like characters stays literal text all the way to the
//! renderer.

mod sink;

pub use sink::{
    CollectingTranscriptSink, LoggingTranscriptSink, NoOpTranscriptSink, TranscriptSink,
};

use serde::{Deserialize, Serialize};

use crate::utils::iso_timestamp;

/// The speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the widget.
    User,
    /// The remote endpoint's reply.
    Assistant,
    /// Bridge status notices (errors, busy signals).
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        };
        write!(f, "{label}")
    }
}

/// One line of the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who spoke.
    pub role: Role,
    /// The plain text content. Never interpreted as markup.
    pub text: String,
    /// When the entry was appended (ISO 8601).
    pub timestamp: String,
}

impl TranscriptEntry {
    /// Creates an entry with the current timestamp.
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: iso_timestamp(),
        }
    }

    /// Creates a user-role entry.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Creates an assistant-role entry.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Creates a system-role entry.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}
