//! The frozen identity context value object.

use serde::{Deserialize, Serialize};

use crate::utils::{generate_fallback_token, generate_trace_token};

/// The sentinel user identifier used when no valid identifier is available.
pub const ANONYMOUS_USER: &str = "anonymous";

/// The per-session pair of user identifier and trace identifier.
///
/// Created once per session scope and read-only afterward; every message
/// sent within that scope carries the same pair. Fields are private so the
/// context cannot be mutated after publication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityContext {
    user_id: String,
    trace_id: String,
}

impl IdentityContext {
    /// Creates a context from already-resolved identifiers.
    #[must_use]
    pub fn new(user_id: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            trace_id: trace_id.into(),
        }
    }

    /// Creates an anonymous context with a fresh trace token.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USER, generate_trace_token())
    }

    /// Creates a last-resort context for a bridge bound without a resolved
    /// identity. Uses the weaker timestamp-composite token.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(ANONYMOUS_USER, generate_fallback_token())
    }

    /// The user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The trace identifier.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Whether this context carries the sentinel user identifier.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user_id == ANONYMOUS_USER
    }
}
