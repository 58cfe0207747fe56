//! Trace token generation.

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use super::timestamps::epoch_millis;

/// Prefix applied to every generated trace token.
pub const TRACE_PREFIX: &str = "t_";

/// Generates a fresh trace token from a cryptographically strong source.
#[must_use]
pub fn generate_trace_token() -> String {
    format!("{TRACE_PREFIX}{}", Uuid::new_v4())
}

/// Generates a trace token from a timestamp and a pseudo-random suffix.
///
/// Used when a context must be fabricated late, outside the normal
/// resolution path. Weaker uniqueness than [`generate_trace_token`].
#[must_use]
pub fn generate_fallback_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{TRACE_PREFIX}{}_{suffix}", epoch_millis())
}
