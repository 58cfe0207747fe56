//! User identifier validation.

use regex::Regex;
use std::sync::OnceLock;

/// The pattern a user identifier must match to be accepted.
///
/// Alphanumerics, underscore and hyphen, 10 to 64 characters.
pub const USER_ID_PATTERN: &str = "^[A-Za-z0-9_-]{10,64}$";

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_regex() -> &'static Regex {
    USER_ID_RE.get_or_init(|| {
        Regex::new(USER_ID_PATTERN).expect("user id pattern is a valid regex")
    })
}

/// Whether a candidate user identifier matches the accepted pattern.
#[must_use]
pub fn is_valid_user_id(candidate: &str) -> bool {
    user_id_regex().is_match(candidate)
}

/// Trims a candidate and returns it only when it matches the pattern.
#[must_use]
pub fn normalize_user_id(candidate: &str) -> Option<&str> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() || !is_valid_user_id(trimmed) {
        return None;
    }
    Some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_ids() {
        assert!(is_valid_user_id("abcdefghij"));
        assert!(is_valid_user_id("o_6Hc5wJX9aZ-1234"));
        assert!(is_valid_user_id(&"a".repeat(64)));
    }

    #[test]
    fn test_too_short_or_too_long() {
        assert!(!is_valid_user_id("short"));
        assert!(!is_valid_user_id(&"a".repeat(9)));
        assert!(!is_valid_user_id(&"a".repeat(65)));
    }

    #[test]
    fn test_rejected_characters() {
        assert!(!is_valid_user_id("has spaces in it"));
        assert!(!is_valid_user_id("query=injection&x"));
        assert!(!is_valid_user_id("unicode-\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}"));
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_user_id("  abcdefghij  "), Some("abcdefghij"));
        assert_eq!(normalize_user_id("   "), None);
        assert_eq!(normalize_user_id("short"), None);
    }
}
