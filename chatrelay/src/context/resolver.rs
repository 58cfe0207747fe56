//! Identity resolution from a page URL and a session store.

use tracing::debug;
use url::Url;

use super::identity::{IdentityContext, ANONYMOUS_USER};
use crate::session::{SessionStore, TRACE_ID_KEY, USER_ID_KEY};
use crate::utils::{generate_trace_token, normalize_user_id};

/// The query parameter a user identifier may arrive in.
pub const USER_ID_PARAM: &str = "openid";

/// The outcome of one identity resolution.
#[derive(Debug, Clone)]
pub struct IdentityResolution {
    /// The frozen identity context.
    pub context: IdentityContext,
    /// The page URL with the identifier parameter removed, for the host to
    /// install as the visible address. `None` when the URL could not be
    /// rewritten; that failure is best-effort and non-fatal.
    pub scrubbed_url: Option<String>,
}

/// Resolves the per-session identity context.
///
/// The user identifier is taken from the session store when a valid one is
/// cached, otherwise from the URL's query parameter, otherwise the sentinel
/// [`ANONYMOUS_USER`]. The trace token is reused from the store or freshly
/// generated. Both are persisted back so later resolutions in the same
/// session scope return the same pair.
///
/// This function never fails: malformed URLs and unavailable stores degrade
/// to the sentinel identifier and a fresh token.
pub fn resolve_identity(page_url: &str, store: &dyn SessionStore) -> IdentityResolution {
    let user_id = resolve_user_id(page_url, store);
    let scrubbed_url = scrub_user_id_param(page_url);
    let trace_id = resolve_trace_id(store);

    debug!(user_id = %user_id, trace_id = %trace_id, "identity context resolved");

    IdentityResolution {
        context: IdentityContext::new(user_id, trace_id),
        scrubbed_url,
    }
}

fn resolve_user_id(page_url: &str, store: &dyn SessionStore) -> String {
    if let Some(cached) = store.get(USER_ID_KEY) {
        if normalize_user_id(&cached).is_some() {
            return cached;
        }
    }

    let resolved = user_id_from_url(page_url)
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    // The sentinel is persisted like a real identifier.
    store.put(USER_ID_KEY, &resolved);
    resolved
}

fn user_id_from_url(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let candidate = url
        .query_pairs()
        .find(|(key, _)| key == USER_ID_PARAM)
        .map(|(_, value)| value.into_owned())?;

    normalize_user_id(&candidate).map(ToString::to_string)
}

/// Removes the identifier parameter from the URL, preserving the remaining
/// query and the fragment. Returns `None` when the URL does not parse.
fn scrub_user_id_param(page_url: &str) -> Option<String> {
    let mut url = Url::parse(page_url).ok()?;

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != USER_ID_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&remaining);
    }

    Some(url.to_string())
}

fn resolve_trace_id(store: &dyn SessionStore) -> String {
    if let Some(existing) = store.get(TRACE_ID_KEY) {
        if !existing.is_empty() {
            return existing;
        }
    }

    let fresh = generate_trace_token();
    store.put(TRACE_ID_KEY, &fresh);
    fresh
}
