//! Session-scoped key/value storage.
//!
//! The identity resolver persists the resolved user identifier and the trace
//! token here so that repeated resolutions within one session scope reuse
//! them. The store's lifetime defines the session: drop the store and the
//! next resolution starts fresh.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage key for the resolved user identifier.
pub const USER_ID_KEY: &str = "openid";

/// Storage key for the trace token.
pub const TRACE_ID_KEY: &str = "trace_id";

/// A session-scoped string store.
///
/// Both operations are infallible at the trait surface: an unavailable
/// backing store is modeled by returning `None` and dropping writes, which
/// the resolver degrades from gracefully.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value, overwriting any previous one.
    fn put(&self, key: &str, value: &str);
}

/// An in-memory session store.
///
/// Values live exactly as long as the store itself.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Removes all entries, ending the session scope.
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.data.write().insert(key.to_string(), value.to_string());
    }
}

/// A store that holds nothing and drops every write.
///
/// Stands in for an unavailable backing store.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSessionStore;

impl SessionStore for UnavailableSessionStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: &str, _value: &str) {
        // Intentionally empty - the backing store is unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());

        store.put(USER_ID_KEY, "abcdefghij");
        assert_eq!(store.get(USER_ID_KEY), Some("abcdefghij".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemorySessionStore::new();
        store.put(TRACE_ID_KEY, "t_one");
        store.put(TRACE_ID_KEY, "t_two");

        assert_eq!(store.get(TRACE_ID_KEY), Some("t_two".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_clear_ends_scope() {
        let store = MemorySessionStore::new();
        store.put(USER_ID_KEY, "abcdefghij");
        store.clear();

        assert!(store.get(USER_ID_KEY).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unavailable_store_drops_writes() {
        let store = UnavailableSessionStore;
        store.put(USER_ID_KEY, "abcdefghij");
        assert!(store.get(USER_ID_KEY).is_none());
    }
}
