//! Transcript sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

use super::TranscriptEntry;

/// Trait for sinks that receive transcript entries.
///
/// The bridge is the single writer; sinks only ever see appends.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Appends an entry asynchronously.
    async fn append(&self, entry: TranscriptEntry);

    /// Appends an entry without blocking.
    ///
    /// This method never raises; failures are logged and suppressed.
    fn try_append(&self, entry: TranscriptEntry);
}

/// A sink that discards all entries.
///
/// Used as the default when no log is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTranscriptSink;

#[async_trait]
impl TranscriptSink for NoOpTranscriptSink {
    async fn append(&self, _entry: TranscriptEntry) {
        // Intentionally empty - discards all entries
    }

    fn try_append(&self, _entry: TranscriptEntry) {
        // Intentionally empty - discards all entries
    }
}

/// A sink that writes entries through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingTranscriptSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingTranscriptSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingTranscriptSink {
    /// Creates a new logging sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn log_entry(&self, entry: &TranscriptEntry) {
        match self.level {
            Level::DEBUG => {
                debug!(role = %entry.role, text = %entry.text, "transcript entry");
            }
            _ => {
                info!(role = %entry.role, text = %entry.text, "transcript entry");
            }
        }
    }
}

#[async_trait]
impl TranscriptSink for LoggingTranscriptSink {
    async fn append(&self, entry: TranscriptEntry) {
        self.log_entry(&entry);
    }

    fn try_append(&self, entry: TranscriptEntry) {
        self.log_entry(&entry);
    }
}

/// A sink that collects entries in memory.
///
/// Embedders that render the log themselves read it back from here; tests
/// assert on it.
#[derive(Debug, Default)]
pub struct CollectingTranscriptSink {
    entries: parking_lot::RwLock<Vec<TranscriptEntry>>,
}

impl CollectingTranscriptSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.read().clone()
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no entries have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears all collected entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the entries spoken by one role.
    #[must_use]
    pub fn entries_for(&self, role: super::Role) -> Vec<TranscriptEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.role == role)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TranscriptSink for CollectingTranscriptSink {
    async fn append(&self, entry: TranscriptEntry) {
        self.entries.write().push(entry);
    }

    fn try_append(&self, entry: TranscriptEntry) {
        self.entries.write().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Role;

    #[test]
    fn test_noop_sink() {
        let sink = NoOpTranscriptSink;
        tokio_test::block_on(sink.append(TranscriptEntry::user("hi")));
        sink.try_append(TranscriptEntry::system("notice"));
        // Should not panic
    }

    #[test]
    fn test_logging_sink() {
        let sink = LoggingTranscriptSink::default();
        sink.try_append(TranscriptEntry::assistant("hello"));
        tokio_test::block_on(sink.append(TranscriptEntry::user("hi")));
        // Should not panic
    }

    #[tokio::test]
    async fn test_collecting_sink() {
        let sink = CollectingTranscriptSink::new();
        assert!(sink.is_empty());

        sink.append(TranscriptEntry::user("hi")).await;
        sink.try_append(TranscriptEntry::assistant("hello"));

        assert_eq!(sink.len(), 2);

        let entries = sink.entries();
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_collecting_sink_filter_by_role() {
        let sink = CollectingTranscriptSink::new();
        sink.append(TranscriptEntry::user("one")).await;
        sink.append(TranscriptEntry::system("busy")).await;
        sink.append(TranscriptEntry::user("two")).await;

        assert_eq!(sink.entries_for(Role::User).len(), 2);
        assert_eq!(sink.entries_for(Role::System).len(), 1);
        assert!(sink.entries_for(Role::Assistant).is_empty());
    }

    #[tokio::test]
    async fn test_collecting_sink_clear() {
        let sink = CollectingTranscriptSink::new();
        sink.append(TranscriptEntry::user("hi")).await;
        assert_eq!(sink.len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
