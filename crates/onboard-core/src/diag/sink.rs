use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{LogEntry, Severity};

/// Maximum number of entries retained before FIFO eviction kicks in.
pub const MAX_ENTRIES: usize = 100;

/// Process-wide diagnostic buffer shared by every screen.
///
/// Cloning is cheap; all clones observe the same buffer. Appends may arrive
/// from any thread (SDK callbacks land off the UI thread), so the buffer is
/// mutated under a mutex and read through point-in-time snapshots, so a
/// renderer never iterates live state.
#[derive(Clone, Default)]
pub struct DiagSink {
    inner: Arc<SinkInner>,
}

#[derive(Default)]
struct SinkInner {
    entries: Mutex<VecDeque<LogEntry>>,
    generation: AtomicU64,
}

impl DiagSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest once the buffer is full.
    ///
    /// Entries are mirrored to the `log` facade so terminal-external
    /// diagnostics stay consistent with the on-screen console.
    pub fn append(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Info | Severity::Success => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.push_back(LogEntry::new(message, severity));
            if entries.len() > MAX_ENTRIES {
                entries.pop_front();
            }
        }
        self.inner.generation.fetch_add(1, Ordering::Release);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(message, Severity::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.append(message, Severity::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.append(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.append(message, Severity::Error);
    }

    /// Remove every entry. Safe to call on an already-empty buffer.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.clear();
        }
        self.inner.generation.fetch_add(1, Ordering::Release);
    }

    /// Point-in-time copy of the buffer in append order.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Bumped on every append and clear. Renderers compare generations to
    /// detect new content without taking the buffer lock.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn snapshot_length_is_bounded_by_capacity() {
        let sink = DiagSink::new();
        for i in 0..250 {
            sink.info(format!("entry {}", i));
        }
        assert_eq!(sink.snapshot().len(), MAX_ENTRIES);
    }

    #[test]
    fn snapshot_holds_the_most_recent_entries_in_append_order() {
        let sink = DiagSink::new();
        for i in 0..MAX_ENTRIES + 1 {
            sink.info(format!("entry {}", i));
        }
        let snapshot = sink.snapshot();
        // The 101st append evicted the very first entry.
        assert_eq!(snapshot[0].message, "entry 1");
        assert_eq!(snapshot.last().map(|e| e.message.as_str()), Some("entry 100"));
        for pair in snapshot.windows(2) {
            let a: usize = pair[0].message[6..].parse().expect("index");
            let b: usize = pair[1].message[6..].parse().expect("index");
            assert_eq!(b, a + 1);
        }
    }

    #[test]
    fn short_histories_are_kept_in_full() {
        let sink = DiagSink::new();
        for i in 0..7 {
            sink.info(format!("entry {}", i));
        }
        assert_eq!(sink.snapshot().len(), 7);
    }

    #[test]
    fn clear_empties_the_buffer_and_is_idempotent() {
        let sink = DiagSink::new();
        sink.error("boom");
        sink.clear();
        assert!(sink.snapshot().is_empty());
        sink.clear();
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn generation_advances_on_append_and_clear() {
        let sink = DiagSink::new();
        let g0 = sink.generation();
        sink.info("a");
        let g1 = sink.generation();
        assert!(g1 > g0);
        sink.clear();
        assert!(sink.generation() > g1);
    }

    #[test]
    fn concurrent_appends_never_tear_or_overflow() {
        let sink = DiagSink::new();
        let mut handles = Vec::new();
        for t in 0..4 {
            let sink = sink.clone();
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    sink.info(format!("t{} {}", t, i));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("appender thread");
        }
        let snapshot = sink.snapshot();
        assert_eq!(snapshot.len(), MAX_ENTRIES);
        // Per-thread ordering survives interleaving.
        for t in 0..4 {
            let prefix = format!("t{} ", t);
            let seen: Vec<usize> = snapshot
                .iter()
                .filter(|e| e.message.starts_with(&prefix))
                .map(|e| e.message[prefix.len()..].parse().expect("index"))
                .collect();
            for pair in seen.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
    }
}
