//! Core types for the race log analyzer library
//!
//! This module defines the events the parser emits and the report the analyzer
//! produces. Reports are plain data: formatters and chart renderers consume them
//! without re-running analysis.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// A single observation from the log: thread `thread_id` saw the shared
/// counter at `value`.
///
/// Events carry no index of their own; their position in the sequence is
/// the index used by every report field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Worker thread identifier as printed in the log
    pub thread_id: u32,
    /// Value of the shared counter the thread printed
    pub value: u64,
}

impl Event {
    pub fn new(thread_id: u32, value: u64) -> Self {
        Self { thread_id, value }
    }
}

impl From<(u32, u64)> for Event {
    fn from((thread_id, value): (u32, u64)) -> Self {
        Self::new(thread_id, value)
    }
}

/// Errors that can occur while reading or analyzing a log
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("No events to analyze")]
    EmptyInput,

    #[error("Failed to read log: {0}")]
    LogRead(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stale read that the same thread then incremented from.
///
/// `resolving_index` is always greater than `stale_index` and both refer to
/// events of `thread_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapEvent {
    pub thread_id: u32,
    /// Index of the event that observed a value below the running maximum
    pub stale_index: usize,
    pub stale_value: u64,
    /// Index of the thread's next event, which wrote `stale_value + 1`
    pub resolving_index: usize,
    pub new_value: u64,
}

/// One entry of the per-thread tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadCount {
    pub thread_id: u32,
    pub count: usize,
}

/// Per-thread event counts, kept in the order threads first appear in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ThreadCount>", into = "Vec<ThreadCount>")]
pub struct ThreadCounts {
    entries: Vec<ThreadCount>,
    /// thread_id -> position in `entries`
    positions: HashMap<u32, usize>,
}

impl ThreadCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more event for `thread_id`
    pub fn record(&mut self, thread_id: u32) {
        match self.positions.get(&thread_id) {
            Some(&pos) => self.entries[pos].count += 1,
            None => {
                self.positions.insert(thread_id, self.entries.len());
                self.entries.push(ThreadCount { thread_id, count: 1 });
            }
        }
    }

    /// Number of events recorded for `thread_id`, if it appeared at all
    pub fn get(&self, thread_id: u32) -> Option<usize> {
        self.positions
            .get(&thread_id)
            .map(|&pos| self.entries[pos].count)
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &ThreadCount> {
        self.entries.iter()
    }

    /// Number of distinct threads
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl From<Vec<ThreadCount>> for ThreadCounts {
    fn from(list: Vec<ThreadCount>) -> Self {
        let mut counts = ThreadCounts::new();
        for entry in list {
            match counts.positions.get(&entry.thread_id) {
                Some(&pos) => counts.entries[pos].count += entry.count,
                None => {
                    counts.positions.insert(entry.thread_id, counts.entries.len());
                    counts.entries.push(entry);
                }
            }
        }
        counts
    }
}

impl From<ThreadCounts> for Vec<ThreadCount> {
    fn from(counts: ThreadCounts) -> Self {
        counts.entries
    }
}

/// Aggregate result of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Number of events analyzed
    pub total_events: usize,
    /// Adjacent pairs whose thread IDs differ
    pub context_switches: usize,
    /// Adjacent pairs whose values do not differ by exactly +1
    pub lost_updates: usize,
    /// Per-thread event counts in first-seen order
    pub counts_by_thread: ThreadCounts,
    /// Detected overlaps, ordered by ascending `stale_index`
    pub overlap_events: Vec<OverlapEvent>,
}

impl AnalysisReport {
    pub fn overlap_count(&self) -> usize {
        self.overlap_events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_counts_first_seen_order() {
        let mut counts = ThreadCounts::new();
        for tid in [7, 3, 7, 9, 3, 7] {
            counts.record(tid);
        }

        let order: Vec<u32> = counts.iter().map(|e| e.thread_id).collect();
        assert_eq!(order, vec![7, 3, 9]);
        assert_eq!(counts.get(7), Some(3));
        assert_eq!(counts.get(3), Some(2));
        assert_eq!(counts.get(9), Some(1));
        assert_eq!(counts.get(42), None);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_thread_counts_from_list_merges_duplicates() {
        let counts = ThreadCounts::from(vec![
            ThreadCount { thread_id: 2, count: 4 },
            ThreadCount { thread_id: 1, count: 1 },
            ThreadCount { thread_id: 2, count: 3 },
        ]);

        assert_eq!(counts.get(2), Some(7));
        assert_eq!(counts.iter().next().map(|e| e.thread_id), Some(2));
        assert_eq!(counts.total(), 8);
    }

    #[test]
    fn test_event_from_tuple() {
        let event: Event = (4, 10).into();
        assert_eq!(event, Event::new(4, 10));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AnalyzerError::EmptyInput.to_string(), "No events to analyze");
        assert_eq!(
            AnalyzerError::LogRead("missing".into()).to_string(),
            "Failed to read log: missing"
        );
    }
}
