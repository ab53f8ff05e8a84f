//! Race Log Analyzer Library
//!
//! A stateless, reusable library for finding evidence of data races in the
//! output of unsynchronized counter-increment workers.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on analysis:
//! - Parses `[<tid>] glob = <value>` lines into an ordered event sequence
//! - Counts context switches and non-sequential (lost) updates
//! - Tallies events per thread in first-seen order
//! - Detects overlap events: stale reads the same thread then incremented from
//!
//! The library does NOT:
//! - Infer the actual thread schedule
//! - Correct or deduplicate the log
//! - Print reports or draw charts
//!
//! All presentation is in the application layer (race-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use race_log_analyzer::{analyze, parse_file, ParserConfig};
//! use std::path::Path;
//!
//! let events = parse_file(Path::new("thread_incr.log"), &ParserConfig::new()).unwrap();
//! let report = analyze(&events).unwrap();
//!
//! println!("Context switches: {}", report.context_switches);
//! for overlap in &report.overlap_events {
//!     println!("Thread {} read stale {}", overlap.thread_id, overlap.stale_value);
//! }
//! ```

// Public modules
pub mod analyzer;
pub mod config;
pub mod parser;
pub mod types;

// Re-export main types for convenience
pub use analyzer::{
    analyze, count_context_switches, count_lost_updates, counts_by_thread, cumulative_max,
    detect_overlaps,
};
pub use config::{ParserConfig, DEFAULT_VARIABLE_NAME};
pub use parser::{parse_file, parse_line, parse_reader, parse_str, EventIterator, LogParser};
pub use types::{
    AnalysisReport, AnalyzerError, Event, OverlapEvent, Result, ThreadCount, ThreadCounts,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: parse and analyze a tiny log end to end
        let events = parse_str("[1] glob = 1\n[2] glob = 2\n", &ParserConfig::new());
        let report = analyze(&events).unwrap();
        assert_eq!(report.total_events, 2);
        assert_eq!(report.context_switches, 1);
    }
}
