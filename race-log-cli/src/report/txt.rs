//! Plain-text summary report

use race_log_analyzer::AnalysisReport;
use std::fmt;

/// Text rendering of an analysis report.
///
/// Line numbers in overlap details are 1-based positions in the event
/// sequence, not raw file lines.
pub struct TextReport<'a> {
    report: &'a AnalysisReport,
    max_details: Option<usize>,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            max_details: None,
        }
    }

    /// Only list the first `max` overlap events
    pub fn with_max_details(mut self, max: Option<usize>) -> Self {
        self.max_details = max;
        self
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "=== Analysis Summary ===")?;
        writeln!(f, "Total updates (lines): {}", report.total_events)?;
        writeln!(f, "Context switches: {}", report.context_switches)?;
        writeln!(
            f,
            "Lost update events (non-sequential increments): {}",
            report.lost_updates
        )?;
        writeln!(f, "Updates per thread:")?;
        for entry in report.counts_by_thread.iter() {
            writeln!(f, "  Thread {}: {} updates", entry.thread_id, entry.count)?;
        }
        writeln!(
            f,
            "Overlap events (stale read followed by an increment from that stale value): {}",
            report.overlap_count()
        )?;

        if report.overlap_events.is_empty() {
            return Ok(());
        }

        writeln!(f, "Details of overlap events:")?;
        let shown = self
            .max_details
            .unwrap_or(usize::MAX)
            .min(report.overlap_count());
        for event in &report.overlap_events[..shown] {
            writeln!(
                f,
                "  Thread {} at line {} read stale value {} and then at line {} incremented to {}.",
                event.thread_id,
                event.stale_index + 1,
                event.stale_value,
                event.resolving_index + 1,
                event.new_value
            )?;
        }
        if shown < report.overlap_count() {
            writeln!(f, "  ... and {} more", report.overlap_count() - shown)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_log_analyzer::{analyze, Event};

    fn report_for(pairs: &[(u32, u64)]) -> AnalysisReport {
        let events: Vec<Event> = pairs.iter().copied().map(Event::from).collect();
        analyze(&events).unwrap()
    }

    #[test]
    fn test_summary_without_overlaps() {
        let text = TextReport::new(&report_for(&[(1, 0), (2, 1), (1, 1), (2, 2)])).to_string();

        assert_eq!(
            text,
            "=== Analysis Summary ===\n\
             Total updates (lines): 4\n\
             Context switches: 3\n\
             Lost update events (non-sequential increments): 1\n\
             Updates per thread:\n\
             \x20 Thread 1: 2 updates\n\
             \x20 Thread 2: 2 updates\n\
             Overlap events (stale read followed by an increment from that stale value): 0\n"
        );
    }

    #[test]
    fn test_overlap_details_use_one_based_lines() {
        let text = TextReport::new(&report_for(&[(1, 0), (2, 1), (1, 0), (1, 1)])).to_string();

        assert!(text.contains("Details of overlap events:\n"));
        assert!(text.contains(
            "  Thread 1 at line 3 read stale value 0 and then at line 4 incremented to 1.\n"
        ));
    }

    #[test]
    fn test_max_details_truncates() {
        // Three independent overlaps from threads 1, 3 and 4
        let report = report_for(&[
            (2, 5),
            (1, 0),
            (3, 1),
            (4, 2),
            (1, 1),
            (3, 2),
            (4, 3),
        ]);
        assert_eq!(report.overlap_count(), 3);

        let text = TextReport::new(&report).with_max_details(Some(1)).to_string();
        assert_eq!(text.matches(" read stale value ").count(), 1);
        assert!(text.ends_with("  ... and 2 more\n"));
    }
}
