//! Interleaving analysis
//!
//! Classifies an ordered sequence of counter observations into context
//! switches, lost updates and overlap events. Every function here is a pure
//! function of its input slice; log order is the only ordering information
//! available and is never changed.

use crate::types::{AnalysisReport, AnalyzerError, Event, OverlapEvent, Result, ThreadCounts};

/// Count adjacent pairs whose events come from different threads.
///
/// Result is in `0..=len-1`; empty and single-event sequences yield 0.
pub fn count_context_switches(events: &[Event]) -> usize {
    events
        .windows(2)
        .filter(|pair| pair[0].thread_id != pair[1].thread_id)
        .count()
}

/// Count adjacent pairs whose values do not differ by exactly +1.
///
/// Regressions (stale writes) and skips (several increments between two
/// prints) both count. The first event has no predecessor and is never
/// evaluated.
pub fn count_lost_updates(events: &[Event]) -> usize {
    events
        .windows(2)
        .filter(|pair| !is_increment(pair[0].value, pair[1].value))
        .count()
}

/// Tally events per thread, keyed in first-seen order.
pub fn counts_by_thread(events: &[Event]) -> ThreadCounts {
    let mut counts = ThreadCounts::new();
    for event in events {
        counts.record(event.thread_id);
    }
    counts
}

/// Running maximum of observed values: `result[i] = max(value[0..=i])`.
pub fn cumulative_max(events: &[Event]) -> Vec<u64> {
    events
        .iter()
        .scan(None, |max: &mut Option<u64>, event| {
            let current = max.map_or(event.value, |m| m.max(event.value));
            *max = Some(current);
            Some(current)
        })
        .collect()
}

/// Find stale reads that the reading thread then incremented from.
///
/// An event at index `i > 0` is a stale candidate when its value is below
/// the maximum of all earlier values. Only the same thread's next event is
/// inspected: if it holds `stale_value + 1` an [`OverlapEvent`] is emitted,
/// otherwise the candidate produces nothing. Candidates are independent, so
/// one event may resolve one candidate and be a candidate itself.
pub fn detect_overlaps(events: &[Event]) -> Vec<OverlapEvent> {
    let running_max = cumulative_max(events);

    events
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(i, event)| event.value < running_max[i - 1])
        .filter_map(|(i, stale)| {
            let (offset, next) = events[i + 1..]
                .iter()
                .enumerate()
                .find(|(_, e)| e.thread_id == stale.thread_id)?;

            is_increment(stale.value, next.value).then(|| OverlapEvent {
                thread_id: stale.thread_id,
                stale_index: i,
                stale_value: stale.value,
                resolving_index: i + 1 + offset,
                new_value: next.value,
            })
        })
        .collect()
}

/// Run every pass over `events` and assemble the report.
///
/// Fails only when `events` is empty.
pub fn analyze(events: &[Event]) -> Result<AnalysisReport> {
    if events.is_empty() {
        return Err(AnalyzerError::EmptyInput);
    }

    log::debug!("Analyzing {} events", events.len());

    let report = AnalysisReport {
        total_events: events.len(),
        context_switches: count_context_switches(events),
        lost_updates: count_lost_updates(events),
        counts_by_thread: counts_by_thread(events),
        overlap_events: detect_overlaps(events),
    };

    log::debug!(
        "Analysis complete: {} context switches, {} lost updates, {} overlaps across {} threads",
        report.context_switches,
        report.lost_updates,
        report.overlap_count(),
        report.counts_by_thread.len()
    );

    Ok(report)
}

/// True when `next` is exactly `prev + 1`. `u64::MAX` has no successor.
fn is_increment(prev: u64, next: u64) -> bool {
    prev.checked_add(1) == Some(next)
}
