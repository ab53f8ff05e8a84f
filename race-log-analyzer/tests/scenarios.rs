//! End-to-end analysis scenarios: parse a log, analyze it, check the report.

use race_log_analyzer::*;
use std::io::Write;

fn events(pairs: &[(u32, u64)]) -> Vec<Event> {
    pairs.iter().copied().map(Event::from).collect()
}

fn thread_order(report: &AnalysisReport) -> Vec<(u32, usize)> {
    report
        .counts_by_thread
        .iter()
        .map(|e| (e.thread_id, e.count))
        .collect()
}

#[test]
fn test_alternating_threads_without_races() {
    let seq = events(&[(1, 0), (2, 1), (1, 1), (2, 2)]);

    assert_eq!(count_context_switches(&seq), 3);
    // 1 -> 1 repeats a value, which is a non-sequential step
    assert_eq!(count_lost_updates(&seq), 1);
    assert_eq!(counts_by_thread(&seq).get(1), Some(2));
    assert_eq!(counts_by_thread(&seq).get(2), Some(2));
    assert!(detect_overlaps(&seq).is_empty());

    let report = analyze(&seq).unwrap();
    assert_eq!(report.context_switches, 3);
    assert_eq!(thread_order(&report), vec![(1, 2), (2, 2)]);
}

#[test]
fn test_stale_read_then_increment_is_overlap() {
    let seq = events(&[(1, 0), (2, 1), (1, 0), (1, 1)]);
    let report = analyze(&seq).unwrap();

    assert_eq!(
        report.overlap_events,
        vec![OverlapEvent {
            thread_id: 1,
            stale_index: 2,
            stale_value: 0,
            resolving_index: 3,
            new_value: 1,
        }]
    );
}

#[test]
fn test_stale_read_without_followup_is_not_overlap() {
    let seq = events(&[(1, 0), (2, 5), (1, 0)]);

    assert_eq!(cumulative_max(&seq)[1], 5);
    assert!(detect_overlaps(&seq).is_empty());
}

#[test]
fn test_distinct_threads_sequential_values() {
    let seq = events(&[(1, 0), (2, 1), (3, 2), (4, 3)]);
    let report = analyze(&seq).unwrap();

    assert_eq!(report.lost_updates, 0);
    assert_eq!(report.context_switches, 3);
    assert!(report.overlap_events.is_empty());
    assert_eq!(report.counts_by_thread.len(), 4);
}

#[test]
fn test_context_switches_complement_same_thread_pairs() {
    let seq = events(&[(1, 0), (1, 1), (2, 2), (2, 1), (1, 3), (1, 4), (3, 2)]);
    let same_thread_pairs = seq
        .windows(2)
        .filter(|p| p[0].thread_id == p[1].thread_id)
        .count();

    assert_eq!(count_context_switches(&seq) + same_thread_pairs, seq.len() - 1);
}

#[test]
fn test_report_invariants_hold() {
    let seq = events(&[
        (1, 0),
        (1, 1),
        (2, 1),
        (1, 2),
        (2, 2),
        (2, 3),
        (1, 3),
        (1, 4),
        (2, 4),
        (2, 5),
    ]);
    let report = analyze(&seq).unwrap();

    assert_eq!(report.total_events, seq.len());
    assert_eq!(report.counts_by_thread.total(), report.total_events);
    for overlap in &report.overlap_events {
        assert!(overlap.resolving_index > overlap.stale_index);
        assert_eq!(seq[overlap.stale_index].thread_id, overlap.thread_id);
        assert_eq!(seq[overlap.resolving_index].thread_id, overlap.thread_id);
    }
    let stale_indices: Vec<usize> = report.overlap_events.iter().map(|o| o.stale_index).collect();
    let mut sorted = stale_indices.clone();
    sorted.sort_unstable();
    assert_eq!(stale_indices, sorted);
}

#[test]
fn test_empty_log_fails_analysis() {
    let seq = parse_str("no observations here\n", &ParserConfig::new());
    assert!(seq.is_empty());
    assert!(matches!(analyze(&seq), Err(AnalyzerError::EmptyInput)));
}

#[test]
fn test_parse_file_and_analyze() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[1] glob = 1").unwrap();
    writeln!(file, "[1] glob = 2").unwrap();
    writeln!(file, "[2] glob = 3").unwrap();
    writeln!(file, "[1] glob = 3").unwrap();
    writeln!(file, "[1] glob = 4").unwrap();
    writeln!(file, "glob = 4").unwrap();

    let seq = parse_file(file.path(), &ParserConfig::new()).unwrap();
    assert_eq!(seq.len(), 5);

    let report = analyze(&seq).unwrap();
    assert_eq!(report.context_switches, 2);
    // 3 -> 3 is the only non-sequential step
    assert_eq!(report.lost_updates, 1);
    assert_eq!(thread_order(&report), vec![(1, 4), (2, 1)]);
    // Value 3 at index 3 equals the running max, so it is not stale
    assert!(report.overlap_events.is_empty());
}

#[test]
fn test_report_serializes_as_plain_data() {
    let seq = events(&[(2, 0), (1, 1), (2, 0), (2, 1)]);
    let report = analyze(&seq).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_events"], 4);
    assert_eq!(json["counts_by_thread"][0]["thread_id"], 2);
    assert_eq!(json["counts_by_thread"][0]["count"], 3);
    assert_eq!(json["overlap_events"][0]["resolving_index"], 3);

    let restored: AnalysisReport = serde_json::from_value(json).unwrap();
    assert_eq!(restored, report);
}
