//! Standalone log analysis tool
//!
//! Parses a counter log, analyzes it and prints the headline numbers plus the
//! first few overlap events.
//!
//! Usage:
//!   analyze_log <log_file> [--limit <count>]
//!
//! Example:
//!   analyze_log thread_incr.log --limit 20

use race_log_analyzer::{analyze, parse_file, AnalyzerError, ParserConfig};
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <log_file> [--limit <count>]", args[0]);
        process::exit(2);
    }

    let path = PathBuf::from(&args[1]);
    let limit = args
        .iter()
        .position(|a| a == "--limit")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10);

    let events = match parse_file(&path, &ParserConfig::new()) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Failed to parse {:?}: {}", path, e);
            process::exit(1);
        }
    };

    let report = match analyze(&events) {
        Ok(report) => report,
        Err(AnalyzerError::EmptyInput) => {
            println!("No valid entries found in the file.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            process::exit(1);
        }
    };

    println!("=== {} ===", path.display());
    println!("Events:           {}", report.total_events);
    println!("Threads:          {}", report.counts_by_thread.len());
    println!("Context switches: {}", report.context_switches);
    println!("Lost updates:     {}", report.lost_updates);
    println!("Overlap events:   {}", report.overlap_count());

    if let Some(last) = events.last() {
        println!("Final value:      {}", last.value);
    }

    for overlap in report.overlap_events.iter().take(limit) {
        println!(
            "  [{}] #{} saw {} -> #{} wrote {}",
            overlap.thread_id,
            overlap.stale_index,
            overlap.stale_value,
            overlap.resolving_index,
            overlap.new_value
        );
    }
    if report.overlap_count() > limit {
        println!("  ... {} more", report.overlap_count() - limit);
    }
}
