//! Report generation
//!
//! Renders an [`AnalysisReport`] as a text summary or a JSON document.

pub mod json;
pub mod txt;

use crate::config::{OutputConfig, OutputFormat};
use anyhow::{bail, Result};
use race_log_analyzer::AnalysisReport;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Render `report` for `source` in the configured format
pub fn render(source: &Path, report: &AnalysisReport, output: &OutputConfig) -> Result<String> {
    match output.format {
        OutputFormat::Txt => Ok(txt::TextReport::new(report)
            .with_max_details(output.max_details)
            .to_string()),
        OutputFormat::Json => json::render(source, report),
    }
}

/// Path of the report file inside `output_dir`: `<output_dir>/<stem>.report.<ext>`
pub fn report_path(output_dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.report.{}", stem, format.extension()))
}

/// Path of the chart file inside `output_dir`: `<output_dir>/<stem>.chart.txt`
pub fn chart_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}.chart.txt", stem))
}

/// Output file stem for each input, in input order.
///
/// Inputs sharing a file stem get their 1-based position appended
/// (`thread_incr.2`) so their reports do not overwrite each other. Fails if
/// the names still collide.
pub fn output_stems(sources: &[PathBuf]) -> Result<Vec<String>> {
    let base: Vec<String> = sources.iter().map(|s| file_stem(s)).collect();

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for stem in &base {
        *occurrences.entry(stem.as_str()).or_insert(0) += 1;
    }

    let stems: Vec<String> = base
        .iter()
        .enumerate()
        .map(|(i, stem)| {
            if occurrences[stem.as_str()] > 1 {
                format!("{}.{}", stem, i + 1)
            } else {
                stem.clone()
            }
        })
        .collect();

    let mut seen = HashSet::new();
    for (source, stem) in sources.iter().zip(&stems) {
        if !seen.insert(stem.as_str()) {
            bail!(
                "Output name {:?} for {:?} collides with another input; rename the input file",
                stem,
                source
            );
        }
    }

    Ok(stems)
}

fn file_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_paths() {
        let dir = Path::new("out");
        assert_eq!(
            report_path(dir, "thread_incr", OutputFormat::Json),
            PathBuf::from("out/thread_incr.report.json")
        );
        assert_eq!(
            chart_path(dir, "thread_incr"),
            PathBuf::from("out/thread_incr.chart.txt")
        );
    }

    #[test]
    fn test_output_stems_unique_inputs_unchanged() {
        let sources = vec![PathBuf::from("runs/a.log"), PathBuf::from("b.log")];
        assert_eq!(output_stems(&sources).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_output_stems_disambiguate_same_stem() {
        let sources = vec![
            PathBuf::from("a/thread_incr.log"),
            PathBuf::from("other.log"),
            PathBuf::from("b/thread_incr.log"),
        ];
        assert_eq!(
            output_stems(&sources).unwrap(),
            vec!["thread_incr.1", "other", "thread_incr.3"]
        );
    }

    #[test]
    fn test_output_stems_reject_remaining_collision() {
        let sources = vec![
            PathBuf::from("a/thread_incr.log"),
            PathBuf::from("b/thread_incr.log"),
            PathBuf::from("thread_incr.2.log"),
        ];
        assert!(output_stems(&sources).is_err());
    }
}
