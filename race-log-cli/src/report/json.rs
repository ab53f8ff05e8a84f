//! JSON report output

use anyhow::{Context, Result};
use race_log_analyzer::AnalysisReport;
use serde::Serialize;
use std::path::Path;

/// Envelope written around the analyzer's report
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    source: String,
    generated_at: String,
    analyzer_version: &'static str,
    report: &'a AnalysisReport,
}

/// Render `report` as pretty-printed JSON
pub fn render(source: &Path, report: &AnalysisReport) -> Result<String> {
    let document = JsonReport {
        source: source.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        analyzer_version: race_log_analyzer::VERSION,
        report,
    };

    serde_json::to_string_pretty(&document)
        .with_context(|| format!("Failed to serialize report for {:?}", source))
}
