//! JSON reporter
//!
//! Outputs the full SeoReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::analyzer::BatchOutcome;
use crate::models::SeoReport;
use anyhow::Result;
use serde_json::json;

/// Render report as JSON
pub fn render(report: &SeoReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(report: &SeoReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

/// Render a directory run with its reports and failures
pub fn render_batch(outcome: &BatchOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Counts and per-file scores only
pub fn render_batch_summary(outcome: &BatchOutcome) -> Result<String> {
    let files: Vec<_> = outcome
        .reports
        .iter()
        .map(|r| json!({ "file_path": r.file_path, "total_score": r.total_score }))
        .collect();
    let summary = json!({
        "total_files": outcome.total_files,
        "succeeded": outcome.succeeded(),
        "failed": outcome.failed(),
        "average_score": outcome.average_score(),
        "files": files,
        "failures": outcome.failures,
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}
