//! Text (terminal) reporter with colors and formatting

use crate::analyzer::BatchOutcome;
use crate::models::{score_badge, Category, SeoReport, Severity, AI_CAP};

/// Severity colors
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m", // Red
        Severity::Warning => "\x1b[33m",  // Yellow
        Severity::Info => "\x1b[34m",     // Blue
        Severity::Success => "\x1b[32m",  // Green
    }
}

/// Score colors follow the badge tiers
fn score_color(score: f64) -> &'static str {
    if score < 40.0 {
        "\x1b[31m"
    } else if score < 60.0 {
        "\x1b[91m"
    } else if score < 80.0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Severity tag
fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::Warning => "[W]",
        Severity::Info => "[I]",
        Severity::Success => "[✓]",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &SeoReport) -> String {
    let mut out = String::new();

    // Header
    let score_c = score_color(report.total_score);
    out.push_str(&format!("\n{BOLD}SEO Audit{RESET}  {DIM}{}{RESET}\n", report.file_path));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {score_c}{BOLD}{:.1}/100{RESET} {}\n\n",
        report.total_score,
        report.badge()
    ));

    // Category scores (compact)
    out.push_str(&format!("{BOLD}SCORES{RESET}\n"));
    let parts: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{}: {:.1}/{}", c.label(), report.category_score(*c), c.cap()))
        .chain(std::iter::once(format!("AI: {:.1}/{}", report.ai_score, AI_CAP)))
        .collect();
    out.push_str(&format!("  {}\n", parts.join("  ")));

    let keywords = report.keywords_used();
    if !keywords.is_empty() {
        let source = if report.user_keywords.is_empty() {
            "extracted"
        } else {
            "target"
        };
        out.push_str(&format!(
            "  {DIM}Keywords ({source}):{RESET} {}\n",
            keywords.join(", ")
        ));
    }
    out.push('\n');

    // Findings summary
    let fs = report.findings_summary();
    out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", fs.total));
    let mut summary_parts = Vec::new();
    if fs.critical > 0 {
        summary_parts.push(format!("\x1b[31m{} critical{RESET}", fs.critical));
    }
    if fs.warning > 0 {
        summary_parts.push(format!("\x1b[33m{} warning{RESET}", fs.warning));
    }
    if fs.info > 0 {
        summary_parts.push(format!("\x1b[34m{} info{RESET}", fs.info));
    }
    if fs.success > 0 {
        summary_parts.push(format!("\x1b[32m{} passed{RESET}", fs.success));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n\n", summary_parts.join(" | ")));
    }

    for category in Category::ALL {
        for finding in report.findings_in(category) {
            let sev_c = severity_color(finding.severity);
            out.push_str(&format!(
                "  {sev_c}{}{RESET} {:<20} {DIM}{:>5.1}{RESET}  {}\n",
                severity_tag(finding.severity),
                finding.check,
                finding.score,
                finding.message
            ));
            if let Some(suggestion) = &finding.suggestion {
                out.push_str(&format!("      {DIM}→ {}{RESET}\n", suggestion));
            }
        }
    }
    out.push('\n');

    if let Some(ai) = &report.ai_analysis {
        out.push_str(&format!("{BOLD}AI ANALYSIS{RESET}\n"));
        out.push_str(&format!(
            "  Relevance: {:.0}  Depth: {:.0}  Readability: {:.0}\n",
            ai.relevance_score, ai.depth_score, ai.readability_score
        ));
        if !ai.overall_feedback.is_empty() {
            out.push_str(&format!("  {}\n", ai.overall_feedback));
        }
        for suggestion in &ai.improvement_suggestions {
            out.push_str(&format!("  {DIM}•{RESET} {}\n", suggestion));
        }
        out.push('\n');
    }

    out
}

/// Summary table for a directory run
pub fn render_batch_summary(outcome: &BatchOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}BATCH SUMMARY{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Analyzed: {}/{}",
        outcome.succeeded(),
        outcome.total_files
    ));
    if let Some(avg) = outcome.average_score() {
        out.push_str(&format!(
            "  Average: {}{BOLD}{:.1}{RESET} {}",
            score_color(avg),
            avg,
            score_badge(avg)
        ));
    }
    out.push_str("\n\n");

    for r in &outcome.reports {
        out.push_str(&format!(
            "  {}{:>5.1}{RESET}  {}\n",
            score_color(r.total_score),
            r.total_score,
            r.file_path
        ));
    }

    if !outcome.failures.is_empty() {
        out.push_str(&format!("\n{BOLD}FAILED{RESET} ({})\n", outcome.failed()));
        for failure in &outcome.failures {
            out.push_str(&format!(
                "  \x1b[31m✗{RESET} {}  {DIM}{}{RESET}\n",
                failure.path.display(),
                failure.error
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{test_outcome, test_report};

    #[test]
    fn test_text_render_basic() {
        let output = render(&test_report());
        assert!(output.contains("SEO Audit"));
        assert!(output.contains("63.5/100"));
        assert!(output.contains("Metadata: 22.5/30"));
        assert!(output.contains("Keywords (extracted):"));
        assert!(output.contains("description_length"));
        assert!(output.contains("AI ANALYSIS"));
    }

    #[test]
    fn test_text_render_without_ai() {
        let mut report = test_report();
        report.ai_analysis = None;
        let output = render(&report);
        assert!(!output.contains("AI ANALYSIS"));
    }

    #[test]
    fn test_batch_summary_lists_failures() {
        let output = render_batch_summary(&test_outcome());
        assert!(output.contains("Analyzed: 2/3"));
        assert!(output.contains("docs/zeta.md"));
        assert!(output.contains("FAILED"));
        assert!(output.contains("docs/broken.md"));
    }
}
