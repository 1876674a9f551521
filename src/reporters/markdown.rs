//! Markdown reporter
//!
//! Produces the diagnostic report: total score with badge, the four
//! sub-scores, keywords, findings grouped by category, the AI section and a
//! closing verdict. Rendering is pure; the same report always yields the
//! same text.

use crate::analyzer::BatchOutcome;
use crate::models::{score_badge, Category, SeoReport, Severity, AI_CAP};

const AI_LABEL: &str = "AI Semantics";

/// Marker shown next to each finding
fn severity_emoji(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::Warning => "🟠",
        Severity::Info => "🟡",
        Severity::Success => "🟢",
    }
}

/// Render one report as markdown
pub fn render(report: &SeoReport) -> String {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');
    md.push_str(&render_breakdown(report));
    md.push('\n');

    let keywords = render_keywords(report);
    if !keywords.is_empty() {
        md.push_str(&keywords);
        md.push('\n');
    }

    md.push_str(&render_diagnostics(report));

    if report.ai_analysis.is_some() {
        md.push_str(&render_ai(report));
        md.push('\n');
    }

    md.push_str(&render_summary(report));
    md
}

fn render_header(report: &SeoReport) -> String {
    format!(
        r#"# SEO Audit Report

**File**: `{}`

**Total Score**: {:.1}/100 {}
"#,
        report.file_path,
        report.total_score,
        report.badge()
    )
}

fn render_breakdown(report: &SeoReport) -> String {
    let mut md = String::from("## Score Breakdown\n\n");
    for category in Category::ALL {
        md.push_str(&format!(
            "- **{}**: {:.1}/{}\n",
            category.label(),
            report.category_score(category),
            category.cap()
        ));
    }
    md.push_str(&format!("- **{AI_LABEL}**: {:.1}/{}\n", report.ai_score, AI_CAP));
    md
}

fn render_keywords(report: &SeoReport) -> String {
    let mut md = String::new();
    if !report.user_keywords.is_empty() {
        md.push_str(&format!(
            "**Target keywords**: {}\n",
            report.user_keywords.join(", ")
        ));
    }
    if !report.extracted_keywords.is_empty() {
        md.push_str(&format!(
            "**Extracted keywords**: {}\n",
            report.extracted_keywords.join(", ")
        ));
    }
    md
}

fn render_diagnostics(report: &SeoReport) -> String {
    let mut md = String::from("## Diagnostics\n\n");

    for category in Category::ALL {
        let mut items = report.findings_in(category).peekable();
        if items.peek().is_none() {
            continue;
        }
        md.push_str(&format!("### {} Checks\n\n", category.label()));
        for item in items {
            md.push_str(&format!(
                "{} **{}** ({:.1} pts)\n",
                severity_emoji(item.severity),
                item.check,
                item.score
            ));
            md.push_str(&format!("   - {}\n", item.message));
            if let Some(suggestion) = &item.suggestion {
                md.push_str(&format!("   - 💡 Suggestion: {}\n", suggestion));
            }
            if let (Some(current), Some(expected)) = (&item.current_value, &item.expected_value) {
                md.push_str(&format!(
                    "   - Current: `{}` | Expected: `{}`\n",
                    current, expected
                ));
            }
            md.push('\n');
        }
    }
    md
}

fn render_ai(report: &SeoReport) -> String {
    let Some(ai) = &report.ai_analysis else {
        return String::new();
    };

    let mut md = format!(
        r#"## AI Semantic Analysis

**Overall feedback**: {}

- Relevance: {:.1}/100
- Depth: {:.1}/100
- Readability: {:.1}/100
"#,
        ai.overall_feedback, ai.relevance_score, ai.depth_score, ai.readability_score
    );

    if !ai.improvement_suggestions.is_empty() {
        md.push_str("\n**Suggested improvements**:\n\n");
        for (i, suggestion) in ai.improvement_suggestions.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }
    }
    md
}

fn render_summary(report: &SeoReport) -> String {
    let verdict = if report.total_score >= 90.0 {
        "✅ Excellent SEO quality, keep it up!"
    } else if report.total_score >= 70.0 {
        "⚠️ Good SEO quality, with room for improvement."
    } else {
        "❌ SEO quality needs significant work; focus on the diagnostics above."
    };
    format!("## Summary\n\n{verdict}\n")
}

/// Sub-scores read back from a rendered report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub metadata: f64,
    pub structure: f64,
    pub keywords: f64,
    pub ai: f64,
}

/// Parse the `## Score Breakdown` lines of a rendered report
pub fn parse_breakdown(markdown: &str) -> Option<Breakdown> {
    let value = |label: &str| -> Option<f64> {
        let prefix = format!("- **{label}**: ");
        markdown
            .lines()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .and_then(|rest| rest.split('/').next())
            .and_then(|score| score.trim().parse().ok())
    };

    Some(Breakdown {
        metadata: value(Category::Metadata.label())?,
        structure: value(Category::Structure.label())?,
        keywords: value(Category::Keywords.label())?,
        ai: value(AI_LABEL)?,
    })
}

/// Summary table for a directory run
pub fn render_batch_summary(outcome: &BatchOutcome) -> String {
    let mut md = format!(
        r#"# SEO Audit Summary

**Files analyzed**: {}/{}
"#,
        outcome.succeeded(),
        outcome.total_files
    );
    if let Some(avg) = outcome.average_score() {
        md.push_str(&format!("**Average score**: {:.1}/100 {}\n", avg, score_badge(avg)));
    }

    if !outcome.reports.is_empty() {
        md.push_str("\n| File | Score | Metadata | Structure | Keywords | AI |\n");
        md.push_str("|------|-------|----------|-----------|----------|----|\n");
        for r in &outcome.reports {
            md.push_str(&format!(
                "| `{}` | {:.1} {} | {:.1} | {:.1} | {:.1} | {:.1} |\n",
                r.file_path,
                r.total_score,
                r.badge(),
                r.metadata_score,
                r.structure_score,
                r.keyword_score,
                r.ai_score
            ));
        }
    }

    if !outcome.failures.is_empty() {
        md.push_str("\n## Failed Files\n\n");
        for failure in &outcome.failures {
            md.push_str(&format!("- `{}`: {}\n", failure.path.display(), failure.error));
        }
    }
    md
}
