//! Output reporters for md-audit results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors and emoji
//! - `json` - Machine-readable JSON
//! - `markdown` - Markdown diagnostic report

pub mod json;
pub mod markdown;
pub mod text;

use crate::analyzer::BatchOutcome;
use crate::models::SeoReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render one report in the given format
pub fn report(report: &SeoReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(report)),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => Ok(markdown::render(report)),
    }
}

/// Render a directory run: a summary followed by every report
pub fn batch(outcome: &BatchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::render_batch(outcome),
        OutputFormat::Markdown => {
            let mut md = markdown::render_batch_summary(outcome);
            for r in &outcome.reports {
                md.push_str("\n---\n\n");
                md.push_str(&markdown::render(r));
                md.push('\n');
            }
            Ok(md)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for r in &outcome.reports {
                out.push_str(&text::render(r));
            }
            out.push_str(&text::render_batch_summary(outcome));
            Ok(out)
        }
    }
}

/// Render only the summary of a directory run
pub fn render_batch_summary(outcome: &BatchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_batch_summary(outcome)),
        OutputFormat::Json => json::render_batch_summary(outcome),
        OutputFormat::Markdown => Ok(markdown::render_batch_summary(outcome)),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analyzer::BatchFailure;
    use crate::models::{AiAnalysis, Category, Finding, Severity};

    /// A representative report for renderer tests
    pub(crate) fn test_report() -> SeoReport {
        let findings = vec![
            Finding::new(Category::Metadata, "title_length", Severity::Success, 15.0, "Title length is good (46 characters)")
                .with_current("46")
                .with_expected("30-60"),
            Finding::new(Category::Metadata, "description_length", Severity::Warning, 7.5, "Description is too short (80 characters)")
                .with_suggestion("Keep the description between 120-160 characters")
                .with_current("80")
                .with_expected("120-160"),
            Finding::new(Category::Structure, "h1_count", Severity::Success, 5.0, "H1 heading count is correct (1)"),
            Finding::new(Category::Structure, "image_alt", Severity::Info, 10.0, "No images on the page, alt text check not applicable"),
            Finding::new(Category::Structure, "internal_links", Severity::Warning, 0.0, "No links on the page"),
            Finding::new(Category::Keywords, "keyword_density", Severity::Success, 10.0, "Keyword density is good (1.50%)"),
            Finding::new(Category::Keywords, "keyword_position", Severity::Critical, 0.0, "Keyword placement: title ✗ | description ✗ | H1 ✗"),
        ];

        SeoReport {
            file_path: "docs/guide.md".into(),
            total_score: 63.5,
            metadata_score: 22.5,
            structure_score: 15.0,
            keyword_score: 10.0,
            ai_score: 16.0,
            findings,
            ai_analysis: Some(AiAnalysis {
                relevance_score: 70.0,
                depth_score: 60.0,
                readability_score: 60.0,
                overall_feedback: "Useful but thin".into(),
                improvement_suggestions: vec!["Add examples".into(), "Expand the setup section".into()],
            }),
            extracted_keywords: vec!["rust".into(), "web scraping".into()],
            user_keywords: Vec::new(),
        }
    }

    pub(crate) fn test_outcome() -> BatchOutcome {
        let mut second = test_report();
        second.file_path = "docs/zeta.md".into();
        second.total_score = 85.0;
        BatchOutcome {
            reports: vec![test_report(), second],
            failures: vec![BatchFailure {
                path: "docs/broken.md".into(),
                error: "File is not valid UTF-8: docs/broken.md".into(),
            }],
            total_files: 3,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(
            OutputFormat::from_str("markdown").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(file_extension(OutputFormat::Markdown), "md");
    }

    #[test]
    fn test_batch_markdown_contains_every_report() {
        let out = batch(&test_outcome(), OutputFormat::Markdown).unwrap();
        assert_eq!(out.matches("# SEO Audit Report").count(), 2);
        assert!(out.contains("docs/broken.md"));
    }

    #[test]
    fn test_batch_json_is_valid() {
        let out = batch(&test_outcome(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["reports"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["failures"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_batch_summary_formats() {
        let outcome = test_outcome();
        let md = render_batch_summary(&outcome, OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# SEO Audit Summary"));
        assert!(!md.contains("# SEO Audit Report"));
        let json = render_batch_summary(&outcome, OutputFormat::Json).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
        let text = render_batch_summary(&outcome, OutputFormat::Text).unwrap();
        assert!(text.contains("BATCH SUMMARY"));
    }
}
