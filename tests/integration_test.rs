//! Integration tests for the md-audit library
//!
//! Runs the full pipeline (parse, rules, scoring, rendering) against the
//! sample documents in `tests/fixtures` with AI scoring disabled.

use md_audit::analyzer::{Analyzer, BatchOptions};
use md_audit::config::AuditConfig;
use md_audit::models::{round1, Category, SeoReport, Severity};
use md_audit::reporters::{self, markdown, OutputFormat};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn analyzer() -> Analyzer {
    Analyzer::new(AuditConfig::default()).with_ai_engine(None)
}

fn analyze(name: &str, keywords: &[&str]) -> SeoReport {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
    analyzer()
        .analyze_file(&fixture(name), &keywords)
        .expect("fixture should analyze")
}

fn assert_score_invariants(report: &SeoReport) {
    let parts = report.metadata_score + report.structure_score + report.keyword_score + report.ai_score;
    assert!(
        (report.total_score - round1(parts)).abs() < 1e-9,
        "total {} != sum of parts {}",
        report.total_score,
        parts
    );
    assert!((0.0..=100.0).contains(&report.total_score));

    for category in Category::ALL {
        let sum: f64 = report.findings_in(category).map(|f| f.score).sum();
        let expected = round1(sum.clamp(0.0, category.cap()));
        assert_eq!(
            report.category_score(category),
            expected,
            "{} score does not match its findings",
            category.label()
        );
    }
}

#[test]
fn test_high_quality_document_scores_full_rule_points() {
    let report = analyze("high_quality.md", &["rust"]);

    assert_eq!(report.metadata_score, 30.0);
    assert_eq!(report.structure_score, 25.0);
    assert_eq!(report.keyword_score, 20.0);
    assert_eq!(report.ai_score, 0.0);
    assert_eq!(report.total_score, 75.0);
    assert!(report.ai_analysis.is_none());
    assert_eq!(report.user_keywords, vec!["rust"]);
    assert!(report
        .findings
        .iter()
        .all(|f| f.severity == Severity::Success || f.severity == Severity::Info));
    assert_score_invariants(&report);
}

#[test]
fn test_low_quality_document_gets_critical_metadata() {
    let report = analyze("low_quality.md", &[]);

    assert_eq!(report.metadata_score, 0.0);
    let critical: Vec<&str> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.check.as_str())
        .collect();
    assert!(critical.contains(&"title_exists"), "got {critical:?}");
    assert!(critical.contains(&"description_exists"), "got {critical:?}");
    assert_score_invariants(&report);
}

#[test]
fn test_quality_ordering() {
    let high = analyze("high_quality.md", &[]);
    let medium = analyze("medium_quality.md", &[]);
    let low = analyze("low_quality.md", &[]);

    assert!(high.total_score > low.total_score);
    assert!(medium.total_score > low.total_score);
    for report in [&high, &medium, &low] {
        assert_score_invariants(report);
    }
}

#[test]
fn test_keywords_extracted_when_none_given() {
    let report = analyze("high_quality.md", &[]);
    assert!(report.user_keywords.is_empty());
    assert!(!report.extracted_keywords.is_empty());
    assert!(report.extracted_keywords.len() <= AuditConfig::default().keywords.max_auto_keywords);
}

#[test]
fn test_markdown_report_round_trips_breakdown() {
    for name in ["high_quality.md", "medium_quality.md", "low_quality.md"] {
        let report = analyze(name, &["rust"]);
        let rendered = markdown::render(&report);
        let breakdown = markdown::parse_breakdown(&rendered).expect("breakdown present");
        assert_eq!(breakdown.metadata, report.metadata_score, "{name}");
        assert_eq!(breakdown.structure, report.structure_score, "{name}");
        assert_eq!(breakdown.keywords, report.keyword_score, "{name}");
        assert_eq!(breakdown.ai, report.ai_score, "{name}");
    }
}

#[test]
fn test_json_report_round_trips() {
    let report = analyze("medium_quality.md", &["rust", "error handling"]);
    let json = reporters::report(&report, OutputFormat::Json).unwrap();
    let back: SeoReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_directory_batch_over_fixtures() {
    let outcome = analyzer()
        .analyze_directory(&fixture(""), &[], &BatchOptions::default().workers(2))
        .unwrap();

    assert_eq!(outcome.total_files, 3);
    assert_eq!(outcome.succeeded(), 3);
    assert!(outcome.failures.is_empty());
    assert!(outcome.reports[0].file_path.ends_with("high_quality.md"));
    assert!(outcome.reports[2].file_path.ends_with("medium_quality.md"));
}

#[test]
fn test_analysis_is_deterministic() {
    let first = analyze("high_quality.md", &[]);
    let second = analyze("high_quality.md", &[]);
    assert_eq!(first, second);
    assert_eq!(markdown::render(&first), markdown::render(&second));
}
