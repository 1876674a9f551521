//! Title and description checks

use crate::config::{DescriptionRules, TitleRules};
use crate::models::{Category, Finding, Severity};
use crate::parser::ParsedDocument;

/// One length-banded metadata field
struct LengthBand<'a> {
    field: &'a str,
    min: usize,
    max: usize,
    points: f64,
    short_points: f64,
    long_points: f64,
}

pub(super) fn check(
    doc: &ParsedDocument,
    title: &TitleRules,
    description: &DescriptionRules,
    findings: &mut Vec<Finding>,
) -> f64 {
    let title_band = LengthBand {
        field: "title",
        min: title.min_length,
        max: title.max_length,
        points: title.points,
        short_points: title.short_points,
        long_points: title.long_points,
    };
    let description_band = LengthBand {
        field: "description",
        min: description.min_length,
        max: description.max_length,
        points: description.points,
        short_points: description.short_points,
        long_points: description.long_points,
    };

    let mut score = check_length(&doc.title, &title_band, findings);
    score += check_length(&doc.description, &description_band, findings);
    score
}

fn check_length(value: &str, band: &LengthBand<'_>, findings: &mut Vec<Finding>) -> f64 {
    let field = band.field;
    let range = format!("{}-{}", band.min, band.max);

    if value.is_empty() {
        let suggestion = if field == "title" {
            "Add a `title` field to the frontmatter or an H1 heading"
        } else {
            "Add a `description` field to the frontmatter"
        };
        findings.push(
            Finding::new(
                Category::Metadata,
                format!("{field}_exists"),
                Severity::Critical,
                0.0,
                format!("Missing {field}"),
            )
            .with_suggestion(suggestion)
            .with_current("none")
            .with_expected("required"),
        );
        return 0.0;
    }

    // Lengths are in characters so CJK titles are not penalized
    let len = value.chars().count();
    let check = format!("{field}_length");
    let (severity, score, message, suggestion) = if len < band.min {
        (
            Severity::Warning,
            band.short_points,
            format!("{} is too short ({len} characters)", capitalize(field)),
            Some(format!("Keep the {field} between {range} characters")),
        )
    } else if len > band.max {
        (
            Severity::Warning,
            band.long_points,
            format!("{} is too long ({len} characters)", capitalize(field)),
            Some(format!(
                "Keep the {field} between {range} characters; longer text gets truncated in search results"
            )),
        )
    } else {
        (
            Severity::Success,
            band.points,
            format!("{} length is good ({len} characters)", capitalize(field)),
            None,
        )
    };

    let mut finding = Finding::new(Category::Metadata, check, severity, score, message)
        .with_current(len.to_string())
        .with_expected(range);
    if let Some(suggestion) = suggestion {
        finding = finding.with_suggestion(suggestion);
    }
    findings.push(finding);
    score
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_title(title: &str) -> Finding {
        let doc = ParsedDocument {
            title: title.to_string(),
            ..Default::default()
        };
        let mut findings = Vec::new();
        check(&doc, &TitleRules::default(), &DescriptionRules::default(), &mut findings);
        findings.remove(0)
    }

    #[test]
    fn test_title_bounds_are_inclusive() {
        let at_min = run_title(&"t".repeat(30));
        assert_eq!(at_min.severity, Severity::Success);
        assert_eq!(at_min.score, 15.0);

        let at_max = run_title(&"t".repeat(60));
        assert_eq!(at_max.severity, Severity::Success);
        assert_eq!(at_max.score, 15.0);
    }

    #[test]
    fn test_title_short_and_long() {
        let short = run_title(&"t".repeat(29));
        assert_eq!(short.severity, Severity::Warning);
        assert_eq!(short.score, 7.5);
        assert_eq!(short.current_value.as_deref(), Some("29"));
        assert_eq!(short.expected_value.as_deref(), Some("30-60"));
        assert!(short.suggestion.is_some());

        let long = run_title(&"t".repeat(61));
        assert_eq!(long.severity, Severity::Warning);
        assert_eq!(long.score, 10.0);
    }

    #[test]
    fn test_title_counts_characters() {
        // 30 CJK characters are 90 bytes but within range
        let title = "标".repeat(30);
        assert_eq!(run_title(&title).severity, Severity::Success);
    }

    #[test]
    fn test_missing_title() {
        let f = run_title("");
        assert_eq!(f.check, "title_exists");
        assert_eq!(f.severity, Severity::Critical);
        assert_eq!(f.score, 0.0);
    }

    #[test]
    fn test_description_bands() {
        let doc = ParsedDocument {
            title: "x".repeat(40),
            description: "d".repeat(100),
            ..Default::default()
        };
        let mut findings = Vec::new();
        let score = check(&doc, &TitleRules::default(), &DescriptionRules::default(), &mut findings);
        assert_eq!(findings[1].check, "description_length");
        assert_eq!(findings[1].score, 7.5);
        assert_eq!(score, 22.5);
    }
}
