//! Keyword density and placement checks

use crate::config::KeywordRules;
use crate::models::{Category, Finding, Severity};
use crate::parser::ParsedDocument;
use memchr::memmem;

pub(super) fn check(
    doc: &ParsedDocument,
    keywords: &[String],
    rules: &KeywordRules,
    findings: &mut Vec<Finding>,
) -> f64 {
    // Matching is case-insensitive; whitespace-only keywords would match everywhere
    let keywords: Vec<String> = keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .map(|k| k.to_lowercase())
        .collect();

    if keywords.is_empty() {
        findings.push(Finding::new(
            Category::Keywords,
            "keywords_exist",
            Severity::Info,
            rules.baseline_points,
            "No keywords available, skipping keyword checks",
        ));
        return rules.baseline_points;
    }

    check_density(doc, &keywords, rules, findings) + check_position(doc, &keywords, rules, findings)
}

/// Keyword hits per body word.
///
/// Hits are raw non-overlapping substring matches, so `rust` also counts
/// inside `rusty`.
pub(crate) fn keyword_density(body: &str, keywords: &[String]) -> f64 {
    let content = body.to_lowercase();
    let total_words = content.split_whitespace().count();
    if total_words == 0 {
        return 0.0;
    }
    let hits: usize = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| memmem::find_iter(content.as_bytes(), k.to_lowercase().as_bytes()).count())
        .sum();
    hits as f64 / total_words as f64
}

fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

fn check_density(
    doc: &ParsedDocument,
    keywords: &[String],
    rules: &KeywordRules,
    findings: &mut Vec<Finding>,
) -> f64 {
    let density = keyword_density(&doc.raw_content, keywords);
    let current = percent(density, 2);
    let range = format!("{}-{}", percent(rules.min_density, 1), percent(rules.max_density, 1));

    let finding = if density < rules.min_density {
        Finding::new(
            Category::Keywords,
            "keyword_density",
            Severity::Warning,
            rules.low_density_points,
            format!("Keyword density is too low ({current})"),
        )
        .with_suggestion(format!("Aim for a keyword density of {range}"))
        .with_current(current)
        .with_expected(range)
    } else if density > rules.max_density {
        Finding::new(
            Category::Keywords,
            "keyword_density",
            Severity::Warning,
            rules.high_density_points,
            format!("Keyword density is too high ({current}), this may read as keyword stuffing"),
        )
        .with_suggestion(format!("Aim for a keyword density of {range}"))
        .with_current(current)
        .with_expected(range)
    } else {
        Finding::new(
            Category::Keywords,
            "keyword_density",
            Severity::Success,
            rules.density_points,
            format!("Keyword density is good ({current})"),
        )
        .with_current(current)
    };

    let score = finding.score;
    findings.push(finding);
    score
}

fn check_position(
    doc: &ParsedDocument,
    keywords: &[String],
    rules: &KeywordRules,
    findings: &mut Vec<Finding>,
) -> f64 {
    let contains_any = |text: &str| {
        let text = text.to_lowercase();
        keywords.iter().any(|k| text.contains(k.as_str()))
    };
    let in_title = contains_any(&doc.title);
    let in_description = contains_any(&doc.description);
    let in_h1 = doc.h1_tags.iter().any(|h| contains_any(h));

    let mut score = 0.0;
    let mut details = Vec::with_capacity(3);
    for (label, hit, points) in [
        ("title", in_title, rules.title_points),
        ("description", in_description, rules.description_points),
        ("H1", in_h1, rules.h1_points),
    ] {
        if hit {
            score += points;
        }
        details.push(format!("{label} {}", if hit { "✓" } else { "✗" }));
    }
    let details = details.join(" | ");

    let severity = if score >= rules.position_success_at {
        Severity::Success
    } else if score >= rules.position_warning_at {
        Severity::Warning
    } else {
        Severity::Critical
    };
    let max = rules.title_points + rules.description_points + rules.h1_points;

    let mut finding = Finding::new(
        Category::Keywords,
        "keyword_position",
        severity,
        score,
        format!("Keyword placement: {details}"),
    )
    .with_current(details);
    if score < max {
        finding = finding.with_suggestion("Use your keywords in the title, description and H1 heading");
    }
    findings.push(finding);
    score
}
