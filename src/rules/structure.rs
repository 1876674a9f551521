//! Heading, image alt text, link and length checks

use crate::config::ContentRules;
use crate::models::{Category, Finding, Severity};
use crate::parser::ParsedDocument;

pub(super) fn check(doc: &ParsedDocument, rules: &ContentRules, findings: &mut Vec<Finding>) -> f64 {
    let mut score = check_h1(doc, rules, findings);
    score += check_image_alt(doc, rules, findings);
    score += check_links(doc, rules, findings);
    check_content_length(doc, rules, findings);
    score
}

fn check_h1(doc: &ParsedDocument, rules: &ContentRules, findings: &mut Vec<Finding>) -> f64 {
    let count = doc.h1_tags.len();
    let expected = if rules.min_h1_count == rules.max_h1_count {
        rules.min_h1_count.to_string()
    } else {
        format!("{}-{}", rules.min_h1_count, rules.max_h1_count)
    };

    let finding = if count < rules.min_h1_count {
        Finding::new(
            Category::Structure,
            "h1_count",
            Severity::Critical,
            0.0,
            format!("Missing H1 heading (found {count})"),
        )
        .with_suggestion("Each page should have exactly one H1 heading")
    } else if count > rules.max_h1_count {
        Finding::new(
            Category::Structure,
            "h1_count",
            Severity::Warning,
            rules.extra_h1_points,
            format!("Too many H1 headings (found {count})"),
        )
        .with_suggestion("Multiple H1 headings dilute the page topic; keep a single H1")
    } else {
        Finding::new(
            Category::Structure,
            "h1_count",
            Severity::Success,
            rules.h1_points,
            format!("H1 heading count is correct ({count})"),
        )
    };

    let finding = finding.with_current(count.to_string()).with_expected(expected);
    let score = finding.score;
    findings.push(finding);
    score
}

fn check_image_alt(doc: &ParsedDocument, rules: &ContentRules, findings: &mut Vec<Finding>) -> f64 {
    let total = doc.images.len();
    if total == 0 {
        findings.push(Finding::new(
            Category::Structure,
            "image_alt",
            Severity::Info,
            rules.image_alt_points,
            "No images on the page, alt text check not applicable",
        ));
        return rules.image_alt_points;
    }

    let with_alt = doc.images.iter().filter(|img| !img.alt.is_empty()).count();
    let ratio = with_alt as f64 / total as f64;
    let current = format!("{:.1}%", ratio * 100.0);

    if ratio < rules.min_image_alt_ratio {
        let score = rules.image_alt_points * ratio;
        findings.push(
            Finding::new(
                Category::Structure,
                "image_alt",
                Severity::Warning,
                score,
                format!("Insufficient image alt text coverage ({with_alt}/{total})"),
            )
            .with_suggestion("Give every image descriptive alt text for accessibility and SEO")
            .with_current(current)
            .with_expected(format!(">={:.0}%", rules.min_image_alt_ratio * 100.0)),
        );
        score
    } else {
        findings.push(
            Finding::new(
                Category::Structure,
                "image_alt",
                Severity::Success,
                rules.image_alt_points,
                format!("Image alt text coverage is good ({with_alt}/{total})"),
            )
            .with_current(current),
        );
        rules.image_alt_points
    }
}

fn check_links(doc: &ParsedDocument, rules: &ContentRules, findings: &mut Vec<Finding>) -> f64 {
    let count = doc.links.len();
    let finding = if count == 0 {
        Finding::new(
            Category::Structure,
            "internal_links",
            Severity::Warning,
            0.0,
            "No links on the page",
        )
        .with_suggestion("Link to related articles to help readers and crawlers")
    } else if count < rules.min_links {
        Finding::new(
            Category::Structure,
            "internal_links",
            Severity::Info,
            rules.few_links_points,
            format!("Few links on the page ({count})"),
        )
        .with_suggestion(format!("Add links to related articles (at least {})", rules.min_links))
        .with_current(count.to_string())
        .with_expected(format!(">={}", rules.min_links))
    } else {
        Finding::new(
            Category::Structure,
            "internal_links",
            Severity::Success,
            rules.link_points,
            format!("Link count is reasonable ({count})"),
        )
        .with_current(count.to_string())
    };

    let score = finding.score;
    findings.push(finding);
    score
}

/// Advisory only; contributes no points
fn check_content_length(doc: &ParsedDocument, rules: &ContentRules, findings: &mut Vec<Finding>) {
    let words = doc.word_count;
    let finding = if words < rules.min_length {
        Finding::new(
            Category::Structure,
            "content_length",
            Severity::Info,
            0.0,
            format!("Content is short ({words} words)"),
        )
        .with_suggestion(format!(
            "Pages with at least {} words tend to rank better",
            rules.min_length
        ))
        .with_current(words.to_string())
        .with_expected(format!(">={}", rules.min_length))
    } else {
        Finding::new(
            Category::Structure,
            "content_length",
            Severity::Success,
            0.0,
            format!("Content length is sufficient ({words} words)"),
        )
        .with_current(words.to_string())
    };
    findings.push(finding);
}
