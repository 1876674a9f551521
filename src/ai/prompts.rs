//! Prompt templates for semantic SEO scoring

use crate::parser::ParsedDocument;
use regex::Regex;
use std::sync::OnceLock;

/// System prompt sent with every scoring request
pub const SYSTEM_PROMPT: &str =
    "You are a professional SEO analyst who evaluates the quality of written content. \
     Always answer with a single JSON object.";

/// Body characters included in the prompt
pub const DEFAULT_BODY_CHARS: usize = 1000;

/// Builder for the per-document scoring prompt
pub struct SeoPromptBuilder<'a> {
    doc: &'a ParsedDocument,
    keywords: Vec<String>,
    body_chars: usize,
}

impl<'a> SeoPromptBuilder<'a> {
    pub fn new(doc: &'a ParsedDocument) -> Self {
        Self {
            doc,
            keywords: Vec::new(),
            body_chars: DEFAULT_BODY_CHARS,
        }
    }

    pub fn keywords(mut self, keywords: &[String]) -> Self {
        self.keywords = keywords.to_vec();
        self
    }

    pub fn body_chars(mut self, chars: usize) -> Self {
        self.body_chars = chars;
        self
    }

    pub fn build(self) -> String {
        let keywords = if self.keywords.is_empty() {
            "none provided".to_string()
        } else {
            self.keywords
                .iter()
                .map(|k| sanitize_text(k))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let excerpt = take_chars(&self.doc.raw_content, self.body_chars);

        format!(
            r#"Analyze the quality of the following markdown article for SEO.

**Title**: {title}
**Description**: {description}
**Target keywords**: {keywords}
**Word count**: {word_count}

**Content** (first {body_chars} characters):
{excerpt}

Score the article from 0 to 100 on three dimensions:

1. **relevance_score**: how well the content matches the target keywords
2. **depth_score**: whether the content is thorough and practically useful
3. **readability_score**: whether the structure is clear and the language flows

Also provide:
- **overall_feedback**: a verdict of at most 50 words
- **improvement_suggestions**: 2-3 specific improvements

**Output format** (JSON):
{{
  "relevance_score": 85,
  "depth_score": 75,
  "readability_score": 90,
  "overall_feedback": "Strongly on topic but lacks hands-on examples",
  "improvement_suggestions": [
    "Add more code samples",
    "Cover real-world use cases"
  ]
}}
"#,
            title = sanitize_text(&self.doc.title),
            description = sanitize_text(&self.doc.description),
            word_count = self.doc.word_count,
            body_chars = self.body_chars,
            excerpt = sanitize_text(excerpt),
        )
    }
}

/// Prefix of `text` holding at most `max` characters
fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Neutralize prompt-injection phrases in document text
fn sanitize_text(text: &str) -> String {
    static INJECTION_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    let patterns = INJECTION_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)ignore\s+(all\s+)?previous\s+instructions?").expect("valid regex"),
            Regex::new(r"(?i)disregard\s+(all\s+)?previous").expect("valid regex"),
            Regex::new(r"(?i)forget\s+(all\s+)?previous").expect("valid regex"),
            Regex::new(r"(?i)<\s*/?\s*system\s*>").expect("valid regex"),
            Regex::new(r"(?im)^\s*(system|assistant|human)\s*:\s*").expect("valid regex"),
            Regex::new(r"(?i)(give|set|rate)\s+(this|the)\s+(article|content|document)\s+(a\s+)?(score|rating)\s+of\s+\d+")
                .expect("valid regex"),
            Regex::new(r"(?i)output\s+(your\s+)?(api\s*key|secret|password|credential)")
                .expect("valid regex"),
            Regex::new(r"(?i)reveal\s+(your\s+)?(api\s*key|secret|password|credential)")
                .expect("valid regex"),
        ]
    });

    let mut result = text.to_string();
    for pattern in patterns {
        result = pattern.replace_all(&result, "[REDACTED]").into_owned();
    }
    result
}
