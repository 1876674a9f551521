//! Markdown document parser
//!
//! Turns raw markdown into a [`ParsedDocument`]: frontmatter fields, heading
//! lists, image and link inventories, a lightweight HTML rendering and a
//! word count. Also hosts keyword auto-extraction.

mod frontmatter;
mod keywords;
mod markdown;

pub use keywords::{extract_keywords, is_quality_keyword};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions treated as markdown
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Errors that can occur while reading a document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("File is not valid UTF-8: {}", path.display())]
    Encoding { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            ErrorKind::NotFound => ParseError::NotFound { path },
            ErrorKind::PermissionDenied => ParseError::PermissionDenied { path },
            ErrorKind::InvalidData => ParseError::Encoding { path },
            _ => ParseError::Io { path, source },
        }
    }
}

/// An image reference (`![alt](src)` or `<img>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// A link reference (`[text](href)`, `<a href>` or an autolink)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub href: String,
    pub text: String,
}

/// Structured view of a markdown document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub frontmatter: Map<String, Value>,
    /// Markdown body with the frontmatter removed
    pub raw_content: String,
    pub html_content: String,
    /// Frontmatter `title`, falling back to the first H1
    pub title: String,
    /// Frontmatter `description`
    pub description: String,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub images: Vec<ImageRef>,
    pub links: Vec<LinkRef>,
    pub word_count: usize,
}

/// Check whether a path has a markdown extension
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| m.eq_ignore_ascii_case(ext))
        })
}

/// Read and parse a markdown file
pub fn parse_file(path: &Path) -> Result<ParsedDocument, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::from_io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| ParseError::Encoding {
        path: path.to_path_buf(),
    })?;
    Ok(parse_str(&text))
}

/// Parse markdown text that is already in memory
pub fn parse_str(text: &str) -> ParsedDocument {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (frontmatter, body) = frontmatter::split(text);
    let outline = markdown::scan(&body);

    let title = frontmatter_str(&frontmatter, "title")
        .or_else(|| outline.h1.first().cloned())
        .unwrap_or_default();
    let description = frontmatter_str(&frontmatter, "description").unwrap_or_default();
    let word_count = count_words(&outline.plain_text);

    ParsedDocument {
        frontmatter,
        raw_content: body,
        html_content: outline.html,
        title,
        description,
        h1_tags: outline.h1,
        h2_tags: outline.h2,
        images: outline.images,
        links: outline.links,
        word_count,
    }
}

/// Read a scalar frontmatter field as a trimmed, non-empty string
fn frontmatter_str(frontmatter: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match frontmatter.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// CJK ideographs, kana and hangul count as one word each
pub(crate) fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{AC00}'..='\u{D7AF}')
}

/// Count words in plain text.
///
/// Runs of alphanumeric characters count once per whitespace token (so
/// `don't` is one word); every CJK character counts on its own.
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    for token in text.split_whitespace() {
        let mut in_word = false;
        for ch in token.chars() {
            if is_cjk(ch) {
                count += 1;
                in_word = false;
            } else if ch.is_alphanumeric() && !in_word {
                count += 1;
                in_word = true;
            }
        }
    }
    count
}
