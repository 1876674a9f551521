//! Frontmatter splitting and YAML decoding

use serde_json::{Map, Value};
use tracing::debug;

const DELIMITER: &str = "---";

/// Split a document into its frontmatter map and body.
///
/// A document without a leading `---` line, or whose block is never
/// closed, is returned whole as body. A block that is not a YAML mapping
/// yields an empty map.
pub(super) fn split(text: &str) -> (Map<String, Value>, String) {
    let Some(first_line_end) = text.find('\n') else {
        return (Map::new(), text.to_string());
    };
    if text[..first_line_end].trim() != DELIMITER {
        return (Map::new(), text.to_string());
    }

    let mut offset = first_line_end + 1;
    while offset <= text.len() {
        let rest = &text[offset..];
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];
        if line.trim() == DELIMITER || line.trim() == "..." {
            let raw = &text[first_line_end + 1..offset];
            let body_start = (offset + line_len + 1).min(text.len());
            let data = parse_block(raw).unwrap_or_else(|e| {
                debug!("Ignoring invalid frontmatter: {}", e);
                Map::new()
            });
            return (data, text[body_start..].to_string());
        }
        if line_len == rest.len() {
            break;
        }
        offset += line_len + 1;
    }

    debug!("Unterminated frontmatter block, treating it as body");
    (Map::new(), text.to_string())
}

fn parse_block(raw: &str) -> Result<Map<String, Value>, serde_yaml::Error> {
    match serde_yaml::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => {
            debug!("Frontmatter is not a mapping: {}", other);
            Ok(Map::new())
        }
    }
}
