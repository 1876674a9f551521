//! Keyword auto-extraction
//!
//! Frequency based: latin words are lower-cased and stop-word filtered, CJK
//! runs are split into character bigrams, and adjacent latin words that
//! repeat form two-word phrases.

use super::is_cjk;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else", "etc",
    "few", "for", "from", "further", "get", "gets", "got", "had", "has", "have", "having", "he",
    "her", "here", "hers", "him", "his", "how", "however", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "let", "like", "may", "me", "might", "more", "most", "much", "must",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "use", "used", "using",
    "very", "via", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours",
];

const CJK_STOP_CHARS: &[char] = &[
    '的', '了', '和', '是', '在', '我', '有', '这', '那', '个', '们', '你', '他', '她', '它', '就',
    '也', '都', '而', '及', '与', '或', '一', '不', '为', '对', '把', '被', '从', '到', '以', '之',
    '其', '但', '并', '等', '吗', '呢', '吧', '啊', '很', '让', '将', '会', '能', '要',
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
        || (!word.is_empty() && word.chars().all(|c| CJK_STOP_CHARS.contains(&c)))
}

struct Cleaners {
    code_span: Regex,
    image: Regex,
    link: Regex,
    html_tag: Regex,
    url: Regex,
}

fn cleaners() -> &'static Cleaners {
    static CLEANERS: OnceLock<Cleaners> = OnceLock::new();
    CLEANERS.get_or_init(|| Cleaners {
        code_span: Regex::new(r"`[^`]*`").expect("valid regex"),
        image: Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"),
        link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        html_tag: Regex::new(r"(?s)<[^>]+>").expect("valid regex"),
        url: Regex::new(r"(?i)\b(?:https?|ftp)://\S+|\bwww\.\S+").expect("valid regex"),
    })
}

/// Check whether a phrase is usable as a keyword.
///
/// Rejects URLs, markup fragments, numbers, single characters, stop words
/// and phrases that start or end with a stop word.
pub fn is_quality_keyword(keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.chars().count() < 2 {
        return false;
    }
    if keyword.contains("://") || keyword.to_lowercase().contains("www.") {
        return false;
    }
    if keyword.contains(['<', '>', '{', '}']) {
        return false;
    }
    if !keyword.chars().any(char::is_alphabetic) {
        return false;
    }

    let lower = keyword.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    match words.as_slice() {
        [] => false,
        [single] => !is_stop_word(single),
        [first, .., last] => !is_stop_word(first) && !is_stop_word(last),
    }
}

enum Piece {
    Word(String),
    Cjk(String),
    Break,
}

struct Candidate {
    phrase: String,
    words: usize,
    count: usize,
    first: usize,
}

/// Extract up to `max` keywords from markdown text, most relevant first
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    if max == 0 {
        return Vec::new();
    }

    let pieces = tokenize(&clean(text));
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut bump = |phrase: String, words: usize, pos: usize| {
        if let Some(&i) = index.get(&phrase) {
            candidates[i].count += 1;
        } else {
            index.insert(phrase.clone(), candidates.len());
            candidates.push(Candidate { phrase, words, count: 1, first: pos });
        }
    };

    let mut prev: Option<(String, usize)> = None;
    for (pos, piece) in pieces.into_iter().enumerate() {
        match piece {
            Piece::Word(word) => {
                let keep = word.chars().count() >= 2
                    && !word.chars().all(|c| c.is_numeric())
                    && !is_stop_word(&word);
                if !keep {
                    prev = None;
                    continue;
                }
                if let Some((prev_word, prev_pos)) = prev.take() {
                    bump(format!("{prev_word} {word}"), 2, prev_pos);
                }
                bump(word.clone(), 1, pos);
                prev = Some((word, pos));
            }
            Piece::Cjk(pair) => {
                prev = None;
                if !pair.chars().any(|c| CJK_STOP_CHARS.contains(&c)) {
                    bump(pair, 1, pos);
                }
            }
            Piece::Break => prev = None,
        }
    }

    candidates.retain(|c| c.words == 1 || c.count >= 2);
    candidates.sort_by(|a, b| {
        (b.count * b.words)
            .cmp(&(a.count * a.words))
            .then(a.first.cmp(&b.first))
    });

    let mut selected: Vec<&Candidate> = Vec::new();
    for candidate in &candidates {
        if selected.len() >= max {
            break;
        }
        if !is_quality_keyword(&candidate.phrase) {
            continue;
        }
        // A word that only ever appears inside a chosen phrase adds nothing
        let covered = candidate.words == 1
            && selected.iter().any(|s| {
                s.words > 1
                    && s.count == candidate.count
                    && s.phrase.split(' ').any(|w| w == candidate.phrase)
            });
        if !covered {
            selected.push(candidate);
        }
    }

    selected.into_iter().map(|c| c.phrase.clone()).collect()
}

/// Drop fenced code, inline code, images, link targets, tags and URLs
fn clean(text: &str) -> String {
    let mut prose = String::with_capacity(text.len());
    let mut fence: Option<&str> = None;
    for line in text.lines() {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None if trimmed.starts_with("```") => fence = Some("```"),
            None if trimmed.starts_with("~~~") => fence = Some("~~~"),
            None => {
                prose.push_str(line);
                prose.push('\n');
            }
        }
    }

    let c = cleaners();
    let t = c.code_span.replace_all(&prose, " ");
    let t = c.image.replace_all(&t, " ");
    let t = c.link.replace_all(&t, "$1");
    let t = c.html_tag.replace_all(&t, " ");
    c.url.replace_all(&t, " ").into_owned()
}

fn tokenize(text: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut word = String::new();
    let mut cjk: Vec<char> = Vec::new();

    fn flush_word(word: &mut String, pieces: &mut Vec<Piece>) {
        if !word.is_empty() {
            pieces.push(Piece::Word(std::mem::take(word)));
        }
    }

    fn flush_cjk(cjk: &mut Vec<char>, pieces: &mut Vec<Piece>) {
        if cjk.len() == 1 {
            pieces.push(Piece::Break);
        }
        for pair in cjk.windows(2) {
            pieces.push(Piece::Cjk(pair.iter().collect()));
        }
        cjk.clear();
    }

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if is_cjk(ch) {
            flush_word(&mut word, &mut pieces);
            cjk.push(ch);
        } else if ch.is_alphanumeric() {
            flush_cjk(&mut cjk, &mut pieces);
            word.extend(ch.to_lowercase());
        } else if ch == '-'
            && !word.is_empty()
            && chars.peek().is_some_and(|next| next.is_alphanumeric() && !is_cjk(*next))
        {
            word.push('-');
        } else {
            flush_word(&mut word, &mut pieces);
            flush_cjk(&mut cjk, &mut pieces);
            if !ch.is_whitespace() {
                pieces.push(Piece::Break);
            }
        }
    }
    flush_word(&mut word, &mut pieces);
    flush_cjk(&mut cjk, &mut pieces);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_filter() {
        assert!(!is_quality_keyword("the"));
        assert!(!is_quality_keyword("a"));
        assert!(!is_quality_keyword("123"));
        assert!(!is_quality_keyword("https://example.com"));
        assert!(!is_quality_keyword("www.example.com"));
        assert!(!is_quality_keyword("<div>"));
        assert!(!is_quality_keyword("{{ template }}"));
        assert!(!is_quality_keyword("the guide"));
        assert!(is_quality_keyword("Python SEO"));
        assert!(is_quality_keyword("rust"));
        assert!(is_quality_keyword("中文"));
        assert!(!is_quality_keyword("的了"));
    }

    #[test]
    fn test_repeated_phrases_win() {
        let kws = extract_keywords(
            "Rust web scraping guide. Rust web scraping is fun. Learn rust web scraping with examples.",
            5,
        );
        assert_eq!(kws.len(), 5);
        assert_eq!(kws[0], "rust web");
        assert_eq!(kws[1], "web scraping");
        assert!(!kws.contains(&"rust".to_string()));
        assert!(!kws.contains(&"with".to_string()));
    }

    #[test]
    fn test_max_is_respected() {
        assert!(extract_keywords("alpha beta gamma delta", 0).is_empty());
        assert_eq!(extract_keywords("alpha beta gamma delta", 2), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_urls_and_code_ignored() {
        let kws = extract_keywords(
            "Visit https://example.com/page and www.test.org for the details about the details.\n\n```\nfn main() { println!(\"hidden\"); }\n```\n\nInline `secret_call()` here.\n",
            10,
        );
        assert_eq!(kws[0], "details");
        assert!(kws.iter().all(|k| !k.contains("example") && !k.contains("test")));
        assert!(kws.iter().all(|k| !k.contains("println") && !k.contains("hidden") && !k.contains("secret")));
    }

    #[test]
    fn test_link_text_kept_target_dropped() {
        let kws = extract_keywords("Read [crawler basics](/docs/crawler) and crawler tips.", 5);
        assert_eq!(kws[0], "crawler");
        assert!(kws.iter().all(|k| !k.contains("docs")));
    }

    #[test]
    fn test_cjk_bigrams() {
        let kws = extract_keywords("中文内容分析。中文内容分析很重要。", 5);
        assert!(kws.contains(&"中文".to_string()));
        assert!(kws.contains(&"分析".to_string()));
        assert!(kws.iter().all(|k| !k.contains('很')));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("the and of 123", 5).is_empty());
    }
}
