//! Line-oriented markdown scanner
//!
//! Recognizes ATX and setext headings, fenced code, list items, block
//! quotes, thematic breaks and paragraphs, then extracts inline images and
//! links and renders a lightweight HTML view.

use super::{ImageRef, LinkRef};
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Default)]
pub(super) struct Outline {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub images: Vec<ImageRef>,
    pub links: Vec<LinkRef>,
    pub plain_text: String,
    pub html: String,
}

#[derive(Debug)]
enum Block {
    Heading(usize, String),
    Paragraph(String),
    ListItem { ordered: bool, text: String },
    Quote(String),
    Code(String),
    Rule,
}

struct Patterns {
    atx_heading: Regex,
    list_item: Regex,
    quote: Regex,
    image: Regex,
    link: Regex,
    autolink: Regex,
    html_img: Regex,
    html_src: Regex,
    html_alt: Regex,
    html_anchor: Regex,
    html_tag: Regex,
    code_span: Regex,
    strong: Regex,
    emphasis: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        atx_heading: Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("valid regex"),
        list_item: Regex::new(r"^\s*(?:([-*+])|\d+[.)])\s+(.*)$").expect("valid regex"),
        quote: Regex::new(r"^ {0,3}>\s?(.*)$").expect("valid regex"),
        image: Regex::new(r#"!\[([^\]]*)\]\(\s*<?([^\s)>]*)>?(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#)
            .expect("valid regex"),
        link: Regex::new(r#"\[([^\]]*)\]\(\s*<?([^\s)>]*)>?(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#)
            .expect("valid regex"),
        autolink: Regex::new(r"<((?:https?|ftp)://[^\s>]+)>").expect("valid regex"),
        html_img: Regex::new(r"(?i)<img\b[^>]*>").expect("valid regex"),
        html_src: Regex::new(r#"(?i)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex"),
        html_alt: Regex::new(r#"(?i)\balt\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex"),
        html_anchor: Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>(.*?)</a>"#)
            .expect("valid regex"),
        html_tag: Regex::new(r"(?s)<[^>]+>").expect("valid regex"),
        code_span: Regex::new(r"`([^`]*)`").expect("valid regex"),
        strong: Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").expect("valid regex"),
        emphasis: Regex::new(r"\*([^*\s][^*]*)\*").expect("valid regex"),
    })
}

/// Scan a markdown body into headings, references, plain text and HTML
pub(super) fn scan(body: &str) -> Outline {
    let blocks = split_blocks(body);
    let mut outline = Outline::default();
    let mut plain: Vec<String> = Vec::new();
    let mut open_list: Option<bool> = None;

    for block in &blocks {
        let list_kind = match block {
            Block::ListItem { ordered, .. } => Some(*ordered),
            _ => None,
        };
        if open_list != list_kind {
            if let Some(ordered) = open_list {
                outline.html.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            if let Some(ordered) = list_kind {
                outline.html.push_str(if ordered { "<ol>\n" } else { "<ul>\n" });
            }
            open_list = list_kind;
        }

        match block {
            Block::Heading(level, text) => {
                collect_refs(text, &mut outline.images, &mut outline.links);
                let clean = inline_plain(text);
                match level {
                    1 => outline.h1.push(clean.clone()),
                    2 => outline.h2.push(clean.clone()),
                    _ => {}
                }
                outline
                    .html
                    .push_str(&format!("<h{level}>{}</h{level}>\n", inline_html(text)));
                plain.push(clean);
            }
            Block::Paragraph(text) => {
                collect_refs(text, &mut outline.images, &mut outline.links);
                outline.html.push_str(&format!("<p>{}</p>\n", inline_html(text)));
                plain.push(inline_plain(text));
            }
            Block::ListItem { text, .. } => {
                collect_refs(text, &mut outline.images, &mut outline.links);
                outline.html.push_str(&format!("<li>{}</li>\n", inline_html(text)));
                plain.push(inline_plain(text));
            }
            Block::Quote(text) => {
                collect_refs(text, &mut outline.images, &mut outline.links);
                outline.html.push_str(&format!(
                    "<blockquote>\n<p>{}</p>\n</blockquote>\n",
                    inline_html(text)
                ));
                plain.push(inline_plain(text));
            }
            Block::Code(code) => {
                outline
                    .html
                    .push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(code)));
            }
            Block::Rule => outline.html.push_str("<hr />\n"),
        }
    }
    if let Some(ordered) = open_list {
        outline.html.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    // The html tag stripper can leave stray fragments; drop empty lines
    outline.plain_text = plain
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    outline
}

fn split_blocks(body: &str) -> Vec<Block> {
    let p = patterns();
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut quote: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let mut code: Vec<&str> = Vec::new();

    fn flush(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>, quote: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join("\n")));
            paragraph.clear();
        }
        if !quote.is_empty() {
            blocks.push(Block::Quote(quote.join("\n")));
            quote.clear();
        }
    }

    for line in body.lines() {
        if let Some((marker, len)) = fence {
            if closes_fence(line, marker, len) {
                blocks.push(Block::Code(code.join("\n")));
                code.clear();
                fence = None;
            } else {
                code.push(line);
            }
            continue;
        }

        if let Some(open) = opens_fence(line) {
            flush(&mut blocks, &mut paragraph, &mut quote);
            fence = Some(open);
            continue;
        }

        if line.trim().is_empty() {
            flush(&mut blocks, &mut paragraph, &mut quote);
            continue;
        }

        if let Some(caps) = p.atx_heading.captures(line) {
            flush(&mut blocks, &mut paragraph, &mut quote);
            let level = caps[1].len();
            let text = strip_closing_hashes(caps.get(2).map_or("", |m| m.as_str()));
            blocks.push(Block::Heading(level, text.to_string()));
            continue;
        }

        if let Some(level) = setext_level(line) {
            if let Some(last) = paragraph.pop() {
                flush(&mut blocks, &mut paragraph, &mut quote);
                blocks.push(Block::Heading(level, last.to_string()));
                continue;
            }
        }

        if is_thematic_break(line) {
            flush(&mut blocks, &mut paragraph, &mut quote);
            blocks.push(Block::Rule);
            continue;
        }

        if let Some(caps) = p.quote.captures(line) {
            if !paragraph.is_empty() {
                flush(&mut blocks, &mut paragraph, &mut quote);
            }
            quote.push(caps.get(1).map_or("", |m| m.as_str()).trim());
            continue;
        }

        if let Some(caps) = p.list_item.captures(line) {
            flush(&mut blocks, &mut paragraph, &mut quote);
            blocks.push(Block::ListItem {
                ordered: caps.get(1).is_none(),
                text: caps[2].trim().to_string(),
            });
            continue;
        }

        if !quote.is_empty() {
            // Lazy continuation of a block quote
            quote.push(line.trim());
            continue;
        }

        paragraph.push(line.trim());
    }

    if fence.is_some() {
        blocks.push(Block::Code(code.join("\n")));
    }
    flush(&mut blocks, &mut paragraph, &mut quote);
    blocks
}

fn opens_fence(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

fn closes_fence(line: &str, marker: char, len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.chars().take_while(|c| *c == marker).count() >= len
        && trimmed.chars().all(|c| c == marker)
}

fn strip_closing_hashes(text: &str) -> &str {
    let text = text.trim_end();
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() || without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

/// `===` underlines make an H1, `---` an H2 (only after a paragraph line)
fn setext_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if trimmed.is_empty() || line.len() - line.trim_start().len() > 3 {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_thematic_break(line: &str) -> bool {
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|c| *c == compact[0])
}

fn collect_refs(text: &str, images: &mut Vec<ImageRef>, links: &mut Vec<LinkRef>) {
    let p = patterns();
    let without_code = p.code_span.replace_all(text, "");

    for caps in p.image.captures_iter(&without_code) {
        images.push(ImageRef {
            src: caps[2].to_string(),
            alt: caps[1].trim().to_string(),
        });
    }
    for tag in p.html_img.find_iter(&without_code) {
        let attr = |re: &Regex| {
            re.captures(tag.as_str())
                .and_then(|c| quoted(&c, 1))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        images.push(ImageRef {
            src: attr(&p.html_src),
            alt: attr(&p.html_alt),
        });
    }

    // Replace images by their alt text so `[![alt](img)](href)` still yields a link
    let without_images = p.image.replace_all(&without_code, "$1");
    for caps in p.link.captures_iter(&without_images) {
        links.push(LinkRef {
            href: caps[2].to_string(),
            text: inline_plain(&caps[1]),
        });
    }
    for caps in p.html_anchor.captures_iter(&without_images) {
        links.push(LinkRef {
            href: quoted(&caps, 1).unwrap_or_default().to_string(),
            text: inline_plain(&caps[3]),
        });
    }
    for caps in p.autolink.captures_iter(&without_images) {
        links.push(LinkRef {
            href: caps[1].to_string(),
            text: caps[1].to_string(),
        });
    }
}

/// Inline markdown reduced to readable text
fn inline_plain(text: &str) -> String {
    let p = patterns();
    let t = p.code_span.replace_all(text, "$1");
    let t = p.image.replace_all(&t, "$1");
    let t = p.link.replace_all(&t, "$1");
    let t = p.autolink.replace_all(&t, "$1");
    let t = p.html_tag.replace_all(&t, " ");
    let t = p.strong.replace_all(&t, "$1$2");
    let t = p.emphasis.replace_all(&t, "$1");
    t.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inline markdown rendered to HTML. Raw HTML passes through untouched.
/// Value of a `"…"|'…'` alternation whose first group is `group`
fn quoted<'t>(caps: &Captures<'t>, group: usize) -> Option<&'t str> {
    caps.get(group)
        .or_else(|| caps.get(group + 1))
        .map(|m| m.as_str())
}

fn inline_html(text: &str) -> String {
    let p = patterns();
    let mut out = String::new();
    let mut last = 0;

    for caps in p.code_span.captures_iter(text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&render_spans(&text[last..whole.start]));
        out.push_str(&format!("<code>{}</code>", escape_html(&caps[1])));
        last = whole.end;
    }
    out.push_str(&render_spans(&text[last..]));
    out.replace('\n', " ")
}

fn render_spans(text: &str) -> String {
    let p = patterns();
    let t = p.image.replace_all(text, |caps: &Captures| {
        format!(
            "<img src=\"{}\" alt=\"{}\" />",
            escape_html(&caps[2]),
            escape_html(&caps[1])
        )
    });
    let t = p.link.replace_all(&t, |caps: &Captures| {
        format!("<a href=\"{}\">{}</a>", escape_html(&caps[2]), &caps[1])
    });
    let t = p.autolink.replace_all(&t, |caps: &Captures| {
        format!("<a href=\"{0}\">{0}</a>", escape_html(&caps[1]))
    });
    let t = p.strong.replace_all(&t, "<strong>$1$2</strong>");
    let t = p.emphasis.replace_all(&t, "<em>$1</em>");
    t.into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
