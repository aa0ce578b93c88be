//! HTML fragment inspection and editing.
//!
//! Content bodies arrive as HTML fragments, not full documents. Inspection
//! parses the fragment (scraper); edits are span-local string replacements on
//! the original bytes, so untouched markup survives byte-for-byte and no
//! document wrapper (`<html>`, `<body>`) is ever introduced.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("static regex"));
static ALT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\balt\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("static regex"));
static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bsrc\s*=\s*["']?([^"'\s>]+)"#).expect("static regex"));
static H1_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1(\s[^>]*)?>(.*?)</h1\s*>").expect("static regex"));
static FIRST_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p(\s[^>]*)?>(.*?)</p\s*>").expect("static regex"));

/// One alt attribute insertion performed by [`set_missing_alt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltEdit {
    pub src: String,
    pub alt: String,
}

/// Result of heading normalization.
#[derive(Debug, Clone)]
pub struct HeadingEdit {
    pub html: String,
    pub changed: bool,
    pub description: String,
}

/// `src` attributes of `<img>` elements with no non-empty `alt`.
///
/// Inline `data:` URIs are skipped; they are decorative payloads, not
/// indexable images.
pub fn images_missing_alt(fragment: &str) -> Vec<String> {
    let doc = Html::parse_fragment(fragment);
    let selector = Selector::parse("img").expect("static selector");
    doc.select(&selector)
        .filter(|el| {
            el.value()
                .attr("alt")
                .map_or(true, |alt| alt.trim().is_empty())
        })
        .filter_map(|el| el.value().attr("src"))
        .filter(|src| !src.starts_with("data:"))
        .map(ToString::to_string)
        .collect()
}

/// Insert an `alt` attribute into every `<img>` lacking one, deriving the
/// text from the `src` via `derive`. Returns the edited fragment and the
/// list of edits made.
pub fn set_missing_alt<F>(fragment: &str, derive: F) -> (String, Vec<AltEdit>)
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(fragment.len());
    let mut edits = Vec::new();
    let mut cursor = 0;

    for m in IMG_TAG.find_iter(fragment) {
        let tag = m.as_str();
        out.push_str(&fragment[cursor..m.start()]);
        cursor = m.end();

        let has_alt = ALT_ATTR
            .captures(tag)
            .map(|c| !c[1].trim_matches(['"', '\'']).trim().is_empty())
            .unwrap_or(false);
        let src = SRC_ATTR.captures(tag).map(|c| c[1].to_string());

        match (has_alt, src) {
            (false, Some(src)) if !src.starts_with("data:") => {
                let alt = derive(&src);
                out.push_str(&insert_alt(tag, &alt));
                edits.push(AltEdit { src, alt });
            }
            _ => out.push_str(tag),
        }
    }
    out.push_str(&fragment[cursor..]);
    (out, edits)
}

/// Splice ` alt="..."` into an img tag, before `/>` or `>`. Self-closing
/// tags keep a space before the `/>`.
fn insert_alt(tag: &str, alt: &str) -> String {
    let escaped = alt.replace('"', "&quot;");
    if let Some(at) = tag.rfind("/>") {
        let head = tag[..at].trim_end();
        return format!("{head} alt=\"{escaped}\" />");
    }
    let at = tag.rfind('>').unwrap_or(tag.len());
    let (head, tail) = tag.split_at(at);
    format!("{} alt=\"{}\"{}", head.trim_end(), escaped, tail)
}

/// Derive fallback alt text from an image URL: last path segment, extension
/// stripped, `-`/`_` replaced with spaces, truncated to 100 chars.
pub fn alt_text_from_filename(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let file = path.rsplit('/').next().unwrap_or(path);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    let words = stem
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    words.chars().take(100).collect()
}

/// Number of `<h1>` elements in the fragment.
pub fn count_h1(fragment: &str) -> usize {
    let doc = Html::parse_fragment(fragment);
    let selector = Selector::parse("h1").expect("static selector");
    doc.select(&selector).count()
}

/// Heading levels (1-6) in document order.
pub fn heading_outline(fragment: &str) -> Vec<u8> {
    let doc = Html::parse_fragment(fragment);
    let selector = Selector::parse("h1, h2, h3, h4, h5, h6").expect("static selector");
    doc.select(&selector)
        .filter_map(|el| el.value().name().strip_prefix('h'))
        .filter_map(|n| n.parse::<u8>().ok())
        .collect()
}

/// Whether the outline skips a level going downward (e.g. h2 then h4).
pub fn has_skipped_levels(outline: &[u8]) -> bool {
    outline
        .windows(2)
        .any(|pair| pair[1] > pair[0] && pair[1] - pair[0] > 1)
}

/// Enforce the exactly-one-`<h1>` rule.
///
/// Zero h1s: prepend one built from `fallback_title`. More than one: the
/// first is kept, every later one is demoted to `<h2>`. All other markup is
/// preserved in place.
pub fn normalize_h1(fragment: &str, fallback_title: &str) -> HeadingEdit {
    let matches: Vec<_> = H1_BLOCK.find_iter(fragment).collect();

    if matches.is_empty() {
        let title = fallback_title.trim();
        if title.is_empty() {
            return HeadingEdit {
                html: fragment.to_string(),
                changed: false,
                description: "no h1 found and no title to derive one from".to_string(),
            };
        }
        return HeadingEdit {
            html: format!("<h1>{title}</h1>\n{fragment}"),
            changed: true,
            description: format!("added missing h1 \"{title}\""),
        };
    }

    if matches.len() == 1 {
        return HeadingEdit {
            html: fragment.to_string(),
            changed: false,
            description: "exactly one h1 present".to_string(),
        };
    }

    let mut out = String::with_capacity(fragment.len());
    let mut cursor = 0;
    for (index, m) in matches.iter().enumerate() {
        out.push_str(&fragment[cursor..m.start()]);
        if index == 0 {
            out.push_str(m.as_str());
        } else {
            out.push_str(&demote_h1(m.as_str()));
        }
        cursor = m.end();
    }
    out.push_str(&fragment[cursor..]);

    HeadingEdit {
        html: out,
        changed: true,
        description: format!("demoted {} extra h1 element(s) to h2", matches.len() - 1),
    }
}

/// Rewrite one `<h1 ...>...</h1>` block as `<h2 ...>...</h2>`.
fn demote_h1(block: &str) -> String {
    let opened = block.replacen("<h1", "<h2", 1);
    let close = opened.rfind("</h1").map_or(opened.len(), |i| i);
    let mut out = String::with_capacity(opened.len());
    out.push_str(&opened[..close]);
    out.push_str(&opened[close..].replacen("</h1", "</h2", 1));
    out
}

/// Inner text of the first `<p>` element, if any.
pub fn first_paragraph_text(fragment: &str) -> Option<String> {
    FIRST_PARAGRAPH
        .captures(fragment)
        .map(|c| strip_tags(&c[2]))
}

/// Prefix the first paragraph with a phrase naming `keyword`, lowering the
/// original opening character so the sentence still reads naturally.
/// Returns `None` when the fragment has no paragraph.
pub fn insert_into_first_paragraph(fragment: &str, keyword: &str) -> Option<String> {
    let m = FIRST_PARAGRAPH.captures(fragment)?;
    let full = m.get(0)?;
    let inner = m.get(2)?;

    let body = inner.as_str();
    let mut chars = body.chars();
    let rewritten = match chars.next() {
        Some(first) if first.is_uppercase() => {
            format!(
                "When it comes to {keyword}, {}{}",
                first.to_lowercase(),
                chars.as_str()
            )
        }
        _ => format!("When it comes to {keyword}, {body}"),
    };

    let mut out = String::with_capacity(fragment.len() + rewritten.len());
    out.push_str(&fragment[..inner.start()]);
    out.push_str(&rewritten);
    out.push_str(&fragment[inner.end()..]);
    debug_assert!(full.range().contains(&inner.start()));
    Some(out)
}

/// Visible text of the fragment with collapsed whitespace.
pub fn plain_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    doc.root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_tags(html: &str) -> String {
    let doc = Html::parse_fragment(html);
    doc.root_element().text().collect::<Vec<_>>().join("")
}
