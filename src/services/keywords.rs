//! Keyword extraction and density measurement.
//!
//! Target keywords come from the content title: stop-words removed, short
//! tokens dropped, first three kept in title order.

/// Common English stop-words excluded from keyword extraction.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "his", "has", "how", "its", "may", "new", "now", "old", "see", "two", "way",
    "who", "did", "get", "use", "with", "this", "that", "from", "they", "will", "what", "when",
    "your", "about", "which", "their", "there", "these", "those", "have", "more", "been", "were",
    "into", "than", "them", "then", "some", "such", "only", "other", "over", "very", "just",
    "most", "also", "after", "before", "between", "because", "should", "could", "would", "here",
];

/// Minimum token length for a keyword candidate.
const MIN_KEYWORD_LEN: usize = 3;

/// Keywords to extract per title.
const TOP_KEYWORDS: usize = 3;

/// Extract up to three target keywords from a title, in title order,
/// deduplicated, lowercased, stop-words and tokens shorter than three
/// characters excluded.
pub fn extract_title_keywords(title: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for token in title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let word = token.to_lowercase();
        if word.chars().count() < MIN_KEYWORD_LEN || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if !seen.contains(&word) {
            seen.push(word);
        }
        if seen.len() == TOP_KEYWORDS {
            break;
        }
    }
    seen
}

/// Occurrences of `keyword` per 100 words of `text`, case-insensitive.
/// Returns 0.0 for empty text.
pub fn keyword_density(text: &str, keyword: &str) -> f64 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let needle = keyword.to_lowercase();
    let hits = words.iter().filter(|w| **w == needle).count();
    #[allow(clippy::cast_precision_loss)]
    {
        (hits as f64 / words.len() as f64) * 100.0
    }
}

/// Whether `text` contains `keyword` anywhere, case-insensitive.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    text.to_lowercase().contains(&keyword.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_top_three_in_order() {
        let kws = extract_title_keywords("The Complete Guide to Rust Memory Safety Patterns");
        assert_eq!(kws, vec!["complete", "guide", "rust"]);
    }

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let kws = extract_title_keywords("How to Be an SEO Pro");
        assert_eq!(kws, vec!["seo", "pro"]);
    }

    #[test]
    fn dedupes_repeated_words() {
        let kws = extract_title_keywords("Rust, Rust and More Rust Tips");
        assert_eq!(kws, vec!["rust", "tips"]);
    }

    #[test]
    fn density_counts_whole_words() {
        let text = "rust is great and rust is fast among rusty things";
        let density = keyword_density(text, "rust");
        assert!((density - 20.0).abs() < 1e-9); // 2 of 10 words
    }

    #[test]
    fn density_of_empty_text_is_zero() {
        assert_eq!(keyword_density("", "rust"), 0.0);
    }
}
