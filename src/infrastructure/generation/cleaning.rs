//! Response cleaning for raw provider output.
//!
//! Models wrap answers in conversational preambles, code fences, and quote
//! characters. Every provider response passes through `clean_response`
//! before any strategy sees it.

/// Opening phrases models prepend before the actual answer.
const PREAMBLE_STARTERS: &[&str] = &[
    "sure,",
    "sure!",
    "sure thing",
    "certainly",
    "of course",
    "here's",
    "here is",
    "here are",
    "okay,",
    "absolutely",
];

/// Strip conversational preamble lines, code fences, and surrounding quotes.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // Drop a leading "Sure, here's ..." style line when more content follows.
    if let Some((first, rest)) = text.split_once('\n') {
        let lowered = first.trim().to_lowercase();
        if PREAMBLE_STARTERS.iter().any(|p| lowered.starts_with(p)) && !rest.trim().is_empty() {
            text = rest.trim().to_string();
        }
    }

    // Unwrap a code fence, tolerating a language tag on the opening fence.
    if text.starts_with("```") {
        let inner = text.trim_start_matches("```");
        let inner = inner
            .split_once('\n')
            .map_or(inner, |(_first_line, rest)| rest);
        text = inner.trim_end_matches("```").trim().to_string();
    }

    // Strip one layer of symmetric surrounding quotes.
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = text[1..text.len() - 1].trim().to_string();
            break;
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_conversational_preamble() {
        let raw = "Sure, here's the meta description you asked for:\nA concise description.";
        assert_eq!(clean_response(raw), "A concise description.");
    }

    #[test]
    fn unwraps_code_fences_with_language_tag() {
        let raw = "```html\n<p>Hello</p>\n```";
        assert_eq!(clean_response(raw), "<p>Hello</p>");
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(clean_response("\"A quoted answer\""), "A quoted answer");
    }

    #[test]
    fn plain_answers_pass_through() {
        assert_eq!(clean_response("Just the text."), "Just the text.");
    }

    #[test]
    fn keeps_single_line_answers_starting_like_preambles() {
        // No following content, so the line IS the answer.
        assert_eq!(clean_response("Here is everything"), "Here is everything");
    }
}
