//! Content quality strategy.
//!
//! Gates on a computed quality score: items scoring 75 or above are left
//! alone; below the threshold the body is rewritten by the text generator
//! with the specific weak points listed in the prompt.

use crate::domain::models::{ContentItem, ContentUpdate};
use crate::domain::ports::GenerationRequest;
use crate::services::html_edit;

use super::{StrategyContext, StrategyError, TransformOutcome};

pub const QUALITY_THRESHOLD: f64 = 75.0;

/// Word count at which the length component maxes out.
const TARGET_WORDS: usize = 300;
/// Average sentence length above which readability starts losing points.
const MAX_AVG_SENTENCE_WORDS: f64 = 25.0;

/// Heuristic quality score in [0, 100].
///
/// Components: length (40), sentence readability (30), subheadings (15),
/// paragraph structure (15).
pub fn quality_score(content: &str) -> f64 {
    let text = html_edit::plain_text(content);
    let word_count = text.split_whitespace().count();

    #[allow(clippy::cast_precision_loss)]
    let length_points = ((word_count as f64 / TARGET_WORDS as f64) * 40.0).min(40.0);

    let sentences = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .count()
        .max(1);
    #[allow(clippy::cast_precision_loss)]
    let avg_sentence = word_count as f64 / sentences as f64;
    let readability_points = if avg_sentence <= MAX_AVG_SENTENCE_WORDS {
        30.0
    } else {
        (30.0 * MAX_AVG_SENTENCE_WORDS / avg_sentence).max(0.0)
    };

    let subheading_points = if html_edit::heading_outline(content)
        .iter()
        .any(|l| *l >= 2)
    {
        15.0
    } else {
        0.0
    };

    let paragraphs = content.matches("<p").count();
    #[allow(clippy::cast_precision_loss)]
    let paragraph_points = ((paragraphs as f64) * 5.0).min(15.0);

    length_points + readability_points + subheading_points + paragraph_points
}

/// Specific improvements for the rewrite prompt, derived from whichever
/// components scored low.
pub fn improvements(content: &str) -> Vec<String> {
    let text = html_edit::plain_text(content);
    let word_count = text.split_whitespace().count();
    let mut list = Vec::new();

    if word_count < TARGET_WORDS {
        list.push(format!(
            "expand the content from {word_count} toward at least {TARGET_WORDS} words"
        ));
    }
    let sentences = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .count()
        .max(1);
    #[allow(clippy::cast_precision_loss)]
    if word_count as f64 / sentences as f64 > MAX_AVG_SENTENCE_WORDS {
        list.push("shorten long sentences for readability".to_string());
    }
    if !html_edit::heading_outline(content).iter().any(|l| *l >= 2) {
        list.push("add descriptive subheadings (h2/h3)".to_string());
    }
    if content.matches("<p").count() < 3 {
        list.push("break the text into more paragraphs".to_string());
    }
    list
}

pub async fn transform(
    item: &ContentItem,
    ctx: &StrategyContext<'_>,
) -> Result<TransformOutcome, StrategyError> {
    let score = quality_score(&item.content);

    if score >= QUALITY_THRESHOLD {
        return Ok(TransformOutcome::unchanged(format!(
            "content quality score {score:.0} at or above threshold {QUALITY_THRESHOLD:.0}"
        )));
    }

    let fixes_needed = improvements(&item.content);
    let request = GenerationRequest::new(
        "You are an SEO content editor. Rewrite the provided HTML fragment, \
         keeping all factual claims and existing links. Reply with the \
         rewritten HTML only, no preamble and no code fences.",
        format!(
            "Rewrite this content, applying these improvements: {}.\n\
             Title: {}\nContent:\n{}",
            fixes_needed.join("; "),
            item.title,
            item.content
        ),
    )
    .with_max_tokens(2048)
    .with_temperature(0.6);

    let rewritten = ctx.generator.generate(request).await?;

    Ok(TransformOutcome::mutated(
        ContentUpdate {
            content: Some(rewritten.trim().to_string()),
            ..Default::default()
        },
        format!(
            "rewrote \"{}\" (quality score {score:.0}; applied: {})",
            item.title,
            fixes_needed.join(", ")
        ),
        Some(format!("quality score {score:.0}")),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_content() -> String {
        let sentence = "This paragraph talks about something specific and useful. ";
        format!(
            "<h2>Section</h2><p>{}</p><h3>Detail</h3><p>{}</p><p>{}</p>",
            sentence.repeat(25),
            sentence.repeat(25),
            sentence.repeat(10)
        )
    }

    #[test]
    fn rich_content_scores_above_threshold() {
        assert!(quality_score(&rich_content()) >= QUALITY_THRESHOLD);
    }

    #[test]
    fn thin_content_scores_below_threshold() {
        assert!(quality_score("<p>Too thin.</p>") < QUALITY_THRESHOLD);
    }

    #[test]
    fn improvements_name_the_weak_components() {
        let list = improvements("<p>Too thin.</p>");
        assert!(list.iter().any(|i| i.contains("expand")));
        assert!(list.iter().any(|i| i.contains("subheadings")));
        assert!(list.iter().any(|i| i.contains("paragraphs")));
    }
}
