//! Title tag strategy.
//!
//! Target window is 30-60 characters: inside the window is a no-op;
//! outside it, a new title is generated from the item body and truncated
//! with an ellipsis if it still exceeds 60.

use crate::domain::models::{ContentItem, ContentUpdate};
use crate::domain::ports::GenerationRequest;
use crate::services::html_edit;

use super::{truncate_with_ellipsis, StrategyContext, StrategyError, TransformOutcome};

pub const MIN_LEN: usize = 30;
pub const MAX_LEN: usize = 60;

const BODY_SAMPLE_CHARS: usize = 600;

pub async fn transform(
    item: &ContentItem,
    ctx: &StrategyContext<'_>,
) -> Result<TransformOutcome, StrategyError> {
    let current = item.title.trim().to_string();
    let len = current.chars().count();

    if (MIN_LEN..=MAX_LEN).contains(&len) {
        return Ok(TransformOutcome::unchanged(format!(
            "title already {len} chars, within the {MIN_LEN}-{MAX_LEN} window"
        )));
    }

    let body: String = html_edit::plain_text(&item.content)
        .chars()
        .take(BODY_SAMPLE_CHARS)
        .collect();

    let request = GenerationRequest::new(
        "You are an SEO copywriter. Reply with the page title only, \
         no quotes, no preamble.",
        format!(
            "Write a page title between {MIN_LEN} and {MAX_LEN} characters.\n\
             Current title: {current}\nContent: {body}"
        ),
    )
    .with_max_tokens(60)
    .with_temperature(0.7);

    let generated = ctx.generator.generate(request).await?;
    let title = truncate_with_ellipsis(generated.trim(), MAX_LEN);

    Ok(TransformOutcome::mutated(
        ContentUpdate {
            title: Some(title.clone()),
            ..Default::default()
        },
        format!("rewrote title ({len} -> {} chars)", title.chars().count()),
        Some(current),
        Some(title),
    ))
}
