//! Meta description strategy.
//!
//! The remote platform exposes the meta description through the item
//! excerpt. Target window is 120-160 characters: inside the window is a
//! no-op; outside it, a fresh description is generated from the item body
//! and truncated with an ellipsis if it still exceeds 160.

use crate::domain::models::{ContentItem, ContentUpdate, Fix};
use crate::services::html_edit;

use super::{truncate_with_ellipsis, StrategyContext, StrategyError, TransformOutcome};
use crate::domain::ports::GenerationRequest;

pub const MIN_LEN: usize = 120;
pub const MAX_LEN: usize = 160;

/// Body text handed to the generator, capped so prompts stay small.
const BODY_SAMPLE_CHARS: usize = 800;

pub async fn transform(
    item: &ContentItem,
    fix: &Fix,
    ctx: &StrategyContext<'_>,
) -> Result<TransformOutcome, StrategyError> {
    let current = html_edit::plain_text(&item.excerpt);
    let len = current.chars().count();

    if (MIN_LEN..=MAX_LEN).contains(&len) {
        return Ok(TransformOutcome::unchanged(format!(
            "meta description already {len} chars, within the {MIN_LEN}-{MAX_LEN} window"
        )));
    }

    let body: String = html_edit::plain_text(&item.content)
        .chars()
        .take(BODY_SAMPLE_CHARS)
        .collect();

    let mut user_prompt = format!(
        "Write a meta description between {MIN_LEN} and {MAX_LEN} characters for this page.\n\
         Title: {}\nContent: {}",
        item.title, body
    );
    if let Some(hint) = &fix.before {
        user_prompt.push_str(&format!("\nThe current description is: {hint}"));
    }

    let request = GenerationRequest::new(
        "You are an SEO copywriter. Reply with the meta description text only, \
         no quotes, no preamble.",
        user_prompt,
    )
    .with_max_tokens(120)
    .with_temperature(0.7);

    let generated = ctx.generator.generate(request).await?;
    let description = truncate_with_ellipsis(generated.trim(), MAX_LEN);

    Ok(TransformOutcome::mutated(
        ContentUpdate {
            excerpt: Some(description.clone()),
            ..Default::default()
        },
        format!(
            "rewrote meta description for \"{}\" ({len} -> {} chars)",
            item.title,
            description.chars().count()
        ),
        Some(current),
        Some(description),
    ))
}
