//! Fix strategies, one per remediable issue type.
//!
//! Dispatch is an exhaustive match on `IssueType`, so a registered strategy
//! exists for every type the compiler lets the engine construct. Each
//! strategy is a transform from one content item to an optional partial
//! update; pushing the update and bookkeeping live in the pipeline.

pub mod alt_text;
pub mod content_quality;
pub mod headings;
pub mod keyword_optimization;
pub mod meta_description;
pub mod title_tag;

use thiserror::Error;

use crate::domain::models::{ContentItem, ContentUpdate, Fix, IssueType};
use crate::domain::ports::{GenerationError, TextGenerator};

/// Shared collaborators strategies may need.
pub struct StrategyContext<'a> {
    pub generator: &'a dyn TextGenerator,
}

/// Errors a transform can raise. These never abort a run; the pipeline
/// folds them into the optimistic-convergence policy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Outcome of running one transform against one content item.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// Whether a mutation should be pushed for this item.
    pub updated: bool,
    /// The partial update to push when `updated`.
    pub update: Option<ContentUpdate>,
    /// What happened (or why nothing did).
    pub description: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl TransformOutcome {
    /// The item is fine as-is for this strategy.
    pub fn unchanged(description: impl Into<String>) -> Self {
        Self {
            updated: false,
            update: None,
            description: description.into(),
            before: None,
            after: None,
        }
    }

    /// The item needs this update pushed.
    pub fn mutated(
        update: ContentUpdate,
        description: impl Into<String>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            updated: true,
            update: Some(update),
            description: description.into(),
            before,
            after,
        }
    }
}

/// Run the strategy registered for `issue_type` against one content item.
///
/// The match is exhaustive: every constructible issue type has a strategy.
pub async fn run_transform(
    issue_type: IssueType,
    item: &ContentItem,
    fix: &Fix,
    ctx: &StrategyContext<'_>,
) -> Result<TransformOutcome, StrategyError> {
    match issue_type {
        IssueType::MissingAltText => Ok(alt_text::transform(item)),
        IssueType::MissingMetaDescription => meta_description::transform(item, fix, ctx).await,
        IssueType::PoorTitleTag => title_tag::transform(item, ctx).await,
        IssueType::HeadingStructure | IssueType::MissingH1 => Ok(headings::transform(item)),
        IssueType::LowContentQuality => content_quality::transform(item, ctx).await,
        IssueType::KeywordOptimization => Ok(keyword_optimization::transform(item)),
    }
}

/// Truncate to `max` characters, ending with an ellipsis when truncated.
/// Operates on chars, never splitting a multi-byte sequence.
pub(crate) fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
