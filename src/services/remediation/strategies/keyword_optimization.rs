//! Keyword optimization strategy.
//!
//! Target density window for the primary keyword is 1-3% of body words.
//! Keywords come from the title (stop-words out, min length 3, top 3).
//! Outside the window, the primary keyword is inserted into the first
//! paragraph if it is absent there; over-optimization is reported but not
//! automatically reduced.

use crate::domain::models::{ContentItem, ContentUpdate};
use crate::services::{html_edit, keywords};

pub const MIN_DENSITY: f64 = 1.0;
pub const MAX_DENSITY: f64 = 3.0;

pub fn transform(item: &ContentItem) -> super::TransformOutcome {
    let targets = keywords::extract_title_keywords(&item.title);
    let Some(primary) = targets.first() else {
        return super::TransformOutcome::unchanged(
            "no target keywords derivable from the title",
        );
    };

    let text = html_edit::plain_text(&item.content);
    let density = keywords::keyword_density(&text, primary);

    if (MIN_DENSITY..=MAX_DENSITY).contains(&density) {
        return super::TransformOutcome::unchanged(format!(
            "keyword \"{primary}\" density {density:.1}% within the \
             {MIN_DENSITY:.0}-{MAX_DENSITY:.0}% window"
        ));
    }

    let first_paragraph = html_edit::first_paragraph_text(&item.content).unwrap_or_default();
    if keywords::contains_keyword(&first_paragraph, primary) {
        return super::TransformOutcome::unchanged(format!(
            "keyword \"{primary}\" density {density:.1}% outside the window but already \
             present in the first paragraph; no automated adjustment"
        ));
    }

    let Some(edited) = html_edit::insert_into_first_paragraph(&item.content, primary) else {
        return super::TransformOutcome::unchanged(
            "no paragraph available for keyword insertion",
        );
    };

    super::TransformOutcome::mutated(
        ContentUpdate {
            content: Some(edited),
            ..Default::default()
        },
        format!(
            "inserted keyword \"{primary}\" into the first paragraph of \"{}\" \
             (density was {density:.1}%)",
            item.title
        ),
        Some(format!("density {density:.1}%")),
        Some(primary.clone()),
    )
}
