//! Heading structure strategy (also covers missing-h1 issues).
//!
//! Exactly one `<h1>` is correct. Zero: prepend one derived from the item
//! title. More than one: demote every h1 after the first to `<h2>`.
//! Skipped hierarchy levels (e.g. h2 followed directly by h4) are reported
//! in the description; only the h1 rules actually mutate content.

use crate::domain::models::{ContentItem, ContentUpdate};
use crate::services::html_edit;

pub fn transform(item: &ContentItem) -> super::TransformOutcome {
    let edit = html_edit::normalize_h1(&item.content, &item.title);
    let outline = html_edit::heading_outline(&item.content);
    let skipped = html_edit::has_skipped_levels(&outline);

    if !edit.changed {
        let description = if skipped {
            format!(
                "{}; hierarchy skips levels (outline: {})",
                edit.description,
                outline_string(&outline)
            )
        } else {
            edit.description
        };
        return super::TransformOutcome::unchanged(description);
    }

    let mut description = format!("{} in \"{}\"", edit.description, item.title);
    if skipped {
        description.push_str(&format!(
            "; hierarchy still skips levels (outline: {})",
            outline_string(&outline)
        ));
    }

    super::TransformOutcome::mutated(
        ContentUpdate {
            content: Some(edit.html),
            ..Default::default()
        },
        description,
        Some(outline_string(&outline)),
        None,
    )
}

fn outline_string(outline: &[u8]) -> String {
    outline
        .iter()
        .map(|l| format!("h{l}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ContentCollection;

    fn item(title: &str, content: &str) -> ContentItem {
        ContentItem {
            id: 3,
            title: title.to_string(),
            content: content.to_string(),
            excerpt: String::new(),
            link: None,
            collection: ContentCollection::Posts,
        }
    }

    #[test]
    fn demotes_duplicate_h1() {
        let out = transform(&item("T", "<h1>A</h1><p>x</p><h1>B</h1>"));
        assert!(out.updated);
        assert_eq!(
            out.update.unwrap().content.unwrap(),
            "<h1>A</h1><p>x</p><h2>B</h2>"
        );
    }

    #[test]
    fn prepends_h1_from_title() {
        let out = transform(&item("My Page", "<p>x</p>"));
        assert!(out.updated);
        assert!(out
            .update
            .unwrap()
            .content
            .unwrap()
            .starts_with("<h1>My Page</h1>"));
    }

    #[test]
    fn single_h1_with_skipped_levels_is_reported_not_mutated() {
        let out = transform(&item("T", "<h1>A</h1><h2>B</h2><h4>C</h4>"));
        assert!(!out.updated);
        assert!(out.description.contains("skips levels"));
    }
}
