//! Missing alt-text strategy.
//!
//! Scans the item body for `<img>` elements without a non-empty `alt`
//! attribute and derives fallback text from the filename. Inline `data:`
//! URIs are skipped.

use crate::domain::models::{ContentItem, ContentUpdate};
use crate::services::html_edit;

pub fn transform(item: &ContentItem) -> super::TransformOutcome {
    let (edited, edits) = html_edit::set_missing_alt(&item.content, html_edit::alt_text_from_filename);

    if edits.is_empty() {
        return super::TransformOutcome::unchanged("all images carry alt text");
    }

    let before = edits
        .iter()
        .map(|e| e.src.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let after = edits
        .iter()
        .map(|e| format!("{} => \"{}\"", e.src, e.alt))
        .collect::<Vec<_>>()
        .join(", ");

    super::TransformOutcome::mutated(
        ContentUpdate {
            content: Some(edited),
            ..Default::default()
        },
        format!("added alt text to {} image(s) in \"{}\"", edits.len(), item.title),
        Some(before),
        Some(after),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ContentCollection;

    fn item(content: &str) -> ContentItem {
        ContentItem {
            id: 1,
            title: "Post".to_string(),
            content: content.to_string(),
            excerpt: String::new(),
            link: None,
            collection: ContentCollection::Posts,
        }
    }

    #[test]
    fn adds_alt_for_missing() {
        let out = transform(&item(r#"<img src="/uploads/cat-photo.jpg">"#));
        assert!(out.updated);
        let update = out.update.unwrap();
        assert!(update.content.unwrap().contains(r#"alt="cat photo""#));
    }

    #[test]
    fn compliant_content_is_untouched() {
        let out = transform(&item(r#"<img src="/a.jpg" alt="present">"#));
        assert!(!out.updated);
        assert!(out.update.is_none());
    }
}
