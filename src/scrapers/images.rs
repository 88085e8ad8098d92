//! `<img>` extraction and URL normalization for the front page.
//!
//! # URL forms
//!
//! | `src` | Result |
//! |-------|--------|
//! | `//cdn.example.com/a.jpg` | `https://cdn.example.com/a.jpg` |
//! | `/static/a.jpg` | page URL without trailing `/`, then the path |
//! | anything else | unchanged (assumed absolute) |
//!
//! Only sources ending in `.jpg` (case-insensitive) are candidates; `.jpeg`,
//! query strings after the extension and bare relative paths are not handled.

use crate::models::ImageTag;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("`img` is a valid selector"));

/// Collect every `<img>` element in document order.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract_image_tags(html: &str) -> Vec<ImageTag> {
    let document = Html::parse_document(html);
    let tags: Vec<ImageTag> = document
        .select(&IMG_SELECTOR)
        .map(|element| ImageTag {
            src: element.value().attr("src").map(str::to_string),
        })
        .collect();

    debug!(count = tags.len(), "Extracted img tags");
    tags
}

/// True if the raw `src` value names a JPEG by extension.
pub fn is_jpeg_src(src: &str) -> bool {
    src.to_lowercase().ends_with(".jpg")
}

/// Turn a raw `src` into an absolute URL relative to `base_url`.
pub fn normalize_image_url(src: &str, base_url: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{}{src}", base_url.trim_end_matches('/'))
    } else {
        src.to_string()
    }
}

/// The absolute URL to download for `tag`, or `None` if the tag is not a candidate.
pub fn candidate_url(tag: &ImageTag, base_url: &str) -> Option<String> {
    let src = tag.src.as_deref()?;
    if !is_jpeg_src(src) {
        return None;
    }
    Some(normalize_image_url(src, base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://dhankesari.org/";

    fn tag(src: &str) -> ImageTag {
        ImageTag {
            src: Some(src.to_string()),
        }
    }

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize_image_url("//cdn.example.com/a.jpg", BASE),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_normalize_rooted_path() {
        assert_eq!(
            normalize_image_url("/static/a.jpg", BASE),
            "https://dhankesari.org/static/a.jpg"
        );
        assert_eq!(
            normalize_image_url("/static/a.jpg", "https://dhankesari.org"),
            "https://dhankesari.org/static/a.jpg"
        );
    }

    #[test]
    fn test_normalize_absolute_unchanged() {
        assert_eq!(
            normalize_image_url("https://other.com/a.jpg", BASE),
            "https://other.com/a.jpg"
        );
        // Bare relative paths are passed through untouched
        assert_eq!(normalize_image_url("images/a.jpg", BASE), "images/a.jpg");
    }

    #[test]
    fn test_is_jpeg_src() {
        assert!(is_jpeg_src("a.jpg"));
        assert!(is_jpeg_src("/PHOTOS/A.JPG"));
        assert!(!is_jpeg_src("a.png"));
        assert!(!is_jpeg_src("a.svg"));
        assert!(!is_jpeg_src("a.jpeg"));
        assert!(!is_jpeg_src("a.jpg?w=200"));
    }

    #[test]
    fn test_candidate_url_filters() {
        assert_eq!(candidate_url(&ImageTag { src: None }, BASE), None);
        assert_eq!(candidate_url(&tag("/logo.png"), BASE), None);
        assert_eq!(
            candidate_url(&tag("/news/1.jpg"), BASE).as_deref(),
            Some("https://dhankesari.org/news/1.jpg")
        );
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let html = r#"
            <html><body>
              <img src="/a.jpg">
              <div><p><img src="//cdn.example.com/b.png"></p></div>
              <img alt="no source">
              <img src="https://other.com/c.jpg"/>
            </body></html>
        "#;

        let tags = extract_image_tags(html);
        let srcs: Vec<Option<&str>> = tags.iter().map(|t| t.src.as_deref()).collect();
        assert_eq!(
            srcs,
            vec![
                Some("/a.jpg"),
                Some("//cdn.example.com/b.png"),
                None,
                Some("https://other.com/c.jpg"),
            ]
        );
    }

    #[test]
    fn test_extract_tolerates_malformed_markup() {
        let html = r#"<div><img src="/one.jpg"><p>unclosed <b>tags <img src='/two.jpg' <span>"#;
        let tags = extract_image_tags(html);
        assert!(!tags.is_empty());
        assert_eq!(tags[0].src.as_deref(), Some("/one.jpg"));
    }

    #[test]
    fn test_extract_empty_page() {
        assert!(extract_image_tags("").is_empty());
    }
}
