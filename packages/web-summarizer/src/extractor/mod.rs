//! Readability-style content extraction.
//!
//! `extract` is pure: the same HTML always yields the same result. The work is
//! split three ways:
//!
//! - `dom` walks the `scraper` tree, skips boilerplate and reduces each
//!   candidate container to a [`scoring::NodeRecord`]
//! - `scoring` ranks those records without looking at the DOM
//! - `text` collapses whitespace and truncates at a readable boundary

mod dom;
pub mod scoring;
mod text;

pub use self::text::{collapse_whitespace, truncate_at_boundary};

use scraper::Html;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::types::page::ExtractionResult;

/// Turns raw HTML into a title plus paragraph text.
#[derive(Debug, Clone)]
pub struct Extractor {
    min_length: usize,
    max_length: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_length: config.min_content_length,
            max_length: config.max_content_length,
        }
    }

    /// Extract the main readable content of `raw_html`.
    ///
    /// `base_url` is only used for diagnostics.
    pub fn extract(
        &self,
        raw_html: &str,
        base_url: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        if raw_html.trim().is_empty() {
            return Err(ExtractionError::EmptyContent);
        }

        let document = Html::parse_document(raw_html);
        let title = dom::title(&document);

        let candidates = dom::candidates(&document);
        let records: Vec<_> = candidates.iter().map(|c| c.record.clone()).collect();

        let root = match scoring::best_candidate(&records) {
            Some(index) => {
                let chosen = &candidates[index];
                debug!(
                    url = %base_url,
                    tag = %chosen.record.tag,
                    score = scoring::score(&chosen.record),
                    candidates = candidates.len(),
                    "Selected content root"
                );
                chosen.element
            }
            None => {
                debug!(url = %base_url, "No paragraph-bearing container, using <body>");
                dom::body(&document)
            }
        };

        let paragraphs = dom::TextCollector::collect(root).into_paragraphs();
        let text = paragraphs.join("\n\n");
        if text.is_empty() {
            return Err(ExtractionError::NoContent);
        }

        let length = text.chars().count();
        if length < self.min_length {
            return Err(ExtractionError::InsufficientContent {
                length,
                minimum: self.min_length,
            });
        }

        let (text, truncated) = truncate_at_boundary(&text, self.max_length);
        if truncated {
            debug!(
                url = %base_url,
                original = length,
                limit = self.max_length,
                "Truncated extracted text"
            );
        }

        Ok(ExtractionResult {
            title,
            length: text.chars().count(),
            text,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const PROSE: &str = "Rust gives systems programmers memory safety without a garbage collector. \
        The borrow checker validates references at compile time, which removes whole classes of bugs. \
        Ownership rules make data races impossible in safe code. Cargo handles builds, tests and \
        dependency resolution in one tool. The ecosystem has grown quickly across networking, \
        embedded targets and command line tooling, and adoption keeps rising.";

    fn article_page() -> String {
        format!(
            r#"<html><head><title>Why Rust</title></head><body>
                <nav><ul><li><a href="/">Home</a></li><li><a href="/about">About us</a></li></ul></nav>
                <header><p>Site header banner text</p></header>
                <aside><p>Subscribe to our newsletter for weekly deals</p></aside>
                <div class="ad-container"><p>Buy cheap widgets now</p></div>
                <article><p>{PROSE}</p><p>{PROSE}</p></article>
                <footer><p>Copyright footer notice</p></footer>
            </body></html>"#
        )
    }

    #[test]
    fn test_article_boilerplate_is_removed() {
        let extractor = Extractor::default();
        let result = extractor.extract(&article_page(), "https://example.com").unwrap();

        assert!(result.length >= 500);
        assert_eq!(result.title.as_deref(), Some("Why Rust"));
        for noise in ["Home", "About us", "Subscribe", "widgets", "Copyright", "banner"] {
            assert!(!result.text.contains(noise), "boilerplate leaked: {noise}");
        }
        assert!(result.text.contains("\n\n"));
        assert!(!result.truncated);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = Extractor::default();
        let html = article_page();
        let first = extractor.extract(&html, "https://example.com").unwrap();
        let second = extractor.extract(&html, "https://example.com").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_content_is_insufficient() {
        let html = "<html><body><article><p>Too short to matter.</p></article></body></html>";
        let err = Extractor::default().extract(html, "u").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientContent);
    }

    #[test]
    fn test_blank_html_is_empty_content() {
        let err = Extractor::default().extract("   \n ", "u").unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyContent);
    }

    #[test]
    fn test_only_boilerplate_fails_extraction() {
        let html = "<html><body><nav>Menu</nav><script>var a = 1;</script></body></html>";
        let err = Extractor::default().extract(html, "u").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ExtractionFailed);
    }

    #[test]
    fn test_scripts_and_styles_never_leak() {
        let html = format!(
            "<html><head><style>body {{ color: red; }}</style></head><body><main><p>{PROSE}</p><script>trackVisitor();</script></main></body></html>"
        );
        let result = Extractor::default().extract(&html, "u").unwrap();
        assert!(!result.text.contains("trackVisitor"));
        assert!(!result.text.contains("color: red"));
    }

    #[test]
    fn test_falls_back_to_body_text() {
        let html = format!("<html><body><span>{PROSE}</span></body></html>");
        let result = Extractor::default().extract(&html, "u").unwrap();
        assert!(result.text.starts_with("Rust gives systems programmers"));
        assert_eq!(result.title, None);
    }

    #[test]
    fn test_truncates_to_max_length() {
        let extractor = Extractor::new(&ExtractionConfig {
            min_content_length: 100,
            max_content_length: 200,
        });
        let result = extractor.extract(&article_page(), "u").unwrap();
        assert!(result.truncated);
        assert!(result.length <= 200);
        assert!(result.text.ends_with('.'));
    }
}
