//! Intermediate stage outputs: fetched bytes and extracted text.

/// Raw page as returned by a fetcher. Consumed by the extractor, then dropped.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL after redirects
    pub final_url: String,

    pub status_code: u16,

    /// Body decoded as text
    pub raw_body: String,

    /// Lowercased `Content-Type`, empty when absent
    pub content_type: String,
}

impl FetchResult {
    pub fn html(final_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            status_code: 200,
            raw_body: body.into(),
            content_type: "text/html; charset=utf-8".to_string(),
        }
    }

    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html") || self.content_type.contains("application/xhtml")
    }

    pub fn body_bytes(&self) -> usize {
        self.raw_body.len()
    }
}

/// Readable text pulled out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: Option<String>,

    /// Paragraphs separated by a single blank line
    pub text: String,

    /// Character count of `text`
    pub length: usize,

    /// Whether `text` was cut to the configured maximum
    pub truncated: bool,
}
