//! Inbound request types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Per-request knobs for the summarization stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Upper bound communicated to the generator (soft-validated, never truncated).
    pub max_summary_sentences: u32,

    /// Requested number of key points.
    pub num_key_points: u32,

    /// Ask the generator for verbatim quotes from the text.
    pub include_citations: bool,

    /// Generator model identifier.
    pub model: String,

    /// Hard ceiling for the summarization call, retry included.
    pub timeout_seconds: u64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_summary_sentences: 4,
            num_key_points: 5,
            include_citations: false,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 15,
        }
    }
}

impl SummaryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_key_points(mut self, count: u32) -> Self {
        self.num_key_points = count;
        self
    }

    pub fn with_max_sentences(mut self, count: u32) -> Self {
        self.max_summary_sentences = count;
        self
    }

    pub fn with_citations(mut self, include: bool) -> Self {
        self.include_citations = include;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=10).contains(&self.max_summary_sentences) {
            return Err(format!(
                "max_summary_sentences must be between 1 and 10, got {}",
                self.max_summary_sentences
            ));
        }
        if !(1..=10).contains(&self.num_key_points) {
            return Err(format!(
                "num_key_points must be between 1 and 10, got {}",
                self.num_key_points
            ));
        }
        if !(1..=60).contains(&self.timeout_seconds) {
            return Err(format!(
                "timeout_seconds must be between 1 and 60, got {}",
                self.timeout_seconds
            ));
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        Ok(())
    }
}

/// A single URL to summarize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub url: String,

    #[serde(default)]
    pub options: SummaryOptions,
}

impl SummaryRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: SummaryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }
}
