//! Topic aggregation job and report.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::types::request::SummaryOptions;
use crate::types::response::SummaryData;

/// Social platform a downstream formatter will target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Twitter,
    LinkedIn,
    Facebook,
}

impl PlatformTag {
    pub const DEFAULTS: [PlatformTag; 3] = [
        PlatformTag::Twitter,
        PlatformTag::LinkedIn,
        PlatformTag::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::LinkedIn),
            "facebook" => Ok(Self::Facebook),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// A set of URLs sharing one topic label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub topic: String,
    pub urls: Vec<String>,

    #[serde(default)]
    pub platforms: Vec<PlatformTag>,

    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Applied to every URL in the job
    #[serde(default)]
    pub options: SummaryOptions,
}

fn default_max_workers() -> usize {
    5
}

impl BatchJob {
    pub fn new(
        topic: impl Into<String>,
        urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            topic: topic.into(),
            urls: urls.into_iter().map(Into::into).collect(),
            platforms: Vec::new(),
            max_workers: default_max_workers(),
            options: SummaryOptions::default(),
        }
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = PlatformTag>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Requested platforms, or the default trio when none were given.
    pub fn effective_platforms(&self) -> Vec<PlatformTag> {
        if self.platforms.is_empty() {
            PlatformTag::DEFAULTS.to_vec()
        } else {
            self.platforms.clone()
        }
    }
}

/// One URL that summarized successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    /// URL as given in the job (the data carries the post-redirect URL)
    pub source_url: String,
    pub word_count: usize,
    pub data: SummaryData,
}

impl SourceSummary {
    pub fn new(source_url: impl Into<String>, data: SummaryData) -> Self {
        Self {
            source_url: source_url.into(),
            word_count: data.word_count(),
            data,
        }
    }
}

/// One URL that failed, with the failing stage's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSource {
    pub url: String,
    pub error: String,
    pub error_code: ErrorCode,
}

/// Aggregated report of a batch run.
///
/// Every input URL lands in exactly one of `successful` / `failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub topic: String,
    pub platforms: Vec<PlatformTag>,
    pub total_sources: usize,
    pub successful: Vec<SourceSummary>,
    pub failed: Vec<FailedSource>,
    pub generated_at: DateTime<Utc>,
}

impl BatchResult {
    pub fn success_rate(&self) -> f64 {
        if self.total_sources == 0 {
            return 0.0;
        }
        self.successful.len() as f64 / self.total_sources as f64
    }

    pub fn is_complete(&self) -> bool {
        self.total_sources == self.successful.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parsing() {
        assert_eq!("Twitter".parse::<PlatformTag>().unwrap(), PlatformTag::Twitter);
        assert_eq!("x".parse::<PlatformTag>().unwrap(), PlatformTag::Twitter);
        assert_eq!("linkedin".parse::<PlatformTag>().unwrap(), PlatformTag::LinkedIn);
        assert!("myspace".parse::<PlatformTag>().is_err());
    }

    #[test]
    fn test_job_defaults() {
        let job: BatchJob =
            serde_json::from_str(r#"{"topic": "rust", "urls": ["https://a.example"]}"#).unwrap();
        assert_eq!(job.max_workers, 5);
        assert_eq!(job.effective_platforms(), PlatformTag::DEFAULTS.to_vec());
        assert_eq!(job.options, SummaryOptions::default());
    }

    #[test]
    fn test_success_rate_of_empty_batch() {
        let result = BatchResult {
            batch_id: Uuid::new_v4(),
            topic: "empty".into(),
            platforms: vec![],
            total_sources: 0,
            successful: vec![],
            failed: vec![],
            generated_at: Utc::now(),
        };
        assert_eq!(result.success_rate(), 0.0);
        assert!(result.is_complete());
    }
}
