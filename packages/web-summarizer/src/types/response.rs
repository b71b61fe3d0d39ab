//! The response contract returned to callers.
//!
//! On the wire a response is always
//! `{"success", "data", "error", "error_code"}` with exactly one of
//! `data`/`error` non-null. In Rust that invariant is a two-variant enum,
//! so a response holding both (or neither) cannot be constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErrorCode;
use crate::types::summary::{Category, StructuredSummary};

pub const EXTRACTION_METHOD: &str = "readability";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub timestamp: DateTime<Utc>,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
    pub model_used: String,
    pub content_length: usize,
    pub extraction_method: String,
}

/// Payload of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryData {
    /// Final URL after redirects
    pub url: String,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub citations: Option<Vec<String>>,
    pub category: Category,
    pub metadata: ResponseMetadata,
}

impl SummaryData {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        summary: StructuredSummary,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            summary: summary.summary,
            key_points: summary.key_points,
            citations: summary.citations,
            category: summary.category,
            metadata,
        }
    }

    pub fn word_count(&self) -> usize {
        self.summary.split_whitespace().count()
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResponse {
    Success(SummaryData),
    Failure { error: String, error_code: ErrorCode },
}

impl SummaryResponse {
    pub fn failure(error: impl Into<String>, error_code: ErrorCode) -> Self {
        Self::Failure {
            error: error.into(),
            error_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&SummaryData> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error_code, .. } => Some(*error_code),
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    success: bool,
    data: Option<&'a SummaryData>,
    error: Option<&'a str>,
    error_code: Option<ErrorCode>,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<SummaryData>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<ErrorCode>,
}

impl Serialize for SummaryResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeRef {
            success: self.is_success(),
            data: self.data(),
            error: self.error(),
            error_code: self.error_code(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SummaryResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let envelope = Envelope::deserialize(deserializer)?;
        match (envelope.success, envelope.data, envelope.error) {
            (true, Some(data), None) => Ok(Self::Success(data)),
            (false, None, Some(error)) => Ok(Self::Failure {
                error,
                error_code: envelope.error_code.unwrap_or(ErrorCode::UnknownError),
            }),
            _ => Err(D::Error::custom(
                "exactly one of `data` (success) or `error` (failure) must be set",
            )),
        }
    }
}
