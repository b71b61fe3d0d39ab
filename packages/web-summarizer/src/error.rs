//! Typed errors for the summarization pipeline.
//!
//! Every stage has its own `thiserror` enum. Each maps to exactly one
//! [`ErrorCode`], which is what callers branch on. The pipeline forwards a
//! stage's code unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable failure classification carried in every failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidUrl,
    InvalidOptions,
    NotFound,
    Forbidden,
    ServerError,
    Timeout,
    RequestFailed,
    EmptyContent,
    ExtractionFailed,
    InsufficientContent,
    TextTooShort,
    AiTimeout,
    AiApiError,
    SummarizationFailed,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidOptions => "INVALID_OPTIONS",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::ServerError => "SERVER_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::RequestFailed => "REQUEST_FAILED",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::InsufficientContent => "INSUFFICIENT_CONTENT",
            Self::TextTooShort => "TEXT_TOO_SHORT",
            Self::AiTimeout => "AI_TIMEOUT",
            Self::AiApiError => "AI_API_ERROR",
            Self::SummarizationFailed => "SUMMARIZATION_FAILED",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while retrieving a page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Input is not an absolute http(s) URL
    #[error("invalid URL format: {url} ({reason})")]
    InvalidUrl { url: String, reason: String },

    #[error("page not found (404): {url}")]
    NotFound { url: String },

    #[error("access forbidden (403): {url}")]
    Forbidden { url: String },

    #[error("server error ({status}): {url}")]
    ServerError { url: String, status: u16 },

    /// Any other non-2xx status
    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("request timeout after {timeout_secs} seconds: {url}")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("too many redirects (limit {limit}): {url}")]
    TooManyRedirects { url: String, limit: usize },

    /// DNS, connect, TLS or body read failure
    #[error("failed to fetch {url}: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl { .. } => ErrorCode::InvalidUrl,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::ServerError { .. } => ErrorCode::ServerError,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Status { .. } | Self::TooManyRedirects { .. } | Self::Request { .. } => {
                ErrorCode::RequestFailed
            }
        }
    }

    /// Classify a non-2xx status.
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        match status {
            404 => Self::NotFound { url },
            403 => Self::Forbidden { url },
            500..=599 => Self::ServerError { url, status },
            _ => Self::Status { url, status },
        }
    }
}

/// Errors raised while turning HTML into readable text.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("empty HTML content provided")]
    EmptyContent,

    /// No content block survived boilerplate removal
    #[error("no readable content block found")]
    NoContent,

    #[error("insufficient content extracted ({length} chars, minimum {minimum})")]
    InsufficientContent { length: usize, minimum: usize },
}

impl ExtractionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyContent => ErrorCode::EmptyContent,
            Self::NoContent => ErrorCode::ExtractionFailed,
            Self::InsufficientContent { .. } => ErrorCode::InsufficientContent,
        }
    }
}

/// A way in which generator output failed the JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("response is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `summary` is empty")]
    EmptySummary,

    #[error("field `key_points` contains no non-empty strings")]
    NoKeyPoints,
}

/// Errors raised by the AI-backed summarization stage.
#[derive(Debug, Clone, Error)]
pub enum SummarizationError {
    #[error("text is too short to summarize ({length} chars, minimum {minimum})")]
    TextTooShort { length: usize, minimum: usize },

    #[error("AI request timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("AI API error: {0}")]
    Api(String),

    #[error("AI response failed validation after {attempts} attempts: {violation}")]
    InvalidOutput {
        violation: SchemaViolation,
        attempts: u32,
    },
}

impl SummarizationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TextTooShort { .. } => ErrorCode::TextTooShort,
            Self::Timeout { .. } => ErrorCode::AiTimeout,
            Self::Api(_) => ErrorCode::AiApiError,
            Self::InvalidOutput { .. } => ErrorCode::SummarizationFailed,
        }
    }
}

/// Failure of a single pipeline run, tagged with the stage that produced it.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Summarization(#[from] SummarizationError),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidOptions(_) => ErrorCode::InvalidOptions,
            Self::Fetch(e) => e.code(),
            Self::Extraction(e) => e.code(),
            Self::Summarization(e) => e.code(),
            Self::Unknown(_) => ErrorCode::UnknownError,
        }
    }
}

/// Errors building components from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
