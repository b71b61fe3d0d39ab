//! Web page summarizer
//!
//! Fetches a URL, pulls the readable article text out of the HTML and asks an
//! LLM for a validated structured summary: prose, key points, a category from
//! a fixed set and optional verbatim citations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use web_summarizer::{Config, Pipeline, SummaryRequest, SummaryOptions};
//!
//! let config = Config::from_env()?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! let request = SummaryRequest::new("https://example.com/post")
//!     .with_options(SummaryOptions::default().with_key_points(3));
//! let response = pipeline.run(request).await;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! ```
//!
//! Many URLs sharing a topic go through [`BatchCoordinator::aggregate`].
//!
//! # Modules
//!
//! - [`fetcher`] - URL validation and HTTP retrieval
//! - [`extractor`] - Readability-style content extraction
//! - [`summarizer`] - Prompting, the generator seam and output validation
//! - [`pipeline`] - Per-URL orchestration
//! - [`batch`] - Bounded concurrent aggregation
//! - [`testing`] - Mock fetcher and generator

pub mod batch;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod summarizer;
pub mod testing;
pub mod types;

pub use batch::BatchCoordinator;
pub use config::{Config, ExtractionConfig, FetchConfig, GeneratorConfig};
pub use error::{
    ConfigError, ErrorCode, ExtractionError, FetchError, PipelineError, SchemaViolation,
    SummarizationError,
};
pub use extractor::Extractor;
pub use fetcher::{Fetcher, HttpFetcher};
pub use pipeline::{Pipeline, Stage};
pub use summarizer::{Generator, Summarizer};
pub use types::{
    batch::{BatchJob, BatchResult, FailedSource, PlatformTag, SourceSummary},
    page::{ExtractionResult, FetchResult},
    request::{SummaryOptions, SummaryRequest},
    response::{ResponseMetadata, SummaryData, SummaryResponse},
    summary::{Category, StructuredSummary},
};

/// Summarize one URL with default options using configuration from the
/// environment.
pub async fn summarize_url(url: &str) -> Result<SummaryResponse, ConfigError> {
    let config = Config::from_env()?;
    let pipeline = Pipeline::from_config(&config)?;
    Ok(pipeline.summarize_url(url).await)
}
