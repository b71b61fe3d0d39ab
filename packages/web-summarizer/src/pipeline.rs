//! Single-URL orchestration: fetch, extract, summarize.
//!
//! Stages run strictly in order and each one's error short-circuits the run
//! with that stage's code. The pipeline never retries a stage and is the only
//! place `ResponseMetadata` is assembled.

use std::fmt;
use std::time::Instant;

use chrono::Utc;
use openai_client::OpenAIClient;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError};
use crate::extractor::Extractor;
use crate::fetcher::{normalize_url, Fetcher, HttpFetcher};
use crate::summarizer::{Generator, Summarizer};
use crate::types::request::{SummaryOptions, SummaryRequest};
use crate::types::response::{ResponseMetadata, SummaryData, SummaryResponse, EXTRACTION_METHOD};

/// Where a run is. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Validating,
    Fetching,
    Extracting,
    Summarizing,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > *self, "stage moved backwards: {self} -> {next}");
        debug!(from = %self, to = %next, "Stage transition");
        *self = next;
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetcher, extractor and summarizer wired together.
pub struct Pipeline<F, G> {
    fetcher: F,
    extractor: Extractor,
    summarizer: Summarizer<G>,
    default_model: String,
}

impl Pipeline<HttpFetcher, OpenAIClient> {
    /// Build the production pipeline: real HTTP fetcher and OpenAI backend.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let generator = config.generator.openai_client()?;
        Ok(Self::new(config, fetcher, generator))
    }
}

impl<F: Fetcher, G: Generator> Pipeline<F, G> {
    pub fn new(config: &Config, fetcher: F, generator: G) -> Self {
        Self {
            fetcher,
            extractor: Extractor::new(&config.extraction),
            summarizer: Summarizer::new(generator, &config.generator),
            default_model: config.generator.default_model.clone(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn generator(&self) -> &G {
        self.summarizer.generator()
    }

    /// Default options with the configured model.
    pub fn default_options(&self) -> SummaryOptions {
        SummaryOptions::default().with_model(self.default_model.clone())
    }

    /// Summarize `url` with default options.
    pub async fn summarize_url(&self, url: &str) -> SummaryResponse {
        let request = SummaryRequest::new(url).with_options(self.default_options());
        self.run(request).await
    }

    /// Run one request to completion. Never panics on stage errors; failures
    /// come back as a failed response.
    pub async fn run(&self, request: SummaryRequest) -> SummaryResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("summarize", %request_id, url = %request.url);

        async move {
            match self.execute(&request).await {
                Ok(data) => SummaryResponse::Success(data),
                Err(e) => SummaryResponse::failure(e.to_string(), e.code()),
            }
        }
        .instrument(span)
        .await
    }

    /// Like [`Pipeline::run`] but keeps the typed error.
    pub async fn execute(&self, request: &SummaryRequest) -> Result<SummaryData, PipelineError> {
        let started = Instant::now();
        let mut stage = Stage::Validating;

        match self.run_stages(request, &mut stage, started).await {
            Ok(data) => {
                stage.advance(Stage::Done);
                info!(
                    url = %data.url,
                    tokens_used = data.metadata.tokens_used,
                    processing_time_ms = data.metadata.processing_time_ms,
                    content_length = data.metadata.content_length,
                    "Summary complete"
                );
                Ok(data)
            }
            Err(e) => {
                warn!(stage = %stage, error_code = %e.code(), error = %e, "Pipeline failed");
                stage.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &SummaryRequest,
        stage: &mut Stage,
        started: Instant,
    ) -> Result<SummaryData, PipelineError> {
        request
            .options
            .validate()
            .map_err(PipelineError::InvalidOptions)?;
        normalize_url(&request.url)?;

        stage.advance(Stage::Fetching);
        let page = self.fetcher.fetch(&request.url).await?;
        debug!(
            final_url = %page.final_url,
            bytes = page.body_bytes(),
            fetcher = self.fetcher.name(),
            "Fetched page"
        );

        stage.advance(Stage::Extracting);
        let extracted = self.extractor.extract(&page.raw_body, &page.final_url)?;
        let final_url = page.final_url;
        let title = extracted.title.unwrap_or_else(|| final_url.clone());

        stage.advance(Stage::Summarizing);
        let summarization = self
            .summarizer
            .summarize(&extracted.text, &title, &request.options)
            .await?;

        let metadata = ResponseMetadata {
            timestamp: Utc::now(),
            tokens_used: summarization.tokens_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            model_used: summarization.model_used,
            content_length: extracted.length,
            extraction_method: EXTRACTION_METHOD.to_string(),
        };

        Ok(SummaryData::new(final_url, title, summarization.summary, metadata))
    }
}
