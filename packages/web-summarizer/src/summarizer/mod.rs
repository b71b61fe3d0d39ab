//! AI-backed structured summarization.
//!
//! One prompt, one call, strict validation. When the reply fails validation
//! the conversation is extended with a corrective message and the generator
//! gets exactly one more attempt. The configured timeout bounds both
//! attempts together.

mod generator;
pub mod prompts;
mod validate;

pub use self::generator::{Generation, GenerationRequest, Generator, GeneratorError};
pub use self::validate::{json_span, parse_summary};

use std::time::{Duration, Instant};

use openai_client::Message;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::SummarizationError;
use crate::types::request::SummaryOptions;
use crate::types::summary::StructuredSummary;

/// Attempts per summarization: the first call plus one repair.
const MAX_ATTEMPTS: u32 = 2;

/// Validated summary plus the accounting the pipeline reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summarization {
    pub summary: StructuredSummary,

    /// Summed over every attempt
    pub tokens_used: u32,

    pub model_used: String,
    pub elapsed_ms: u64,
}

/// Summarizes extracted text with a [`Generator`].
pub struct Summarizer<G> {
    generator: G,
    max_tokens: u32,
    temperature: f32,
    min_text_length: usize,
}

impl<G: Generator> Summarizer<G> {
    pub fn new(generator: G, config: &GeneratorConfig) -> Self {
        Self {
            generator,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            min_text_length: config.min_text_length,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Produce a validated [`StructuredSummary`] for `text`.
    pub async fn summarize(
        &self,
        text: &str,
        title: &str,
        options: &SummaryOptions,
    ) -> Result<Summarization, SummarizationError> {
        let length = text.trim().chars().count();
        if length < self.min_text_length {
            return Err(SummarizationError::TextTooShort {
                length,
                minimum: self.min_text_length,
            });
        }

        let start = Instant::now();
        let deadline = Duration::from_secs(options.timeout_seconds);

        let attempts = self.generate_validated(text, title, options);
        let (summary, tokens_used) = match tokio::time::timeout(deadline, attempts).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_secs = options.timeout_seconds,
                    model = %options.model,
                    "Summarization timed out"
                );
                return Err(SummarizationError::Timeout {
                    timeout_secs: options.timeout_seconds,
                });
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            model = %options.model,
            tokens_used,
            elapsed_ms,
            key_points = summary.key_points.len(),
            category = %summary.category,
            "Summarization complete"
        );

        Ok(Summarization {
            summary,
            tokens_used,
            model_used: options.model.clone(),
            elapsed_ms,
        })
    }

    async fn generate_validated(
        &self,
        text: &str,
        title: &str,
        options: &SummaryOptions,
    ) -> Result<(StructuredSummary, u32), SummarizationError> {
        let mut messages = vec![
            Message::system(prompts::SYSTEM_PROMPT),
            Message::user(prompts::format_summarize_prompt(text, title, options)),
        ];
        let mut tokens_used = 0u32;
        let mut attempt = 1;

        loop {
            let generation = self.call(&messages, options).await?;
            tokens_used = tokens_used.saturating_add(generation.tokens_used);

            let violation = match parse_summary(&generation.content, text, options) {
                Ok(summary) => return Ok((summary, tokens_used)),
                Err(violation) => violation,
            };

            if attempt >= MAX_ATTEMPTS {
                warn!(attempt, error = %violation, "Generator output invalid after repair attempt");
                return Err(SummarizationError::InvalidOutput {
                    violation,
                    attempts: attempt,
                });
            }

            warn!(attempt, error = %violation, "Generator output invalid, requesting repair");
            messages.push(Message::assistant(generation.content));
            messages.push(Message::user(prompts::format_corrective_prompt(
                &violation.to_string(),
                options,
            )));
            attempt += 1;
        }
    }

    async fn call(
        &self,
        messages: &[Message],
        options: &SummaryOptions,
    ) -> Result<Generation, SummarizationError> {
        let request = GenerationRequest {
            model: options.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        self.generator.generate(request).await.map_err(|e| match e {
            GeneratorError::Timeout => SummarizationError::Timeout {
                timeout_secs: options.timeout_seconds,
            },
            GeneratorError::Api(message) => SummarizationError::Api(message),
        })
    }
}
