//! Pure OpenAI-compatible REST API client
//!
//! A clean, minimal client for chat completions with no domain-specific logic.
//! Works against api.openai.com or any compatible gateway via `with_base_url`.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::new(api_key).with_timeout(Duration::from_secs(15));
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::user("Hello!"))
//!         .token_budget(256),
//! ).await?;
//!
//! println!("{} ({} tokens)", response.content, response.total_tokens());
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::{header, Client};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = Instant::now();

        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, start))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            warn!(status = %status, error = %message, "OpenAI API error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, start))?;
        let chat_response: ChatResponseRaw =
            serde_json::from_str(&body).map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAIError::Parse("No choices in OpenAI response".into()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| OpenAIError::Parse("Empty message content".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            total_tokens = chat_response.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            model: chat_response.model,
            finish_reason: choice.finish_reason,
            usage: chat_response.usage,
        })
    }
}

fn transport_error(e: reqwest::Error, start: Instant) -> OpenAIError {
    if e.is_timeout() {
        warn!(elapsed_ms = start.elapsed().as_millis(), "OpenAI request timed out");
        OpenAIError::Timeout(start.elapsed().as_millis())
    } else {
        warn!(error = %e, "OpenAI request failed");
        OpenAIError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url, "https://custom.api.com/v1");
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAIClient::new("sk-secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-secret"));
    }
}
