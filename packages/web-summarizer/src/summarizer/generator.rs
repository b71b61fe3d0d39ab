//! Generator trait: the seam between the summarizer and an LLM backend.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use thiserror::Error;

/// One chat-style generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<Message>,

    /// Completion token budget
    pub max_tokens: u32,

    pub temperature: f32,
}

/// Raw generator output with its usage accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: String,
    pub tokens_used: u32,
}

impl Generation {
    pub fn new(content: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            content: content.into(),
            tokens_used,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("generator timed out")]
    Timeout,

    /// Auth, quota, malformed request or unusable reply
    #[error("{0}")]
    Api(String),
}

/// Text generation backend.
///
/// Implementations return whatever the model produced; validating it is the
/// summarizer's job.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GeneratorError>;
}

#[async_trait]
impl Generator for OpenAIClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GeneratorError> {
        let chat = ChatRequest::new(&request.model)
            .messages(request.messages)
            .temperature(request.temperature)
            .token_budget(request.max_tokens)
            .json_object();

        let response = self.chat_completion(chat).await?;
        let tokens_used = response.total_tokens();
        Ok(Generation {
            content: response.content,
            tokens_used,
        })
    }
}

impl From<OpenAIError> for GeneratorError {
    fn from(err: OpenAIError) -> Self {
        if err.is_timeout() {
            GeneratorError::Timeout
        } else {
            GeneratorError::Api(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_errors_map_to_generator_errors() {
        assert!(matches!(
            GeneratorError::from(OpenAIError::Timeout(1500)),
            GeneratorError::Timeout
        ));

        let err = GeneratorError::from(OpenAIError::Api {
            status: 429,
            message: "quota exceeded".into(),
        });
        match err {
            GeneratorError::Api(message) => assert!(message.contains("quota exceeded")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
