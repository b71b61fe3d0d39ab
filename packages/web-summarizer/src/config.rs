//! Process-wide configuration.
//!
//! Built once at startup and handed to component constructors by reference.
//! Nothing below this module reads the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use secrecy::{ExposeSecret, SecretBox};

use crate::error::ConfigError;
use crate::types::request::DEFAULT_MODEL;

/// Outbound HTTP settings for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 3,
            user_agent: "WebSummarizerAgent/1.0.0".to_string(),
        }
    }
}

/// Length bounds for extracted text, in characters.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub min_content_length: usize,
    pub max_content_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            max_content_length: 50_000,
        }
    }
}

impl ExtractionConfig {
    /// Truncation must never cut text below the minimum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_content_length < self.min_content_length {
            return Err(ConfigError::Invalid {
                name: "SUMMARIZER_MAX_CONTENT_LENGTH",
                value: self.max_content_length.to_string(),
                reason: format!(
                    "must be at least SUMMARIZER_MIN_CONTENT_LENGTH ({})",
                    self.min_content_length
                ),
            });
        }
        Ok(())
    }
}

/// API key that never shows up in logs or debug output.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Only call this when actually sending the key.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// AI backend settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<ApiKey>,
    pub base_url: String,
    pub default_model: String,

    /// Completion token budget per call
    pub max_tokens: u32,

    pub temperature: f32,

    /// Below this many characters the generator is not called
    pub min_text_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.3,
            min_text_length: 50,
        }
    }
}

impl GeneratorConfig {
    /// Build the OpenAI-compatible client for this configuration.
    pub fn openai_client(&self) -> Result<openai_client::OpenAIClient, ConfigError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        Ok(openai_client::OpenAIClient::new(api_key.expose())
            .with_base_url(self.base_url.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub extraction: ExtractionConfig,
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        let config = Self {
            fetch: FetchConfig {
                timeout: Duration::from_secs(parse_var(
                    "SUMMARIZER_FETCH_TIMEOUT_SECS",
                    defaults.fetch.timeout.as_secs(),
                )?),
                max_redirects: parse_var("SUMMARIZER_MAX_REDIRECTS", defaults.fetch.max_redirects)?,
                user_agent: env::var("SUMMARIZER_USER_AGENT")
                    .unwrap_or(defaults.fetch.user_agent),
            },
            extraction: ExtractionConfig {
                min_content_length: parse_var(
                    "SUMMARIZER_MIN_CONTENT_LENGTH",
                    defaults.extraction.min_content_length,
                )?,
                max_content_length: parse_var(
                    "SUMMARIZER_MAX_CONTENT_LENGTH",
                    defaults.extraction.max_content_length,
                )?,
            },
            generator: GeneratorConfig {
                api_key: env::var("OPENAI_API_KEY").ok().map(ApiKey::new),
                base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.generator.base_url),
                default_model: env::var("SUMMARIZER_DEFAULT_MODEL")
                    .unwrap_or(defaults.generator.default_model),
                max_tokens: parse_var("SUMMARIZER_MAX_TOKENS", defaults.generator.max_tokens)?,
                ..defaults.generator
            },
        };

        config.extraction.validate()?;
        Ok(config)
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
