//! Testing utilities including mock implementations.
//!
//! These let applications and tests drive the pipeline without network
//! access or a real AI backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::fetcher::Fetcher;
use crate::summarizer::{Generation, GenerationRequest, Generator, GeneratorError};
use crate::types::page::FetchResult;

/// A mock fetcher serving canned pages.
///
/// Unknown URLs fail with `NOT_FOUND`.
#[derive(Default, Clone)]
pub struct MockFetcher {
    /// Predefined outcomes by URL
    pages: Arc<RwLock<HashMap<String, Result<FetchResult, FetchError>>>>,

    /// Artificial latency by URL
    delays: Arc<RwLock<HashMap<String, Duration>>>,

    /// URLs requested, in call order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url` with a 200 status.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        let page = FetchResult::html(url.clone(), html);
        self.pages.write().unwrap().insert(url, Ok(page));
        self
    }

    /// Fail `url` with `error`.
    pub fn with_error(self, url: impl Into<String>, error: FetchError) -> Self {
        self.pages.write().unwrap().insert(url.into(), Err(error));
        self
    }

    /// Sleep before answering for `url`.
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.into(), delay);
        self
    }

    /// Get all URLs fetched so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.calls.write().unwrap().push(url.to_string());

        let delay = self.delays.read().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.pages.read().unwrap().get(url).cloned();
        outcome.unwrap_or_else(|| Err(FetchError::NotFound { url: url.to_string() }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock generator replaying scripted replies.
///
/// Replies are served in order; the last one repeats once the script runs
/// out. With no script at all every call fails with an API error.
#[derive(Default, Clone)]
pub struct MockGenerator {
    script: Arc<RwLock<VecDeque<Result<Generation, GeneratorError>>>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with its token count.
    pub fn with_reply(self, content: impl Into<String>, tokens_used: u32) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Ok(Generation::new(content, tokens_used)));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: GeneratorError) -> Self {
        self.script.write().unwrap().push_back(Err(error));
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.read().unwrap().clone()
    }

    fn next_reply(&self) -> Result<Generation, GeneratorError> {
        let mut script = self.script.write().unwrap();
        match script.len() {
            0 => Err(GeneratorError::Api("no scripted reply".into())),
            1 => script[0].clone(),
            _ => script
                .pop_front()
                .unwrap_or_else(|| Err(GeneratorError::Api("no scripted reply".into()))),
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GeneratorError> {
        self.calls.write().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply()
    }
}

/// A well-formed generator reply with `key_points` points.
pub fn summary_json(category: &str, key_points: usize) -> String {
    let points: Vec<String> = (1..=key_points).map(|i| format!("Key point {i}")).collect();
    serde_json::json!({
        "summary": "The article explains a development and why it matters.",
        "key_points": points,
        "category": category,
    })
    .to_string()
}
