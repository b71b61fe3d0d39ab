//! reqwest-backed fetcher.

use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use tracing::{debug, info, warn};

use super::{normalize_url, Fetcher};
use crate::config::FetchConfig;
use crate::error::{ConfigError, FetchError};
use crate::types::page::FetchResult;

/// Fetches pages over HTTP(S) with a fixed timeout, redirect cap and user agent.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = HttpFetcher::new(&config.fetch)?;
/// let page = fetcher.fetch("https://example.com/post").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ConfigError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn map_transport_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_redirect() {
            FetchError::TooManyRedirects {
                url: url.to_string(),
                limit: self.config.max_redirects,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let target = normalize_url(url)?;

        debug!(url = %target, "HTTP fetch starting");
        let response = self.client.get(target.clone()).send().await.map_err(|e| {
            let err = self.map_transport_error(target.as_str(), e);
            warn!(url = %target, error = %err, "HTTP request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %target, status = status.as_u16(), "HTTP error status");
            return Err(FetchError::from_status(target.as_str(), status.as_u16()));
        }

        // Capture final URL after redirects
        let final_url = response.url().to_string();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();

        let raw_body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(target.as_str(), e))?;

        let page = FetchResult {
            final_url,
            status_code: status.as_u16(),
            raw_body,
            content_type,
        };

        if !page.is_html() {
            warn!(url = %target, content_type = %page.content_type, "Unexpected content type");
        }

        info!(
            url = %target,
            final_url = %page.final_url,
            bytes = page.body_bytes(),
            "Page fetched"
        );

        Ok(page)
    }

    fn name(&self) -> &str {
        "http"
    }
}
