//! Page retrieval.
//!
//! The [`Fetcher`] trait is the seam between the pipeline and the network.
//! [`HttpFetcher`] is the real implementation; `testing::MockFetcher` serves
//! canned pages.

mod http;
mod normalize;

pub use self::http::HttpFetcher;
pub use self::normalize::normalize_url;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::page::FetchResult;

/// Retrieves the raw body of a single URL.
///
/// Implementations validate the URL before any network call, follow a
/// bounded number of redirects, and never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;

    /// Short identifier for logging.
    fn name(&self) -> &str;
}
