//! Topic aggregation over many URLs.
//!
//! Every URL runs through its own pipeline invocation on a spawned task.
//! A semaphore caps how many run at once. Tasks share nothing but the
//! read-only pipeline, so one URL failing (or panicking) never affects the
//! others.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::fetcher::Fetcher;
use crate::pipeline::Pipeline;
use crate::summarizer::Generator;
use crate::types::batch::{BatchJob, BatchResult, FailedSource, SourceSummary};
use crate::types::request::SummaryRequest;
use crate::types::response::SummaryResponse;

/// Upper bound on concurrent pipeline runs for one batch.
pub const MAX_WORKERS: usize = 10;

/// Runs a [`Pipeline`] over every URL of a [`BatchJob`].
pub struct BatchCoordinator<F, G> {
    pipeline: Arc<Pipeline<F, G>>,
}

impl<F, G> Clone for BatchCoordinator<F, G> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<F, G> BatchCoordinator<F, G>
where
    F: Fetcher + 'static,
    G: Generator + 'static,
{
    pub fn new(pipeline: Pipeline<F, G>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Summarize every URL in `job` and collect the outcomes.
    ///
    /// Always returns a result; each URL ends up in exactly one of
    /// `successful` or `failed`, in completion order.
    pub async fn aggregate(&self, job: BatchJob) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let span = info_span!("aggregate", %batch_id, topic = %job.topic);

        async move {
            let workers = job.max_workers.clamp(1, MAX_WORKERS);
            let platforms = job.effective_platforms();
            let total_sources = job.urls.len();

            if workers != job.max_workers {
                warn!(requested = job.max_workers, using = workers, "Clamped worker count");
            }
            info!(total_sources, workers, "Batch starting");

            let semaphore = Arc::new(Semaphore::new(workers));
            let mut tasks = FuturesUnordered::new();

            for url in job.urls {
                let pipeline = Arc::clone(&self.pipeline);
                let semaphore = Arc::clone(&semaphore);
                let request = SummaryRequest::new(url.clone()).with_options(job.options.clone());

                let handle = tokio::spawn(
                    async move {
                        let _permit = match semaphore.acquire_owned().await {
                            Ok(permit) => permit,
                            Err(_) => {
                                return SummaryResponse::failure(
                                    "worker pool closed",
                                    ErrorCode::UnknownError,
                                )
                            }
                        };
                        pipeline.run(request).await
                    }
                    .in_current_span(),
                );

                tasks.push(async move { (url, handle.await) });
            }

            let mut successful = Vec::new();
            let mut failed = Vec::new();

            while let Some((url, joined)) = tasks.next().await {
                match joined {
                    Ok(SummaryResponse::Success(data)) => {
                        successful.push(SourceSummary::new(url, data));
                    }
                    Ok(SummaryResponse::Failure { error, error_code }) => {
                        failed.push(FailedSource {
                            url,
                            error,
                            error_code,
                        });
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Batch worker task failed");
                        failed.push(FailedSource {
                            url,
                            error: format!("worker task failed: {e}"),
                            error_code: ErrorCode::UnknownError,
                        });
                    }
                }
            }

            info!(
                total_sources,
                successful = successful.len(),
                failed = failed.len(),
                "Batch complete"
            );

            BatchResult {
                batch_id,
                topic: job.topic,
                platforms,
                total_sources,
                successful,
                failed,
                generated_at: Utc::now(),
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::config::Config;
    use crate::error::FetchError;
    use crate::testing::{summary_json, MockFetcher, MockGenerator};
    use crate::types::batch::PlatformTag;

    fn page() -> String {
        let prose = "The quarterly report shows steady growth across every region. ".repeat(8);
        format!(
            "<html><head><title>Report</title></head>\
             <body><article><p>{prose}</p></article></body></html>"
        )
    }

    fn coordinator(fetcher: MockFetcher) -> BatchCoordinator<MockFetcher, MockGenerator> {
        let generator = MockGenerator::new().with_reply(summary_json("Business", 3), 50);
        BatchCoordinator::new(Pipeline::new(&Config::default(), fetcher, generator))
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let fetcher = MockFetcher::new()
            .with_page("https://a.example", page())
            .with_page("https://b.example", page())
            .with_error(
                "https://slow.example",
                FetchError::Timeout {
                    url: "https://slow.example".into(),
                    timeout_secs: 10,
                },
            );
        let job = BatchJob::new(
            "growth",
            ["https://a.example", "https://slow.example", "https://b.example"],
        );

        let result = coordinator(fetcher).aggregate(job).await;

        assert_eq!(result.total_sources, 3);
        assert_eq!(result.successful.len(), 2);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].url, "https://slow.example");
        assert_eq!(result.failed[0].error_code, ErrorCode::Timeout);
        assert!(result.is_complete());
        assert_eq!(result.platforms, PlatformTag::DEFAULTS.to_vec());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let result = coordinator(MockFetcher::new())
            .aggregate(BatchJob::new("nothing", Vec::<String>::new()))
            .await;
        assert_eq!(result.total_sources, 0);
        assert!(result.successful.is_empty());
        assert!(result.failed.is_empty());
        assert!(result.is_complete());
    }

    #[tokio::test]
    async fn test_all_failing_batch() {
        let urls = ["https://a.example", "https://b.example", "not a url"];
        let result = coordinator(MockFetcher::new())
            .aggregate(BatchJob::new("broken", urls))
            .await;

        assert_eq!(result.failed.len(), 3);
        assert!(result.is_complete());
        assert_eq!(result.success_rate(), 0.0);

        let mut codes: Vec<ErrorCode> = result.failed.iter().map(|f| f.error_code).collect();
        codes.sort_by_key(|c| c.as_str());
        assert_eq!(codes, vec![ErrorCode::InvalidUrl, ErrorCode::NotFound, ErrorCode::NotFound]);
    }

    #[tokio::test]
    async fn test_worker_limit_bounds_concurrency() {
        let urls: Vec<String> = (0..4).map(|i| format!("https://site{i}.example")).collect();
        let fetcher = urls.iter().fold(MockFetcher::new(), |fetcher, url| {
            fetcher
                .with_page(url.clone(), page())
                .with_delay(url.clone(), Duration::from_millis(200))
        });

        let started = Instant::now();
        let result = coordinator(fetcher)
            .aggregate(BatchJob::new("slow", urls).with_max_workers(2))
            .await;

        assert_eq!(result.successful.len(), 4);
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_worker_count_is_clamped() {
        let job = BatchJob::new("zero", ["https://a.example"]).with_max_workers(0);
        let result = coordinator(MockFetcher::new().with_page("https://a.example", page()))
            .aggregate(job)
            .await;
        assert_eq!(result.successful.len(), 1);
        assert_eq!(result.successful[0].data.title, "Report");
    }
}
