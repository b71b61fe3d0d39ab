// Command line entry point for the web summarizer

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_summarizer::{BatchCoordinator, BatchJob, Config, Pipeline, PlatformTag, SummaryRequest};

#[derive(Parser)]
#[command(name = "web-summarizer", version, about = "Summarize web pages with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a single URL
    Summarize {
        url: String,

        /// Number of key points to request
        #[arg(long)]
        key_points: Option<u32>,

        /// Maximum summary sentences
        #[arg(long)]
        sentences: Option<u32>,

        /// Ask for verbatim citations
        #[arg(long)]
        citations: bool,

        /// Model identifier (defaults to SUMMARIZER_DEFAULT_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Timeout for the AI call, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Summarize several URLs on one topic concurrently
    Aggregate {
        #[arg(long)]
        topic: String,

        /// Target platform (repeatable): twitter, linkedin, facebook
        #[arg(long = "platform")]
        platforms: Vec<PlatformTag>,

        /// Concurrent workers (clamped to 1-10)
        #[arg(long, default_value_t = 5)]
        workers: usize,

        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,web_summarizer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pipeline = Pipeline::from_config(&config).context("Failed to build pipeline")?;

    match cli.command {
        Command::Summarize {
            url,
            key_points,
            sentences,
            citations,
            model,
            timeout,
        } => {
            let mut options = pipeline.default_options().with_citations(citations);
            if let Some(count) = key_points {
                options = options.with_key_points(count);
            }
            if let Some(count) = sentences {
                options = options.with_max_sentences(count);
            }
            if let Some(model) = model {
                options = options.with_model(model);
            }
            if let Some(seconds) = timeout {
                options = options.with_timeout_seconds(seconds);
            }

            let response = pipeline
                .run(SummaryRequest::new(url).with_options(options))
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);

            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Command::Aggregate {
            topic,
            platforms,
            workers,
            urls,
        } => {
            let options = pipeline.default_options();
            let job = BatchJob::new(topic, urls)
                .with_platforms(platforms)
                .with_max_workers(workers)
                .with_options(options);

            let result = BatchCoordinator::new(pipeline).aggregate(job).await;
            tracing::info!(
                success_rate = result.success_rate(),
                "Aggregation finished"
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
