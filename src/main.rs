//! Ratewise command-line entrypoint.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use ratewise::{
    CacheStoreHandle, Config, PlainTextExtractor, RatingInput, RatingService, ResourceInput,
    ScoreCalculator, SignalMetricsProvider,
};

#[derive(Debug, Parser)]
#[command(name = "ratewise", version, about = "Rate content resources on a 1-10 scale")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rate one resource read from a JSON file
    Rate {
        /// JSON object with title, content, author, url, publication_date and metadata
        file: PathBuf,
        /// Ignore any cached rating
        #[arg(long)]
        force: bool,
    },
    /// Rate a JSON array of resources, skipping the ones that fail
    Batch {
        file: PathBuf,
        /// Chunk size (defaults to RATEWISE_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Extract plain text from a txt, md or html file
    Extract {
        path: PathBuf,
        /// Format hint overriding extension and content detection
        #[arg(long)]
        format: Option<String>,
    },
    /// Print cache statistics
    Stats,
    /// Remove every cached rating
    Clear,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    match cli.command {
        Command::Rate { file, force } => {
            let input: ResourceInput = read_json(&file)?;
            let resource = build_service(&config).rate(input, force)?;
            print_json(&resource.to_rating_result())?;
        }
        Command::Batch { file, batch_size } => {
            let inputs: Vec<ResourceInput> = read_json(&file)?;
            let inputs: Vec<RatingInput> = inputs.into_iter().map(RatingInput::from).collect();
            let batch_size = batch_size.unwrap_or(config.batch_size);
            let report = build_service(&config).rate_batch_report(inputs, batch_size);

            let rated: Vec<_> = report
                .rated
                .iter()
                .filter_map(|r| r.to_rating_result())
                .collect();
            print_json(&json!({ "rated": rated, "skipped": report.skipped }))?;
        }
        Command::Extract { path, format } => {
            let (format, text) = PlainTextExtractor::new().extract_file(&path, format.as_deref())?;
            tracing::debug!(%format, "Extraction finished");
            println!("{text}");
        }
        Command::Stats => {
            print_json(&build_service(&config).cache_stats())?;
        }
        Command::Clear => {
            build_service(&config).clear_rating_cache();
            tracing::info!(cache_dir = %config.cache_dir.display(), "Cache cleared");
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> RatingService<SignalMetricsProvider> {
    tracing::info!(
        cache_dir = %config.cache_dir.display(),
        max_bytes = config.cache_max_bytes,
        "Opening rating cache"
    );
    RatingService::new(
        CacheStoreHandle::open(config.cache_config()),
        SignalMetricsProvider::new(),
        ScoreCalculator::standard(),
        config.rating_config(),
    )
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
