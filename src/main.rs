use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::process::exit;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use aws_config::BehaviorVersion;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use budget_ingest::config::IngestConfig;
use budget_ingest::engine::IngestEngine;
use budget_ingest::report::IngestionSummary;
use budget_ingest::sink::PostgresConnector;
use budget_ingest::source::{
    EnvCredentialsResolver, FileObjectFetcher, S3ObjectFetcher, SecretsManagerResolver
};
use budget_ingest::trigger::EventEnvelope;

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If I was making a much more sophisticated CLI application, I would have used the clap crate
    //      to handle the CLI parsing and execution.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: budget-ingest [event.json|file.csv] [log_level:optional]");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let input = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    dotenvy::dotenv().ok();
    let config = IngestConfig::from_env()?;

    let timer = Instant::now();

    let summary = if input.ends_with(".json") {
        run_from_event(config, input).await?
    } else {
        run_local_file(config, input).await?
    };

    let duration = timer.elapsed();

    info!("Processed file in: {duration:?}");

    write_summary_to_stdout(&summary)?;

    Ok(())
}

/// Runs the pipeline for a stored notification payload, against the real
/// object store and secret store.
async fn run_from_event(config: IngestConfig, path: &str) -> Result<IngestionSummary> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload at {path}"))?;
    let envelope = EventEnvelope::from_json(&payload)?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let connector = PostgresConnector::new(config.sink.clone());
    let engine = IngestEngine::new(
        config,
        S3ObjectFetcher::new(&aws),
        SecretsManagerResolver::new(&aws),
        connector
    );

    Ok(engine.run(&envelope).await?)
}

/// Replays a file already on disk, with sink credentials taken from the
/// environment instead of the secret store.
async fn run_local_file(config: IngestConfig, path: &str) -> Result<IngestionSummary> {
    let file = Path::new(path);
    let directory = file.parent().map(|p| p.to_string_lossy().to_string()).unwrap_or_default();
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Input path [{path}] has no file name"))?;

    let envelope = EventEnvelope::for_object(directory, name);
    let connector = PostgresConnector::new(config.sink.clone());
    let engine = IngestEngine::new(config, FileObjectFetcher, EnvCredentialsResolver, connector);

    Ok(engine.run(&envelope).await?)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The terminal summary goes to stdout, so logging stays on stderr to keep
    //      the two streams separable.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_summary_to_stdout(summary: &IngestionSummary) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    write!(output, "{summary}")?;

    output.flush()?;

    Ok(())
}
