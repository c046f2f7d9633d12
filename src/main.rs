//! CLI entry point for visitor_stats.
//!
//! Fetches one occupancy snapshot, derives the arrival statistics and the
//! last 24 hours of samples, and prints them as text or JSON.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use visitor_stats::{
    config::Config,
    fetch::BasicClient,
    output::{JsonPresenter, TextPresenter},
    pipeline::{Outcome, fetch_rows, publish},
};

#[derive(Parser)]
#[command(name = "visitor_stats")]
#[command(about = "Arrival statistics and a 24h occupancy view for a visitor-count feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the arrival statistics and the last 24 hours of samples
    Show {
        /// Path to file or URL to fetch (defaults to the configured source)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show only the four arrival statistics
    Stats {
        /// Path to file or URL to fetch (defaults to the configured source)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();
    let cli = Cli::parse();
    let _file_guard = init_logging(&config.log_file_path)?;

    let (source, format, output, stats_only) = match cli.command {
        Commands::Show {
            source,
            format,
            output,
        } => (source, format, output, false),
        Commands::Stats { source, format } => (source, format, None, true),
    };
    let source = source.unwrap_or(config.source);

    let out: Box<dyn Write> = match &output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("Failed to create {path}"))?),
        None => Box::new(std::io::stdout()),
    };
    let tz = *Local::now().offset();

    info!(source = %source, ?format, stats_only, "Loading snapshot");
    let client = BasicClient::new();
    let fetched = fetch_rows(&client, &source).await;

    let outcome = match format {
        Format::Text => {
            let mut presenter = TextPresenter::new(out, tz);
            if stats_only {
                presenter = presenter.stats_only();
            }
            publish(fetched, &mut presenter)
        }
        Format::Json => {
            let mut presenter = JsonPresenter::new(out, tz);
            if stats_only {
                presenter = presenter.stats_only();
            }
            publish(fetched, &mut presenter)
        }
    };

    debug!(?outcome, "Run finished");
    Ok(match outcome {
        Outcome::Failed => ExitCode::FAILURE,
        Outcome::Rendered | Outcome::Empty => ExitCode::SUCCESS,
    })
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("visitor_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
