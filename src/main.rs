//! Livelib-Source command-line interface
//!
//! A thin harness around the library so lookups can be exercised without a
//! host application: `identify` prints the resolved record as JSON, `cover`
//! writes the image bytes to a file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use livelib_source::config::load_config;
use livelib_source::{Abort, LivelibSource, Query, SourceConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Livelib-Source: book metadata from livelib.ru
#[derive(Parser, Debug)]
#[command(name = "livelib-source")]
#[command(version = "1.0.0")]
#[command(about = "Fetch book metadata from livelib.ru", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up metadata by livelib id or fuzzy title/author search
    Identify {
        /// Known livelib book id
        #[arg(long)]
        id: Option<String>,

        /// Book title to search for
        #[arg(long)]
        title: Option<String>,

        /// Author name; repeat for multiple authors
        #[arg(long = "author")]
        authors: Vec<String>,

        /// Per-request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Download the cover image for a known livelib id
    Cover {
        /// Livelib book id
        #[arg(long)]
        id: String,

        /// Output file for the image bytes
        #[arg(short, long, default_value = "cover.jpg")]
        output: PathBuf,

        /// Per-request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SourceConfig::default(),
    };

    match cli.command {
        Command::Identify {
            id,
            title,
            authors,
            timeout,
        } => handle_identify(config, id, title, authors, timeout).await,
        Command::Cover {
            id,
            output,
            timeout,
        } => handle_cover(config, id, output, timeout).await,
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("livelib_source=info,warn"),
            1 => EnvFilter::new("livelib_source=debug,info"),
            2 => EnvFilter::new("livelib_source=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs an identify lookup and prints the record as JSON
async fn handle_identify(
    config: SourceConfig,
    id: Option<String>,
    title: Option<String>,
    authors: Vec<String>,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let query = Query {
        livelib_id: id,
        title,
        authors,
    };
    anyhow::ensure!(
        query.is_actionable(),
        "provide --id or --title to look up a book"
    );

    let timeout = Duration::from_secs(timeout.unwrap_or(config.request_timeout_secs));
    let source = LivelibSource::new(config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    source.identify(&query, timeout, &tx, &Abort::new()).await;
    drop(tx);

    match rx.recv().await {
        Some(record) => {
            let json = serde_json::to_string_pretty(&record)?;
            println!("{json}");
        }
        None => println!("No result."),
    }

    Ok(())
}

/// Downloads a cover image and writes it to disk
async fn handle_cover(
    config: SourceConfig,
    id: String,
    output: PathBuf,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(timeout.unwrap_or(config.request_timeout_secs));
    let source = LivelibSource::new(config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let query = Query {
        livelib_id: Some(id),
        ..Query::default()
    };
    source
        .download_cover(&query, timeout, &tx, &Abort::new())
        .await;
    drop(tx);

    match rx.recv().await {
        Some(cover) => {
            std::fs::write(&output, &cover.bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Wrote {} bytes from {} to {}",
                cover.bytes.len(),
                cover.source,
                output.display()
            );
        }
        None => println!("No cover found."),
    }

    Ok(())
}
