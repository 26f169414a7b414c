//! Top-Reel main entry point
//!
//! This is the command-line interface for the Top-Reel movie ranking scraper.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use top_reel::config::{resolve_config, Config, ConfigOverrides};
use top_reel::crawler::{scrape_and_save, FetchProgress, NoopProgress};
use top_reel::output::{load_statistics, print_statistics, TerminalProgress};
use top_reel::server;
use top_reel::storage::SqliteMovieStore;
use tracing_subscriber::EnvFilter;

/// Top-Reel: a movie ranking scraper
///
/// Top-Reel downloads the top-300 movie ranking and every movie's cast,
/// stores them in SQLite and serves a searchable read-only view.
#[derive(Parser, Debug)]
#[command(name = "top-reel")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the top-300 movie ranking and its cast", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Maximum number of concurrent requests
    #[arg(long, value_name = "N")]
    max_connections: Option<usize>,

    /// Path to the SQLite database
    #[arg(long, value_name = "PATH")]
    db_file: Option<String>,

    /// Address the web view listens on
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Show the resolved configuration without scraping
    #[arg(long, conflicts_with_all = ["stats", "serve"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "serve"])]
    stats: bool,

    /// Serve the stored data over HTTP
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    serve: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        max_connections: cli.max_connections,
        database_path: cli.db_file.clone(),
        bind_address: cli.bind.clone(),
    };

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = resolve_config(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.serve {
        handle_serve(&config).await
    } else {
        handle_scrape(&config, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("top_reel=info,warn"),
            1 => EnvFilter::new("top_reel=debug,info"),
            2 => EnvFilter::new("top_reel=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) {
    println!("=== Top-Reel Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Max connections: {}", config.scraper.max_connections);
    println!("  Site base URL: {}", config.scraper.site_base_url);
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );

    println!("\nTop List Pages ({}):", config.scraper.top_list_urls.len());
    for url in &config.scraper.top_list_urls {
        println!("  - {}", url);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteMovieStore::open_read_only(Path::new(&config.output.database_path))
        .context("Failed to open database")?;

    let stats = load_statistics(&storage).context("Failed to read statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --serve mode: runs the read-only web view
async fn handle_serve(config: &Config) -> Result<()> {
    server::serve(config).await.context("Server failed")
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, quiet: bool) -> Result<()> {
    tracing::info!(
        "Scraping {} top pages with {} connections",
        config.scraper.top_list_urls.len(),
        config.scraper.max_connections
    );

    let terminal = (!quiet).then(TerminalProgress::new);
    let progress: &dyn FetchProgress = match &terminal {
        Some(terminal) => terminal,
        None => &NoopProgress,
    };

    match scrape_and_save(config, progress).await {
        Ok(summary) => {
            tracing::info!(
                "Scrape completed: {} movies, {} cast entries",
                summary.movies,
                summary.actor_appearances
            );
            Ok(())
        }
        Err(e) => {
            if let Some(terminal) = &terminal {
                terminal.abandon();
            }
            if let Some(url) = e.url() {
                tracing::error!("Scrape aborted while processing {}", url);
            }
            Err(e).context("Scrape failed, database left unchanged")
        }
    }
}
