//! Hub-Sift main entry point
//!
//! This is the command-line interface for the Hub-Sift search scraper.

use clap::Parser;
use hub_sift::config::{read_config, validate, ScraperConfig};
use hub_sift::crawler::fetch_links;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Hub-Sift: scrape a code-hosting platform's search results
///
/// Searches one resource type for the given keywords through rotating proxies and
/// prints every result as JSON. Repository results carry their language breakdown.
#[derive(Parser, Debug)]
#[command(name = "hub-sift")]
#[command(version)]
#[command(about = "Scrape code search results into JSON records", long_about = None)]
struct Cli {
    /// Search keywords (override the config file)
    #[arg(value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Resource type: Repositories, Issues, Wikis, ... (overrides the config file)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    resource_type: Option<String>,

    /// Proxy address host:port, repeatable (overrides the config file)
    #[arg(short = 'p', long = "proxy", value_name = "PROXY")]
    proxies: Vec<String>,

    /// Print one JSON line instead of pretty output
    #[arg(long)]
    compact: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::info!(
        "Searching {} for {:?} through {} proxies",
        config.search.resource_type,
        config.search.keywords,
        config.search.proxies.len()
    );

    let outcome = fetch_links(&config).await;
    let failed = outcome.is_failed();

    let records = outcome.into_records();
    let json = if cli.compact {
        serde_json::to_string(&records)?
    } else {
        serde_json::to_string_pretty(&records)?
    };
    println!("{}", json);

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Loads the config file, if any, layers command-line values on top, and validates
fn build_config(cli: &Cli) -> anyhow::Result<ScraperConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)?
        }
        None => ScraperConfig::default(),
    };

    if !cli.keywords.is_empty() {
        config.search.keywords = cli.keywords.clone();
    }
    if let Some(resource_type) = &cli.resource_type {
        config.search.resource_type = resource_type.clone();
    }
    if !cli.proxies.is_empty() {
        config.search.proxies = cli.proxies.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the JSON records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hub_sift=info,warn"),
            1 => EnvFilter::new("hub_sift=debug,info"),
            2 => EnvFilter::new("hub_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
