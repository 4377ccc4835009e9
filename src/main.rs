//! Prospector main entry point
//!
//! This is the command-line interface for the Prospector research-report generator.

use anyhow::{bail, Context};
use clap::Parser;
use prospector::config::{load_config_with_hash, validate, Config, Credentials};
use prospector::crawler::{CrawlOutcome, CrawlResult, Crawler};
use prospector::pipeline::{crawl_target, Researcher};
use prospector::report::{page_digest, render_text, write_markdown};
use prospector::url::parse_start_url;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Prospector: a sales-research report generator
///
/// Prospector crawls a company website within a page budget, researches the company
/// with web search and an LLM agent, and prints a structured report.
#[derive(Parser, Debug)]
#[command(name = "prospector")]
#[command(version)]
#[command(about = "Crawl a company website and generate a sales-research report", long_about = None)]
struct Cli {
    /// Website to analyze (prompted for on stdin when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl (overrides the config file)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Also write the report as markdown to this file
    #[arg(long, value_name = "PATH", conflicts_with = "crawl_only")]
    markdown: Option<PathBuf>,

    /// Crawl and print the page digest without generating a report
    #[arg(long)]
    crawl_only: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    // Credentials are checked before any network activity
    let credentials = if cli.crawl_only {
        None
    } else {
        dotenvy::dotenv().ok();
        Some(Credentials::from_env().context("Cannot generate a report")?)
    };

    let raw_url = match cli.url {
        Some(ref url) => url.clone(),
        None => prompt_for_url()?,
    };
    let start_url = parse_start_url(&raw_url)
        .map_err(|reason| prospector::ProspectorError::InvalidStartUrl {
            url: raw_url.clone(),
            reason,
        })?;

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let crawler = Arc::new(Crawler::from_config(&config)?);

    println!("Starting crawl...");
    let crawl = crawl_target(&crawler, &start_url, config.crawler.max_pages, &cancel).await?;
    println!("Crawled {} pages", crawl.len());

    let Some(credentials) = credentials else {
        println!("\n{}", crawl_digest(&crawl, config.agent.preview_chars));
        return Ok(());
    };

    if cancel.is_cancelled() {
        bail!("Interrupted before the report was generated");
    }

    println!("Generating report...");
    let researcher = Researcher::from_config(&config, &credentials, crawler)?;
    let report = researcher
        .write_report(&start_url, crawl.into_pages(), &cancel)
        .await
        .context("Report generation failed")?;

    println!("{}", render_text(&report));

    if let Some(path) = cli.markdown {
        write_markdown(&report, start_url.as_str(), &path)
            .with_context(|| format!("Failed to write markdown report to {}", path.display()))?;
        tracing::info!("Markdown report written to {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prospector=info,warn"),
            1 => EnvFilter::new("prospector=debug,info"),
            2 => EnvFilter::new("prospector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads the config file if one was given, then applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
        validate(&config).context("Invalid --max-pages")?;
    }

    Ok(config)
}

fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter the URL to analyze: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}

/// The `--crawl-only` output, flagged when an interrupt cut the crawl short
fn crawl_digest(crawl: &CrawlResult, preview_chars: usize) -> String {
    let digest = page_digest(&crawl.pages, preview_chars);
    if crawl.outcome == CrawlOutcome::Cancelled {
        format!("(crawl interrupted, showing the pages collected so far)\n\n{}", digest)
    } else {
        digest
    }
}

/// Cancels the token on the first Ctrl-C; pages already crawled are kept
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl-C received, stopping");
            cancel.cancel();
        }
    });
}
