//! Listing-Sweep main entry point
//!
//! This is the command-line interface for the paginated listing-link collector.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use listing_sweep::config::{load_config_with_hash, Config};
use listing_sweep::crawler::PaginatedLinkCollector;
use listing_sweep::output::{default_file_name, print_summary, write_csv, RunSummary};
use listing_sweep::{prepare_run, PreparedRun, SourceKind};
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Listing-Sweep: collect listing links from paginated search results
///
/// Walks the result pages of an Amazon, eBay or Walmart search (or a single
/// Airbnb search URL), collects unique product/listing links and writes them
/// to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "listing-sweep")]
#[command(version = "1.0.0")]
#[command(about = "Collects listing links from paginated search results", long_about = None)]
struct Cli {
    /// Site to search: amazon, ebay, walmart or airbnb
    #[arg(value_name = "SOURCE")]
    source: SourceKind,

    /// Search term (or the search URL for airbnb)
    #[arg(value_name = "QUERY")]
    query: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of result pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// CSV file to write (default: generated name in the output directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show the resolved settings and first page URL without fetching
    #[arg(long)]
    dry_run: bool,

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

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let run = prepare_run(&config, cli.source, &cli.query, cli.max_pages)
        .with_context(|| format!("cannot start a {} run", cli.source))?;

    if cli.dry_run {
        handle_dry_run(&run, &config, cli.output.as_ref());
        return Ok(());
    }

    handle_sweep(cli, config, run).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_sweep=info,warn"),
            1 => EnvFilter::new("listing_sweep=debug,info"),
            2 => EnvFilter::new("listing_sweep=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(run: &PreparedRun, config: &Config, output: Option<&PathBuf>) {
    let resolved = &run.resolved;
    println!("=== Listing-Sweep Dry Run ===\n");

    println!("Source:");
    println!("  Name: {}", resolved.kind);
    println!("  Base URL: {}", resolved.base_url);
    println!("  Query: {}", run.query);

    let settings = &resolved.settings;
    println!("\nCollector:");
    println!("  Max pages: {}", settings.max_pages);
    println!(
        "  Delay: {}ms - {}ms",
        settings.delay.min().as_millis(),
        settings.delay.max().as_millis()
    );
    println!("  Stop on empty page: {}", settings.policy.stop_on_empty_page);
    println!(
        "  Stop on no new links: {}",
        settings.policy.stop_on_no_new_links
    );
    println!(
        "  Stop on missing next: {}",
        settings.policy.stop_on_missing_next
    );

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  Header: {}", resolved.csv_header);
    match output {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  Directory: {}", config.output.directory),
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start at {}", run.first_page);
}

/// Handles the main collection run
async fn handle_sweep(cli: Cli, config: Config, run: PreparedRun) -> anyhow::Result<()> {
    let PreparedRun {
        resolved,
        query,
        fetcher,
        ..
    } = run;
    let collector = PaginatedLinkCollector::new(resolved.settings.clone())?;

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            watcher.cancel();
        }
    });

    let progress = progress_bar(resolved.settings.max_pages, cli.quiet);
    let started_at = Local::now();
    let timer = Instant::now();

    let result = collector
        .collect_with_progress(
            query.as_str(),
            &fetcher,
            fetcher.source(),
            &cancel,
            |report| {
                progress.set_position(u64::from(report.page));
                progress.set_message(format!(
                    "{} links ({:.0}%)",
                    report.total_links,
                    report.progress() * 100.0
                ));
            },
        )
        .await?;
    progress.finish_and_clear();

    let mut summary = RunSummary::from_result(
        resolved.kind,
        query.as_str(),
        resolved.settings.max_pages,
        started_at,
        timer.elapsed(),
        &result,
    );

    if result.is_empty() {
        print_summary(&summary);
        println!("\nNo URLs found.");
        return Ok(());
    }

    let path = cli.output.unwrap_or_else(|| {
        PathBuf::from(&config.output.directory).join(default_file_name(
            resolved.kind,
            &query,
            &started_at,
        ))
    });
    write_csv(&path, &resolved.csv_header, &result)
        .with_context(|| format!("failed to write {}", path.display()))?;

    summary = summary.with_output_path(path);
    print_summary(&summary);

    Ok(())
}

fn progress_bar(max_pages: u32, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(u64::from(max_pages));
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] page {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
