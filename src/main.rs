//! moodle-forum-export main entry point
//!
//! This is the command-line interface for exporting Moodle forums to text.

use anyhow::Context;
use clap::Parser;
use moodle_forum_export::config::{resolve_config, Config};
use moodle_forum_export::crawler::{FixedDelay, HttpPageSource};
use moodle_forum_export::driver::{gather_input, run_session, RunStatus};
use moodle_forum_export::output::{print_statistics, read_export_file, ScrapeStatistics};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// moodle-forum-export: save the discussions of a Moodle forum to a text file
///
/// Walks the paginated discussion index of each forum using an existing
/// browser session cookie, visits every discussion and writes all posts to a
/// single delimited text file.
#[derive(Parser, Debug)]
#[command(name = "moodle-forum-export")]
#[command(version)]
#[command(about = "Export Moodle forum discussions to a text file", long_about = None)]
struct Cli {
    /// Forum index URLs (prompted interactively if none are given)
    #[arg(value_name = "FORUM_URL")]
    forums: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Session cookie value (prompted if absent)
    #[arg(short, long, value_name = "TOKEN")]
    session_token: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the resolved configuration and exit without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the existing export file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose, cli.quiet, cli.log_file.as_ref()) {
        eprintln!("Failed to set up logging: {:#}", e);
        return RunStatus::Failure.into();
    }

    let config = match resolve_config(cli.config.as_deref(), |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return RunStatus::Failure.into();
        }
    };

    let status = if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_scrape(&cli, &config).await
    };

    status.into()
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("moodle_forum_export=info,warn"),
            1 => EnvFilter::new("moodle_forum_export=debug,info"),
            2 => EnvFilter::new("moodle_forum_export=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .try_init()
        .context("a global subscriber is already installed")?;

    Ok(())
}

/// Handles the --dry-run mode: shows the settings a scrape would use
fn handle_dry_run(config: &Config) -> RunStatus {
    println!("=== moodle-forum-export Dry Run ===\n");

    println!("Session:");
    println!("  Cookie name: {}", config.session.cookie_name);
    println!("  User agent: {}", config.session.user_agent);
    println!("  Timeout: {}s", config.session.timeout_secs);

    println!("\nCrawler:");
    println!("  Delay between discussions: {}ms", config.crawler.request_delay_ms);
    println!("  Max index pages per forum: {}", config.crawler.max_pages);

    println!("\nOutput:");
    println!("  File: {}", config.output.output_path().display());

    println!("\n✓ Configuration is valid");

    RunStatus::Success
}

/// Handles the --stats mode: summarizes the existing export file
///
/// Exports whose titles or authors span several lines, or whose content
/// repeats the post separator, cannot be read back and are reported as a
/// failure.
fn handle_stats(config: &Config) -> RunStatus {
    let path = config.output.output_path();
    println!("Export file: {}\n", path.display());

    match read_export_file(&path) {
        Ok(result) => {
            print_statistics(&ScrapeStatistics::from_result(&result));
            RunStatus::Success
        }
        Err(e) => {
            tracing::error!("Failed to read export: {}", e);
            RunStatus::Failure
        }
    }
}

/// Handles the main scrape: collects input, crawls and exports
async fn handle_scrape(cli: &Cli, config: &Config) -> RunStatus {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let session = match gather_input(
        cli.session_token.as_deref(),
        &cli.forums,
        &config.session.cookie_name,
        &mut input,
        &mut output,
    ) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{}", e);
            return e.status();
        }
    };
    drop(input);

    let source = match HttpPageSource::with_session(&config.session, &session.token) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to set up HTTP session: {}", e);
            return RunStatus::Failure;
        }
    };
    let pacer = FixedDelay::new(config.crawler.request_delay());

    tokio::select! {
        status = run_session(&session, &source, &pacer, config) => status,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Scraping cancelled by user");
            RunStatus::Interrupted
        }
    }
}
