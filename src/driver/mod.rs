//! Session driver
//!
//! Gathers the session token and forum URLs, runs one crawler per forum,
//! merges the results and exports them. Every outcome maps to a
//! [`RunStatus`] that becomes the process exit code.

mod prompt;

pub use prompt::{collect_forum_urls, parse_forum_args, prompt_session_token};

use crate::config::{Config, CrawlerConfig, OutputConfig};
use crate::crawler::{scrape_forum, Pacer, PageSource};
use crate::model::ScrapeResult;
use crate::output::{write_export, ScrapeStatistics};
use crate::ScrapeError;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use thiserror::Error;
use url::Url;

/// Final outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Export written
    Success,
    /// Unexpected failure outside scraping itself
    Failure,
    /// No session token or no forum URL was supplied
    NoInput,
    /// Every forum came back empty
    NothingScraped,
    /// The export could not be written
    WriteFailed,
    /// The operator interrupted the run
    Interrupted,
}

impl RunStatus {
    /// Process exit code for this status
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::NoInput => 2,
            Self::NothingScraped => 3,
            Self::WriteFailed => 4,
            Self::Interrupted => 130,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Why input collection ended without something to scrape
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0} cookie is required")]
    MissingToken(String),

    #[error("No forum URLs were provided")]
    NoForums,

    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    pub fn status(&self) -> RunStatus {
        match self {
            Self::MissingToken(_) | Self::NoForums => RunStatus::NoInput,
            Self::Io(_) => RunStatus::Failure,
        }
    }
}

/// What the operator asked to scrape
#[derive(Debug, Clone)]
pub struct SessionInput {
    /// Session cookie value
    pub token: String,

    /// Forum index URLs, in the order given
    pub forums: Vec<Url>,
}

/// Resolves the session token and forum URLs
///
/// Values given on the command line win; anything missing is prompted for
/// on `input`.
pub fn gather_input<R: BufRead, W: Write>(
    token_arg: Option<&str>,
    forum_args: &[String],
    cookie_name: &str,
    input: &mut R,
    output: &mut W,
) -> Result<SessionInput, InputError> {
    let token = match token_arg.map(str::trim) {
        Some(token) if !token.is_empty() => Some(token.to_string()),
        Some(_) => None,
        None => prompt_session_token(input, output, cookie_name)?,
    };
    let token = token.ok_or_else(|| InputError::MissingToken(cookie_name.to_string()))?;

    let forums = if forum_args.is_empty() {
        collect_forum_urls(input, output)?
    } else {
        parse_forum_args(forum_args)
    };

    if forums.is_empty() {
        return Err(InputError::NoForums);
    }

    Ok(SessionInput { token, forums })
}

/// Crawls every forum in order and merges their results
///
/// A forum that yields nothing is reported and skipped. Later forums win
/// when two of them list the same discussion.
pub async fn scrape_forums<S: PageSource, P: Pacer>(
    forums: &[Url],
    source: &S,
    pacer: &P,
    config: &CrawlerConfig,
) -> Result<ScrapeResult, ScrapeError> {
    let mut all_discussions = ScrapeResult::new();

    for forum in forums {
        tracing::info!("Starting forum scraping for URL: {}", forum);
        let discussions = scrape_forum(forum.clone(), source, pacer, config).await?;

        if discussions.is_empty() {
            report_empty_forum(forum);
            continue;
        }

        all_discussions.merge(discussions);
    }

    Ok(all_discussions)
}

fn report_empty_forum(forum: &Url) {
    tracing::error!("No discussions were found for {}. This could mean:", forum);
    tracing::error!("1. The session cookie is invalid or expired");
    tracing::error!("2. The URL is not a valid Moodle forum");
    tracing::error!("3. The forum is empty");
    tracing::error!("4. The forum requires additional permissions");
}

/// Writes the merged result and reports totals
pub fn export_results(result: &ScrapeResult, output: &OutputConfig) -> RunStatus {
    if result.is_empty() {
        tracing::error!("No discussions were scraped from any forum");
        return RunStatus::NothingScraped;
    }

    match write_export(result, output) {
        Ok(_) => {
            ScrapeStatistics::from_result(result).log();
            RunStatus::Success
        }
        Err(e) => {
            tracing::error!("Failed to save forum content: {}", e);
            RunStatus::WriteFailed
        }
    }
}

/// Scrapes every requested forum and exports the merged result
pub async fn run_session<S: PageSource, P: Pacer>(
    input: &SessionInput,
    source: &S,
    pacer: &P,
    config: &Config,
) -> RunStatus {
    match scrape_forums(&input.forums, source, pacer, &config.crawler).await {
        Ok(result) => export_results(&result, &config.output),
        Err(e) => {
            tracing::error!("An unexpected error occurred: {}", e);
            RunStatus::Failure
        }
    }
}
