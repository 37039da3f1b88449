//! Crawler module for forum page fetching and extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching through an authenticated session
//! - HTML parsing for discussion links and posts
//! - Pacing between discussion visits
//! - The per-forum pagination loop

mod coordinator;
mod fetcher;
mod pacing;
mod parser;
#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{CrawlReport, ForumCrawler, StopReason, DEFAULT_MAX_PAGES};
pub use fetcher::{build_http_client, fetch_page, FetchError, HttpPageSource, PageSource};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use parser::{
    extract_discussion_links, extract_post, extract_posts, ForumSelectors, MissingField,
    ParsedPage,
};

use crate::config::CrawlerConfig;
use crate::model::ScrapeResult;
use crate::ScrapeError;
use url::Url;

/// Crawls one forum with the given settings and returns what it found
///
/// This is the main entry point for scraping a single forum. It will:
/// 1. Build a crawler for `forum_url`
/// 2. Walk the index pages until an empty page or a failed fetch
/// 3. Collect the posts of every discussion found
///
/// # Arguments
///
/// * `forum_url` - The forum index URL
/// * `source` - Where pages are fetched from
/// * `pacer` - Pause policy between discussion visits
/// * `config` - The crawler configuration
pub async fn scrape_forum<S: PageSource, P: Pacer>(
    forum_url: Url,
    source: &S,
    pacer: &P,
    config: &CrawlerConfig,
) -> Result<ScrapeResult, ScrapeError> {
    let crawler = ForumCrawler::new(forum_url, source, pacer)?.with_max_pages(config.max_pages);
    Ok(crawler.run().await.result)
}
