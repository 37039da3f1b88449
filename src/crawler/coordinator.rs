//! Forum crawler - pagination and extraction loop
//!
//! This module walks one forum's discussion index:
//! - Fetching index pages `page=0, 1, 2, ...`
//! - Extracting discussion links from each index page
//! - Visiting every discussion and extracting its posts
//! - Stopping at the first empty index page, failed index fetch, or page limit

use crate::crawler::fetcher::{FetchError, PageSource};
use crate::crawler::pacing::Pacer;
use crate::crawler::parser::{extract_discussion_links, extract_posts, ForumSelectors};
use crate::model::{DiscussionUrl, Post, ScrapeResult};
use crate::url::index_page_url;
use crate::ScrapeError;
use url::Url;

/// Default ceiling on index pages walked for one forum
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Why pagination ended
#[derive(Debug)]
pub enum StopReason {
    /// The index page held no discussion links
    EmptyPage { page: u32 },

    /// The index page could not be fetched
    FetchFailed { page: u32, error: FetchError },

    /// The configured page limit was reached
    PageLimit { pages: u32 },
}

/// Outcome of crawling one forum
#[derive(Debug)]
pub struct CrawlReport {
    /// Discussions with at least one post, in discovery order
    pub result: ScrapeResult,

    /// Index page fetches issued, including the one that ended pagination
    pub index_requests: u32,

    /// Discussions fetched successfully (with or without posts)
    pub discussions_visited: usize,

    /// Discussions whose fetch failed
    pub discussions_failed: usize,

    /// Why pagination ended
    pub stop_reason: StopReason,
}

/// Crawl state machine
enum CrawlState {
    FetchIndex(u32),
    Done(StopReason),
}

/// Running totals while a forum is crawled
#[derive(Default)]
struct Tally {
    result: ScrapeResult,
    index_requests: u32,
    discussions_visited: usize,
    discussions_failed: usize,
}

/// Crawls a single forum through a [`PageSource`]
///
/// Requests are issued one at a time; the pacer runs after every
/// discussion visit regardless of its outcome.
pub struct ForumCrawler<'a, S: PageSource, P: Pacer> {
    base_url: Url,
    source: &'a S,
    pacer: &'a P,
    selectors: ForumSelectors,
    max_pages: u32,
}

impl<'a, S: PageSource, P: Pacer> ForumCrawler<'a, S, P> {
    /// Creates a crawler for the forum at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - The forum index URL, without page number
    /// * `source` - Where pages are fetched from
    /// * `pacer` - Pause policy between discussion visits
    ///
    /// # Returns
    ///
    /// * `Ok(ForumCrawler)` - Ready to run
    /// * `Err(ScrapeError)` - The forum selectors failed to compile
    pub fn new(base_url: Url, source: &'a S, pacer: &'a P) -> Result<Self, ScrapeError> {
        tracing::info!("Initialized scraper for URL: {}", base_url);
        Ok(Self {
            base_url,
            source,
            pacer,
            selectors: ForumSelectors::new()?,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Limits how many index pages are walked
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// The forum being crawled
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs pagination to completion
    pub async fn run(&self) -> CrawlReport {
        let mut tally = Tally::default();
        let mut state = CrawlState::FetchIndex(0);

        let stop_reason = loop {
            state = match state {
                CrawlState::FetchIndex(page) => self.crawl_index_page(page, &mut tally).await,
                CrawlState::Done(reason) => break reason,
            };
        };

        match &stop_reason {
            StopReason::EmptyPage { page } => {
                tracing::info!("No discussions on page {}, pagination complete", page);
            }
            StopReason::FetchFailed { page, .. } => {
                tracing::warn!("Stopping at page {}: index page could not be fetched", page);
            }
            StopReason::PageLimit { pages } => {
                tracing::warn!(
                    "Stopping after {} index pages: page limit reached for {}",
                    pages,
                    self.base_url
                );
            }
        }

        tracing::info!(
            "Forum {} done: {} discussions, {} posts, {} index requests, {} failed discussions",
            self.base_url,
            tally.result.len(),
            tally.result.total_posts(),
            tally.index_requests,
            tally.discussions_failed
        );

        CrawlReport {
            result: tally.result,
            index_requests: tally.index_requests,
            discussions_visited: tally.discussions_visited,
            discussions_failed: tally.discussions_failed,
            stop_reason,
        }
    }

    /// Fetches one index page and visits its discussions
    async fn crawl_index_page(&self, page: u32, tally: &mut Tally) -> CrawlState {
        if page >= self.max_pages {
            return CrawlState::Done(StopReason::PageLimit { pages: page });
        }

        let index_url = index_page_url(&self.base_url, page);
        tracing::info!("Scraping page {}", page);

        tally.index_requests += 1;
        let links = match self.source.fetch(&index_url).await {
            Ok(index) => extract_discussion_links(&index, &self.base_url, &self.selectors),
            Err(error) => return CrawlState::Done(StopReason::FetchFailed { page, error }),
        };

        if links.is_empty() {
            return CrawlState::Done(StopReason::EmptyPage { page });
        }

        for link in links {
            tracing::info!("Scraping discussion: {}", link);

            match self.scrape_discussion(&link).await {
                Ok(posts) => {
                    tally.discussions_visited += 1;
                    if posts.is_empty() {
                        tracing::debug!("No complete posts in {}", link);
                    } else {
                        tally.result.insert(DiscussionUrl::from(link), posts);
                    }
                }
                Err(error) => {
                    tally.discussions_failed += 1;
                    tracing::debug!("Skipping discussion {}: {}", error.url(), error);
                }
            }

            self.pacer.pause().await;
        }

        CrawlState::FetchIndex(page.saturating_add(1))
    }

    /// Fetches a discussion and extracts its posts
    pub async fn scrape_discussion(&self, url: &Url) -> Result<Vec<Post>, FetchError> {
        let page = self.source.fetch(url).await?;
        Ok(extract_posts(&page, &self.selectors))
    }
}
