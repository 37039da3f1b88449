//! Statistics over scraped discussions
//!
//! Totals reported at the end of a run and by `--stats`.

use crate::model::ScrapeResult;
use std::collections::HashSet;

/// Scrape statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeStatistics {
    /// Number of discussions with at least one post
    pub discussions: usize,

    /// Total number of posts
    pub posts: usize,

    /// Number of distinct post authors
    pub authors: usize,

    /// Posts whose timestamp had no `datetime` value
    pub posts_without_date: usize,
}

impl ScrapeStatistics {
    /// Computes statistics for a scrape result
    pub fn from_result(result: &ScrapeResult) -> Self {
        let mut authors = HashSet::new();
        let mut posts_without_date = 0;

        for (_, posts) in result.iter() {
            for post in posts {
                authors.insert(post.author.as_str());
                if post.date.is_empty() {
                    posts_without_date += 1;
                }
            }
        }

        Self {
            discussions: result.len(),
            posts: result.total_posts(),
            authors: authors.len(),
            posts_without_date,
        }
    }

    /// Average posts per discussion
    pub fn posts_per_discussion(&self) -> f64 {
        if self.discussions == 0 {
            return 0.0;
        }
        self.posts as f64 / self.discussions as f64
    }

    /// Emits the totals through the log
    pub fn log(&self) {
        tracing::info!("Total discussions scraped: {}", self.discussions);
        tracing::info!("Total posts scraped: {}", self.posts);
        tracing::debug!(
            "Distinct authors: {}, posts without date: {}",
            self.authors,
            self.posts_without_date
        );
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Export Statistics ===\n");
    println!("  Discussions: {}", stats.discussions);
    println!("  Posts: {}", stats.posts);
    println!("  Posts per discussion: {:.1}", stats.posts_per_discussion());
    println!("  Distinct authors: {}", stats.authors);
    if stats.posts_without_date > 0 {
        println!("  Posts without date: {}", stats.posts_without_date);
    }
}
