//! Data model for scraped forum content
//!
//! A scrape produces a [`ScrapeResult`]: an insertion-ordered mapping from
//! [`DiscussionUrl`] to the posts extracted from that discussion.

mod post;
mod result;

pub use post::Post;
pub use result::{DiscussionUrl, ScrapeResult};
