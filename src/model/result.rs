use crate::model::Post;
use indexmap::IndexMap;
use std::fmt;
use url::Url;

/// Absolute URL identifying one discussion thread
///
/// Equality is plain string equality on the resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscussionUrl(String);

impl DiscussionUrl {
    /// Creates a discussion URL from any string-like value
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Url> for DiscussionUrl {
    fn from(url: Url) -> Self {
        Self(url.into())
    }
}

impl From<&Url> for DiscussionUrl {
    fn from(url: &Url) -> Self {
        Self(url.as_str().to_string())
    }
}

impl fmt::Display for DiscussionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Posts grouped by discussion, in discovery order
///
/// Re-inserting an existing discussion replaces its posts but keeps the
/// position where the discussion was first discovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    discussions: IndexMap<DiscussionUrl, Vec<Post>>,
}

impl ScrapeResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the posts of a discussion, returning the posts it replaced
    pub fn insert(&mut self, url: DiscussionUrl, posts: Vec<Post>) -> Option<Vec<Post>> {
        self.discussions.insert(url, posts)
    }

    /// Merges another result into this one; entries from `other` win
    pub fn merge(&mut self, other: ScrapeResult) {
        for (url, posts) in other.discussions {
            self.discussions.insert(url, posts);
        }
    }

    /// Returns the posts recorded for a discussion
    pub fn get(&self, url: &DiscussionUrl) -> Option<&[Post]> {
        self.discussions.get(url).map(Vec::as_slice)
    }

    /// Iterates discussions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&DiscussionUrl, &[Post])> {
        self.discussions
            .iter()
            .map(|(url, posts)| (url, posts.as_slice()))
    }

    /// Number of discussions
    pub fn len(&self) -> usize {
        self.discussions.len()
    }

    /// Whether no discussion was recorded
    pub fn is_empty(&self) -> bool {
        self.discussions.is_empty()
    }

    /// Number of posts across all discussions
    pub fn total_posts(&self) -> usize {
        self.discussions.values().map(Vec::len).sum()
    }
}
