/// A single forum post
///
/// Only constructed once all four fields were located in the markup, so a
/// partially extracted post never exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post subject line
    pub title: String,

    /// Plain-text body of the post
    pub content: String,

    /// Display name of the author
    pub author: String,

    /// Raw `datetime` attribute of the post's timestamp (not parsed)
    pub date: String,
}

impl Post {
    /// Creates a new post from its four fields
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            date: date.into(),
        }
    }

    /// Returns at most `max_chars` characters of the content
    pub fn content_preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}
