//! HTML parser for forum index and discussion pages
//!
//! This module handles parsing Moodle markup to extract:
//! - Discussion links from a paginated index page
//! - Posts (title, author, date, content) from a discussion page

use crate::model::Post;
use crate::url::resolve_link;
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// Discussion rows of an index page
pub const DISCUSSION_LINK_SELECTOR: &str = ".topic .d-flex a.w-100.h-100.d-block";

/// One post within a discussion page
pub const POST_CONTAINER_SELECTOR: &str = "article.forum-post-container";

/// Body of a post, relative to its container
pub const POST_CONTENT_SELECTOR: &str = ".post-content-container";

/// Header of a post, relative to its container
pub const POST_HEADER_SELECTOR: &str = "header";

/// Subject line, relative to the post header
pub const POST_TITLE_SELECTOR: &str = r#"h3[data-region-content="forum-post-core-subject"]"#;

/// Author profile link, relative to the post header
pub const POST_AUTHOR_SELECTOR: &str = r#"a[href*="/user/view.php"]"#;

/// Timestamp element, relative to the post header
pub const POST_DATE_SELECTOR: &str = "time";

/// Number of content characters shown when logging a post
const CONTENT_PREVIEW_CHARS: usize = 100;

/// A fetched page with its queryable document
#[derive(Debug)]
pub struct ParsedPage {
    url: Url,
    document: Html,
}

impl ParsedPage {
    /// Parses an HTML body fetched from `url`
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// The URL the page was served from, after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The parsed document
    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// Compiled selectors for the forum's page structure
#[derive(Debug, Clone)]
pub struct ForumSelectors {
    discussion_link: Selector,
    post_container: Selector,
    content: Selector,
    header: Selector,
    title: Selector,
    author: Selector,
    date: Selector,
}

impl ForumSelectors {
    /// Compiles the Moodle selectors
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            discussion_link: compile(DISCUSSION_LINK_SELECTOR)?,
            post_container: compile(POST_CONTAINER_SELECTOR)?,
            content: compile(POST_CONTENT_SELECTOR)?,
            header: compile(POST_HEADER_SELECTOR)?,
            title: compile(POST_TITLE_SELECTOR)?,
            author: compile(POST_AUTHOR_SELECTOR)?,
            date: compile(POST_DATE_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Required post element that was not found in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Content,
    Header,
    Title,
    Author,
    Date,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Content => "content",
            Self::Header => "header",
            Self::Title => "title",
            Self::Author => "author link",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// Extracts the discussion links of an index page
///
/// Each matching anchor's href is resolved against `base_url` (the forum
/// URL). An empty result means the index has no more discussions; it is
/// not an error.
///
/// # Example
///
/// ```
/// use moodle_forum_export::crawler::{extract_discussion_links, ForumSelectors, ParsedPage};
/// use url::Url;
///
/// let base = Url::parse("https://moodle.example.edu/mod/forum/view.php?id=1").unwrap();
/// let html = r#"<table><tr class="discussion topic"><td><div class="d-flex">
///     <a class="w-100 h-100 d-block" href="discuss.php?d=5">Welcome</a>
/// </div></td></tr></table>"#;
/// let page = ParsedPage::parse(base.clone(), html);
/// let links = extract_discussion_links(&page, &base, &ForumSelectors::new().unwrap());
/// assert_eq!(links[0].as_str(), "https://moodle.example.edu/mod/forum/discuss.php?d=5");
/// ```
pub fn extract_discussion_links(
    page: &ParsedPage,
    base_url: &Url,
    selectors: &ForumSelectors,
) -> Vec<Url> {
    let mut links = Vec::new();

    for element in page.document().select(&selectors.discussion_link) {
        let Some(href) = element.value().attr("href") else {
            tracing::debug!("Skipping discussion anchor without href on {}", page.url());
            continue;
        };

        match resolve_link(href, base_url) {
            Some(discussion_url) => {
                tracing::info!(
                    "Found discussion: {} - {}",
                    element_text(&element),
                    discussion_url
                );
                links.push(discussion_url);
            }
            None => {
                tracing::debug!("Skipping unresolvable discussion href {:?}", href);
            }
        }
    }

    links
}

/// Extracts every complete post of a discussion page
///
/// Containers missing any required element are skipped with a warning;
/// the remaining posts keep their document order.
pub fn extract_posts(page: &ParsedPage, selectors: &ForumSelectors) -> Vec<Post> {
    let mut posts = Vec::new();

    for container in page.document().select(&selectors.post_container) {
        match extract_post(container, selectors) {
            Ok(post) => {
                tracing::info!(
                    title = %post.title,
                    author = %post.author,
                    date = %post.date,
                    "Post found: {}...",
                    post.content_preview(CONTENT_PREVIEW_CHARS)
                );
                posts.push(post);
            }
            Err(missing) => {
                tracing::warn!(
                    "Incomplete post data found on {}: missing {}",
                    page.url(),
                    missing
                );
            }
        }
    }

    posts
}

/// Extracts one post from its container
pub fn extract_post(
    container: ElementRef<'_>,
    selectors: &ForumSelectors,
) -> Result<Post, MissingField> {
    let content = first_match(container, &selectors.content).ok_or(MissingField::Content)?;
    let header = first_match(container, &selectors.header).ok_or(MissingField::Header)?;
    let title = first_match(header, &selectors.title).ok_or(MissingField::Title)?;
    let author = first_match(header, &selectors.author).ok_or(MissingField::Author)?;
    let date = first_match(header, &selectors.date).ok_or(MissingField::Date)?;

    Ok(Post {
        title: element_text(&title),
        content: element_text(&content),
        author: element_text(&author),
        date: date.value().attr("datetime").unwrap_or_default().to_string(),
    })
}

fn first_match<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Concatenated descendant text, trimmed at both ends
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
