//! Network-free test doubles for the crawler

use crate::crawler::fetcher::{FetchError, PageSource};
use crate::crawler::pacing::Pacer;
use crate::crawler::parser::ParsedPage;
use crate::model::DiscussionUrl;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use url::Url;

pub(crate) const FORUM: &str = "https://moodle.example.edu/mod/forum/view.php?id=42";
pub(crate) const DISCUSS: &str = "https://moodle.example.edu/mod/forum/discuss.php";

pub(crate) enum Fixture {
    Html(String),
    LoginRedirect,
    Status(u16),
}

/// Serves fixture documents keyed by URL and records every request
///
/// Unknown URLs answer with HTTP 404.
#[derive(Default)]
pub(crate) struct FixtureSource {
    pages: HashMap<String, Fixture>,
    requests: RefCell<Vec<String>>,
}

impl FixtureSource {
    pub(crate) fn page(mut self, url: &str, fixture: Fixture) -> Self {
        self.pages.insert(url.to_string(), fixture);
        self
    }

    /// Index page `page` of [`FORUM`] listing the given discussion ids
    pub(crate) fn index(self, page: u32, discussion_ids: &[u32]) -> Self {
        self.index_for(FORUM, page, discussion_ids)
    }

    pub(crate) fn index_for(self, forum: &str, page: u32, discussion_ids: &[u32]) -> Self {
        let url = format!("{}&page={}", forum, page);
        self.page(&url, Fixture::Html(index_html(discussion_ids)))
    }

    /// Discussion `id` holding one complete post per title
    pub(crate) fn discussion(self, id: u32, titles: &[&str]) -> Self {
        let url = discussion_url(id).to_string();
        self.page(&url, Fixture::Html(discussion_html(titles)))
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub(crate) fn index_requests(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|url| url.starts_with(FORUM))
            .count()
    }
}

#[async_trait(?Send)]
impl PageSource for FixtureSource {
    async fn fetch(&self, url: &Url) -> Result<ParsedPage, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some(Fixture::Html(html)) => Ok(ParsedPage::parse(url.clone(), html)),
            Some(Fixture::LoginRedirect) => Err(FetchError::SessionInvalid {
                url: url.to_string(),
                final_url: "https://moodle.example.edu/login/index.php".to_string(),
            }),
            Some(Fixture::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Counts pauses instead of sleeping
#[derive(Default)]
pub(crate) struct CountingPacer {
    pauses: Cell<usize>,
}

impl CountingPacer {
    pub(crate) fn pauses(&self) -> usize {
        self.pauses.get()
    }
}

#[async_trait(?Send)]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
    }
}

pub(crate) fn discussion_url(id: u32) -> DiscussionUrl {
    DiscussionUrl::new(format!("{}?d={}", DISCUSS, id))
}

pub(crate) fn forum_url() -> Url {
    Url::parse(FORUM).unwrap()
}

pub(crate) fn index_html(discussion_ids: &[u32]) -> String {
    let rows: String = discussion_ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr class="discussion topic"><th class="topic"><div class="d-flex">
                <a class="w-100 h-100 d-block" href="discuss.php?d={}">Discussion {}</a>
                </div></th></tr>"#,
                id, id
            )
        })
        .collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}

pub(crate) fn discussion_html(titles: &[&str]) -> String {
    let posts: String = titles
        .iter()
        .map(|title| {
            format!(
                r#"<article class="forum-post-container"><header>
                <h3 data-region-content="forum-post-core-subject">{}</h3>
                <a href="/user/view.php?id=1">Teacher</a>
                <time datetime="2024-05-01T10:00:00+00:00">May 1</time>
                </header><div class="post-content-container">Body of {}</div></article>"#,
                title, title
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", posts)
}
