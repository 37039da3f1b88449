//! URL handling for forum scraping
//!
//! This module validates forum URLs entered by the operator, builds the
//! paginated index URLs the crawler walks, and resolves discussion hrefs
//! to absolute URLs.

mod resolve;

pub use resolve::resolve_link;

use crate::UrlError;
use url::Url;

/// Query parameter carrying the zero-based index page number
pub const PAGE_PARAM: &str = "page";

/// Parses and validates a forum index URL
///
/// Only absolute `http://` and `https://` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use moodle_forum_export::url::parse_forum_url;
///
/// let url = parse_forum_url("https://moodle.example.edu/mod/forum/view.php?id=42").unwrap();
/// assert_eq!(url.host_str(), Some("moodle.example.edu"));
/// assert!(parse_forum_url("moodle.example.edu/mod/forum/view.php").is_err());
/// ```
pub fn parse_forum_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Builds the URL of one page of the forum's discussion index
///
/// The page number is appended as a `page` query parameter. A `page`
/// parameter already present on the base URL is replaced so that
/// pagination always starts from the requested page.
///
/// # Examples
///
/// ```
/// use moodle_forum_export::url::index_page_url;
/// use url::Url;
///
/// let base = Url::parse("https://moodle.example.edu/mod/forum/view.php?id=42").unwrap();
/// let page = index_page_url(&base, 3);
/// assert_eq!(page.as_str(), "https://moodle.example.edu/mod/forum/view.php?id=42&page=3");
/// ```
pub fn index_page_url(base: &Url, page: u32) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_PARAM, &page.to_string());
    }
    url
}
