//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building an HTTP client bound to one authenticated forum session
//! - GET requests for index and discussion pages
//! - Detecting redirects to the login page
//! - Error classification

use crate::config::SessionConfig;
use crate::crawler::parser::ParsedPage;
use crate::ConfigError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Marker in the final URL showing the forum bounced us to its login page
const LOGIN_MARKER: &str = "login";

/// Maximum redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or protocol failure before a response arrived
    #[error("Error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status after redirects were resolved
    #[error("Error fetching {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The request ended on the login page
    #[error("Redirected to login page {final_url} while fetching {url}; session cookie might be invalid")]
    SessionInvalid { url: String, final_url: String },

    /// The response body could not be read
    #[error("Error reading body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns true if the failure was a redirect to the login page
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid { .. })
    }

    /// The URL that was requested
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::SessionInvalid { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Capability to fetch a forum page and hand back its parsed markup
///
/// The crawler and extractors only depend on this trait, so tests can
/// substitute fixture documents for the network.
#[async_trait(?Send)]
pub trait PageSource {
    /// Fetches `url` and parses the response body
    async fn fetch(&self, url: &Url) -> Result<ParsedPage, FetchError>;
}

/// Builds an HTTP client carrying the forum session
///
/// The session cookie and user agent are fixed for the lifetime of the
/// client and sent with every request.
///
/// # Arguments
///
/// * `config` - The session configuration
/// * `session_token` - Value of the session cookie
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScrapeError)` - The token cannot be sent as a header, or the client failed to build
///
/// # Example
///
/// ```no_run
/// use moodle_forum_export::config::SessionConfig;
/// use moodle_forum_export::crawler::build_http_client;
///
/// let client = build_http_client(&SessionConfig::default(), "0123456789abcdef").unwrap();
/// ```
pub fn build_http_client(
    config: &SessionConfig,
    session_token: &str,
) -> Result<Client, crate::ScrapeError> {
    let mut cookie = HeaderValue::from_str(&format!("{}={}", config.cookie_name, session_token))
        .map_err(|e| ConfigError::InvalidHeader(format!("session cookie: {}", e)))?;
    cookie.set_sensitive(true);

    // Cookie goes on every request
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, cookie);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Page source backed by an authenticated HTTP session
///
/// The session is read-only after construction and shared by every
/// request issued through this source.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client for a session and wraps it
    pub fn with_session(
        config: &SessionConfig,
        session_token: &str,
    ) -> Result<Self, crate::ScrapeError> {
        let client = build_http_client(config, session_token)?;
        tracing::info!("Cookie and headers set");
        Ok(Self::new(client))
    }
}

#[async_trait(?Send)]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<ParsedPage, FetchError> {
        let result = fetch_page(&self.client, url).await;
        if let Err(e) = &result {
            tracing::error!("{}", e);
        }
        result
    }
}

/// Fetches a URL and parses the body
///
/// # Request Flow
///
/// 1. Send GET request; redirects are followed (max 10 hops)
/// 2. Non-2xx final status → `FetchError::Status`
/// 3. Final URL mentions `login` → `FetchError::SessionInvalid`
/// 4. Read body and parse it as HTML
///
/// No retries are attempted. A successfully fetched page is returned even if
/// it holds no forum content.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<ParsedPage, FetchError> {
    tracing::info!("Fetching URL: {}", url);

    // Send the request
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    // Check the status after redirects
    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    // Bounced to the login page
    if is_login_url(&final_url) {
        return Err(FetchError::SessionInvalid {
            url: url.to_string(),
            final_url: final_url.to_string(),
        });
    }

    // Read and parse the body
    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(ParsedPage::parse(final_url, &body))
}

/// Checks whether a resolved URL points at the login surface
fn is_login_url(url: &Url) -> bool {
    url.as_str().to_lowercase().contains(LOGIN_MARKER)
}
