//! Moodle forum export: walks the paginated discussion index of a
//! session-protected Moodle forum and writes every post to a text file
//!
//! This crate pages through a forum's discussion listing until an empty page,
//! visits each discussion, extracts its posts (title, author, date, content)
//! and serializes the aggregated result in a human-readable delimited format.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for forum export operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header value in config: {0}")]
    InvalidHeader(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ForumCrawler, HttpPageSource, PageSource};
pub use model::{DiscussionUrl, Post, ScrapeResult};
