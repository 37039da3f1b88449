//! Configuration module
//!
//! Settings come from built-in defaults, an optional TOML file and the
//! `OUT_FILE` environment variable, resolved once at startup and passed down.
//!
//! # Example
//!
//! ```no_run
//! use moodle_forum_export::config::resolve_config;
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("forum.toml")), |key| std::env::var(key).ok())
//!     .unwrap();
//! println!("Export goes to: {}", config.output.output_path().display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SessionConfig, DEFAULT_COOKIE_NAME, DEFAULT_OUTPUT_DIR,
    DEFAULT_OUTPUT_FILE, DEFAULT_USER_AGENT, OUTPUT_FILE_ENV,
};

// Re-export parser functions
pub use parser::{load_config, resolve_config};
