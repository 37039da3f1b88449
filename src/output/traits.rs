//! Exporter trait and output errors

use crate::model::ScrapeResult;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed export at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for exporters
///
/// An exporter serializes a whole scrape result to a destination,
/// replacing whatever was there. A failure is fatal for the run; no
/// partial output is recovered.
pub trait Exporter {
    /// Writes `result` to `destination`
    fn export(&self, result: &ScrapeResult, destination: &Path) -> OutputResult<()>;
}
