//! Output module for exporting scraped discussions
//!
//! This module handles:
//! - Writing the delimited text export
//! - Reading an export back
//! - Summarizing scrape totals

pub mod stats;
mod text;
mod traits;

pub use stats::{print_statistics, ScrapeStatistics};
pub use text::{
    export_text, format_export, read_export, read_export_file, write_export, TextExporter,
    DISCUSSION_SEPARATOR, POST_SEPARATOR,
};
pub use traits::{Exporter, OutputError, OutputResult};
