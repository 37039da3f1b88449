//! Plain-text export of scraped discussions
//!
//! One block per discussion, in discovery order:
//!
//! ```text
//!
//! ================================================================================
//! Discussion URL: <url>
//! ================================================================================
//!
//! Title: <title>
//! Author: <author>
//! Date: <date>
//! Content:
//! <content>
//!
//! ----------------------------------------
//!
//! ```
//!
//! The post part repeats for every post of the discussion.

use crate::config::OutputConfig;
use crate::model::{DiscussionUrl, Post, ScrapeResult};
use crate::output::traits::{Exporter, OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::iter::{Enumerate, Peekable};
use std::path::{Path, PathBuf};
use std::str::Lines;

/// Line framing the discussion URL
pub const DISCUSSION_SEPARATOR: &str =
    "================================================================================";

/// Line closing every post
pub const POST_SEPARATOR: &str = "----------------------------------------";

const URL_LABEL: &str = "Discussion URL: ";
const TITLE_LABEL: &str = "Title: ";
const AUTHOR_LABEL: &str = "Author: ";
const DATE_LABEL: &str = "Date: ";
const CONTENT_LABEL: &str = "Content:";

/// Writes exports in the delimited text format
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export(&self, result: &ScrapeResult, destination: &Path) -> OutputResult<()> {
        export_text(result, destination)
    }
}

/// Formats a scrape result in the text export format
pub fn format_export(result: &ScrapeResult) -> String {
    let mut text = String::new();

    for (url, posts) in result.iter() {
        text.push_str(&format!("\n{}\n", DISCUSSION_SEPARATOR));
        text.push_str(&format!("{}{}\n", URL_LABEL, url));
        text.push_str(&format!("{}\n\n", DISCUSSION_SEPARATOR));

        for post in posts {
            text.push_str(&format!("{}{}\n", TITLE_LABEL, post.title));
            text.push_str(&format!("{}{}\n", AUTHOR_LABEL, post.author));
            text.push_str(&format!("{}{}\n", DATE_LABEL, post.date));
            text.push_str(&format!("{}\n{}\n", CONTENT_LABEL, post.content));
            text.push_str(&format!("\n{}\n\n", POST_SEPARATOR));
        }
    }

    text
}

/// Writes a scrape result to `path`, replacing any existing file
///
/// # Returns
///
/// * `Ok(())` - The whole export was written
/// * `Err(OutputError::Write)` - The destination could not be created or written
pub fn export_text(result: &ScrapeResult, path: &Path) -> OutputResult<()> {
    let text = format_export(result);

    let mut file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(text.as_bytes())
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}

/// Writes a scrape result to the configured destination
///
/// Creates the output directory when missing and returns the path written.
pub fn write_export(result: &ScrapeResult, config: &OutputConfig) -> OutputResult<PathBuf> {
    let directory = config.resolved_directory();
    std::fs::create_dir_all(&directory).map_err(|source| OutputError::Write {
        path: directory.clone(),
        source,
    })?;

    let path = directory.join(&config.file_name);
    TextExporter.export(result, &path)?;
    tracing::info!("Forum content has been saved to {}", path.display());

    Ok(path)
}

/// Reads an export file back into a scrape result
pub fn read_export_file(path: &Path) -> OutputResult<ScrapeResult> {
    let text = std::fs::read_to_string(path)?;
    read_export(&text)
}

/// Parses text in the export format
///
/// Field labels must match exactly. Post content runs from the line after
/// `Content:` up to the blank line preceding the post separator.
///
/// The format has no escaping, so not every result survives the round trip.
/// A title, author or date containing a line break, or content holding a
/// line that equals [`POST_SEPARATOR`], is written as-is and reads back as
/// [`OutputError::Format`] pointing at the first line that breaks the
/// structure.
///
/// # Example
///
/// ```
/// use moodle_forum_export::model::{DiscussionUrl, Post, ScrapeResult};
/// use moodle_forum_export::output::{format_export, read_export};
///
/// let mut result = ScrapeResult::new();
/// result.insert(
///     DiscussionUrl::new("https://moodle.example.edu/mod/forum/discuss.php?d=1"),
///     vec![Post::new("Welcome", "Hello\nclass", "Ana", "2024-03-01T10:00:00Z")],
/// );
///
/// assert_eq!(read_export(&format_export(&result)).unwrap(), result);
/// ```
pub fn read_export(text: &str) -> OutputResult<ScrapeResult> {
    let mut reader = ExportReader::new(text);
    let mut result = ScrapeResult::new();

    while let Some(line) = reader.next_line() {
        if line.is_empty() {
            continue;
        }
        if line != DISCUSSION_SEPARATOR {
            return Err(reader.error("expected discussion separator"));
        }

        let url = reader.expect_field(URL_LABEL)?;
        reader.expect_line(DISCUSSION_SEPARATOR)?;

        let mut posts = Vec::new();
        reader.skip_blank_lines();
        while reader.peek_starts_with(TITLE_LABEL) {
            posts.push(reader.read_post()?);
            reader.skip_blank_lines();
        }

        result.insert(DiscussionUrl::new(url), posts);
    }

    Ok(result)
}

/// Line cursor over an export, tracking the current line number
struct ExportReader<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    line_number: usize,
}

impl<'a> ExportReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
            line_number: 0,
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let (idx, line) = self.lines.next()?;
        self.line_number = idx + 1;
        Some(line)
    }

    fn peek_starts_with(&mut self, prefix: &str) -> bool {
        matches!(self.lines.peek(), Some((_, line)) if line.starts_with(prefix))
    }

    fn skip_blank_lines(&mut self) {
        while matches!(self.lines.peek(), Some((_, line)) if line.is_empty()) {
            self.next_line();
        }
    }

    fn error(&self, message: impl Into<String>) -> OutputError {
        OutputError::Format {
            line: self.line_number,
            message: message.into(),
        }
    }

    fn expect_line(&mut self, expected: &str) -> OutputResult<()> {
        match self.next_line() {
            Some(line) if line == expected => Ok(()),
            Some(_) => Err(self.error(format!("expected {:?}", expected))),
            None => Err(self.error(format!("unexpected end of export, expected {:?}", expected))),
        }
    }

    fn expect_field(&mut self, label: &str) -> OutputResult<String> {
        match self.next_line() {
            Some(line) => match line.strip_prefix(label) {
                Some(value) => Ok(value.to_string()),
                None => Err(self.error(format!("expected field {:?}", label.trim_end()))),
            },
            None => Err(self.error(format!(
                "unexpected end of export, expected field {:?}",
                label.trim_end()
            ))),
        }
    }

    fn read_post(&mut self) -> OutputResult<Post> {
        let title = self.expect_field(TITLE_LABEL)?;
        let author = self.expect_field(AUTHOR_LABEL)?;
        let date = self.expect_field(DATE_LABEL)?;
        self.expect_line(CONTENT_LABEL)?;

        let mut content_lines = Vec::new();
        loop {
            match self.next_line() {
                Some(line) if line == POST_SEPARATOR => break,
                Some(line) => content_lines.push(line),
                None => return Err(self.error("unexpected end of export inside post content")),
            }
        }

        // blank line written between content and separator
        if content_lines.last() == Some(&"") {
            content_lines.pop();
        }

        Ok(Post::new(title, content_lines.join("\n"), author, date))
    }
}
