//! Interactive collection of the session token and forum URLs

use crate::url::parse_forum_url;
use std::io::{self, BufRead, Write};
use url::Url;

const FORUM_URL_PROMPT: &str = "Enter the Moodle forum URL (or press Enter to finish): ";

/// Asks for the session cookie value
///
/// Returns None when the operator enters nothing or input is closed.
pub fn prompt_session_token<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    cookie_name: &str,
) -> io::Result<Option<String>> {
    let prompt = format!("Enter your {} cookie value: ", cookie_name);
    let token = prompt_line(input, output, &prompt)?;
    Ok(token.filter(|t| !t.is_empty()))
}

/// Asks for forum URLs until an empty line or end of input
///
/// Entries that are not absolute `http(s)` URLs are logged and the prompt
/// repeats.
pub fn collect_forum_urls<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Vec<Url>> {
    let mut urls = Vec::new();

    while let Some(line) = prompt_line(input, output, FORUM_URL_PROMPT)? {
        if line.is_empty() {
            break;
        }

        match parse_forum_url(&line) {
            Ok(url) => urls.push(url),
            Err(e) => tracing::error!(
                "Invalid URL {:?} ({}). Please enter a complete URL starting with http:// or https://",
                line,
                e
            ),
        }
    }

    Ok(urls)
}

/// Validates forum URLs given on the command line, skipping invalid ones
pub fn parse_forum_args(args: &[String]) -> Vec<Url> {
    args.iter()
        .filter_map(|arg| match parse_forum_url(arg) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Skipping invalid forum URL {:?}: {}", arg, e);
                None
            }
        })
        .collect()
}

/// Writes a prompt and reads one trimmed line; None at end of input
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}
