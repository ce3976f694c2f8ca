//! Splitting raw transport text into header lines and content.
//!
//! This is not a general HTTP parser. The raw text is trimmed, split on CRLF,
//! and only when that gives more than three lines is it scanned: lines before
//! the first empty line are headers, every line after it is content with a
//! `\n` appended. Shorter responses leave both parts empty.

use crate::http::Response;

/// Below this many lines nothing is parsed.
const MIN_PARSED_LINES: usize = 4;

/// Strip trailing spaces, tabs, newlines, carriage returns, NULs and
/// vertical tabs.
pub fn trim_raw(raw: &str) -> &str {
    raw.trim_end_matches([' ', '\t', '\n', '\r', '\0', '\x0B'])
}

/// Split already-trimmed raw text into `(headers, content)`.
pub fn parse_lines(raw: &str) -> (Vec<String>, String) {
    let lines: Vec<&str> = raw.split("\r\n").collect();
    let mut headers = Vec::new();
    let mut content = String::new();
    if lines.len() < MIN_PARSED_LINES {
        return (headers, content);
    }

    let mut in_body = false;
    for line in lines {
        if in_body {
            content.push_str(line);
            content.push('\n');
        } else if line.is_empty() {
            in_body = true;
        } else {
            headers.push(line.to_string());
        }
    }
    (headers, content)
}

impl Response {
    /// Build a response from the transport's raw text and error string.
    pub fn from_raw(raw: &str, error: impl Into<String>) -> Self {
        let raw = trim_raw(raw);
        let (headers, content) = parse_lines(raw);
        Response {
            raw: raw.to_string(),
            headers,
            content,
            error: error.into(),
        }
    }
}
