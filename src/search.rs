//! "Find all" over a document's text
//!
//! Produces the char-offset spans that feed the find-results sidebar.

use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    /// Reject matches touching a word character on either side
    pub whole_word: bool,
    /// Treat the query as a regular expression instead of literal text
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

#[derive(Debug)]
pub enum SearchError {
    InvalidRegex(regex::Error),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegex(e) => write!(f, "invalid regex: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

fn build_regex(query: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
        .map_err(SearchError::InvalidRegex)
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// All non-empty matches of `query` in `text` as `[start, end)` char offsets
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<(usize, usize)>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let re = build_regex(query, options)?;

    let mut spans = Vec::new();
    // Matches arrive in byte order, so char offsets can be counted incrementally
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for m in re.find_iter(text) {
        if m.is_empty() {
            continue;
        }
        if options.whole_word {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                continue;
            }
        }

        char_cursor += text[byte_cursor..m.start()].chars().count();
        let start = char_cursor;
        let end = start + m.as_str().chars().count();
        byte_cursor = m.end();
        char_cursor = end;
        spans.push((start, end));
    }

    tracing::debug!(query, count = spans.len(), "find all");
    Ok(spans)
}
