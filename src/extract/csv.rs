//! Quote- and escape-aware column splitting for comma separated rows.
//!
//! Rows come in two passes. `tokenize` breaks a row into alternating quoted
//! and unquoted segments, then `columns` splits only the unquoted segments on
//! the separator, so separators (or JSON) inside a quoted field are never
//! split. A quoted segment belongs to the column it sits in:
//!
//! ```text
//! 1,"a,b",2   =>  [1] [a,b] [2]
//! ```

use crate::error::ExtractError;

/// A run of characters that is either entirely inside or outside quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub quoted: bool,
}

impl Segment {
    fn new(text: impl Into<String>, quoted: bool) -> Self {
        Self {
            text: text.into(),
            quoted,
        }
    }
}

/// Column splitter for CSV-like rows with backslash escaped quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvTokenizer {
    pub separator: char,
    pub quote: char,
    pub escape: char,
}

impl Default for CsvTokenizer {
    fn default() -> Self {
        Self {
            separator: ',',
            quote: '"',
            escape: '\\',
        }
    }
}

impl CsvTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Break `row` into quoted and unquoted segments.
    ///
    /// A quote toggles the quoted state unless it is directly preceded by the
    /// escape character. Escaped quotes inside quoted segments are unescaped.
    /// Empty unquoted segments are dropped; empty quoted ones (`""`) are kept.
    pub fn tokenize(&self, row: &str) -> Result<Vec<Segment>, ExtractError> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut prev: Option<char> = None;

        for ch in row.chars() {
            if ch == self.quote && prev != Some(self.escape) {
                if in_quotes || !current.is_empty() {
                    out.push(Segment::new(std::mem::take(&mut current), in_quotes));
                }
                in_quotes = !in_quotes;
            } else {
                current.push(ch);
            }
            prev = Some(ch);
        }

        if in_quotes {
            return Err(ExtractError::UnmatchedQuote {
                row: row.to_string(),
            });
        }
        if !current.is_empty() {
            out.push(Segment::new(current, false));
        }

        let escaped_quote = format!("{}{}", self.escape, self.quote);
        let quote = self.quote.to_string();
        for seg in out.iter_mut().filter(|s| s.quoted) {
            if seg.text.contains(&escaped_quote) {
                seg.text = seg.text.replace(&escaped_quote, &quote);
            }
        }
        Ok(out)
    }

    /// Split `row` into its columns.
    pub fn columns(&self, row: &str) -> Result<Vec<String>, ExtractError> {
        let segments = self.tokenize(row)?;
        let mut columns = Vec::new();
        let mut current = String::new();

        for seg in segments {
            if seg.quoted {
                current.push_str(&seg.text);
                continue;
            }
            let mut parts = seg.text.split(self.separator);
            if let Some(first) = parts.next() {
                current.push_str(first);
            }
            for part in parts {
                columns.push(std::mem::take(&mut current));
                current.push_str(part);
            }
        }
        columns.push(current);
        Ok(columns)
    }
}
