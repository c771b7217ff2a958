//! Line cursor used by the statement scanner.
//!
//! Provides a cursor-based wrapper around the document's lines so the
//! statement parsers can share one explicit position instead of keeping
//! their own indices.
//!
//! ```
//! use drlparse::parser::line_stream::{LineStream, split_lines};
//!
//! let lines = split_lines("rule \"R\"\r\nwhen\nthen\nend");
//! let mut stream = LineStream::new(&lines);
//! assert_eq!(stream.peek(), Some("rule \"R\""));
//! stream.advance();
//! assert_eq!(stream.peek_trimmed(), Some("when"));
//! ```

/// Split `text` into lines on `\n`, dropping one trailing `\r` per line.
///
/// The result always has at least one entry, so an empty document still
/// has a line 0.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Cursor over a slice of lines.
#[derive(Debug, Clone)]
pub struct LineStream<'a> {
    lines: &'a [&'a str],
    cursor: usize,
}

impl<'a> LineStream<'a> {
    /// Constructs a stream with the cursor on the first line.
    #[must_use]
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, cursor: 0 }
    }

    /// Constructs a stream with the cursor on line `cursor`.
    #[must_use]
    pub fn starting_at(lines: &'a [&'a str], cursor: usize) -> Self {
        Self {
            lines,
            cursor: cursor.min(lines.len()),
        }
    }

    /// Index of the line under the cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The line under the cursor, if any remain.
    #[must_use]
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.cursor).copied()
    }

    /// The line under the cursor with surrounding whitespace removed.
    #[must_use]
    pub fn peek_trimmed(&self) -> Option<&'a str> {
        self.peek().map(str::trim)
    }

    /// Moves the cursor forward by one line unless already at the end.
    pub fn advance(&mut self) {
        if self.cursor < self.lines.len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to `index`, clamped to the end of the stream.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.lines.len());
    }

    /// Line `index` of the underlying document.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    /// Every line of the document.
    #[must_use]
    pub fn lines(&self) -> &'a [&'a str] {
        self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the cursor has moved past the last line.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// Index of the last line.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}
