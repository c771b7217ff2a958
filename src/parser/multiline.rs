//! Multi-line pattern detection.
//!
//! [`detect_pattern`] starts at a pattern keyword and walks forward through
//! the text, counting unmasked parentheses from the first `(` after the
//! keyword until the count returns to zero. The walk is bounded by the
//! configured paren-depth cap so pathological input cannot make it run away.

use log::warn;

use crate::config::ParserConfig;
use crate::parser::ast::{PatternKeyword, Position, Range, position_at};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::token_utils::has_nested_patterns;

/// Outcome of scanning one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternScan {
    pub keyword: PatternKeyword,
    /// Text from the keyword through the closing parenthesis. A scan stopped
    /// by the depth cap ends at the parenthesis that exceeded it; any other
    /// unclosed pattern runs to the last non-blank character of the text.
    pub content: String,
    /// Position of the keyword.
    pub start: Position,
    /// Byte offset within `content` of the opening parenthesis.
    pub open: Option<usize>,
    /// Byte offset within `content` of the matching closing parenthesis.
    pub close: Option<usize>,
    /// Parenthesis depth left open when the scan stopped.
    pub unclosed: usize,
    /// The scan stopped because the paren-depth cap was exceeded.
    pub capped: bool,
}

impl PatternScan {
    /// Whether the outer parentheses balance.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.close.is_some()
    }

    /// Range from the keyword to the end of the content.
    #[must_use]
    pub fn range(&self) -> Range {
        Range::new(
            self.start,
            position_at(self.start, &self.content, self.content.len()),
        )
    }

    /// Inner text between the outer parentheses with its byte offset within
    /// `content`.
    #[must_use]
    pub fn inner(&self) -> (usize, &str) {
        let Some(open) = self.open else {
            return (self.content.len(), "");
        };
        let from = open + 1;
        let to = self.close.unwrap_or(self.content.len());
        (from, self.content.get(from..to).unwrap_or(""))
    }

    /// Whether the construct needs the multi-line treatment: it spans lines,
    /// is unbalanced or nests another pattern keyword.
    #[must_use]
    pub fn is_multi_line(&self) -> bool {
        self.content.contains('\n') || !self.is_complete() || has_nested_patterns(&self.content)
    }
}

/// Scan the pattern whose keyword starts at byte `keyword_offset` of `text`.
///
/// `text` must begin at the start of a line (or of a larger scan) located at
/// `base`, so that comment state is classified from a clean slate.
///
/// # Examples
///
/// ```rust
/// use drlparse::ParserConfig;
/// use drlparse::parser::ast::{PatternKeyword, Position};
/// use drlparse::parser::multiline::detect_pattern;
///
/// let text = "exists(\n    Person(age > 18)\n) and x";
/// let scan = detect_pattern(
///     text,
///     Position::new(4, 4),
///     0,
///     PatternKeyword::Exists,
///     &ParserConfig::default(),
/// );
/// assert!(scan.is_complete());
/// assert_eq!(scan.range().end, Position::new(6, 1));
/// ```
#[must_use]
pub fn detect_pattern(
    text: &str,
    base: Position,
    keyword_offset: usize,
    keyword: PatternKeyword,
    config: &ParserConfig,
) -> PatternScan {
    let body_start = keyword_offset + keyword.as_str().len();
    let mut state = ScanState::default();
    let mut depth = 0usize;
    let mut open = None;
    let mut close = None;
    let mut capped_at = None;
    let mut line_start = 0usize;

    'lines: for line in text.split('\n') {
        for sc in scan_line(line, &mut state) {
            let at = line_start + sc.byte;
            if at < body_start || !sc.class.is_code() {
                continue;
            }
            match sc.ch {
                '(' => {
                    open.get_or_insert(at);
                    depth += 1;
                    if depth > config.max_paren_depth {
                        warn!(
                            "'{keyword}' pattern exceeds parenthesis depth {}; scan stopped",
                            config.max_paren_depth
                        );
                        capped_at = Some(at);
                        break 'lines;
                    }
                }
                ')' if open.is_some() => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(at);
                        break 'lines;
                    }
                }
                _ => {}
            }
        }
        line_start += line.len() + 1;
    }

    let end = match close.or(capped_at) {
        Some(at) => at + 1,
        None => keyword_offset + text.get(keyword_offset..).map_or(0, |t| t.trim_end().len()),
    };
    let content = text.get(keyword_offset..end).unwrap_or("").to_string();
    let start = position_at(base, text, keyword_offset);
    PatternScan {
        keyword,
        content,
        start,
        open: open.map(|at| at - keyword_offset),
        close: close.map(|at| at - keyword_offset),
        unclosed: if close.is_some() { 0 } else { depth },
        capped: capped_at.is_some(),
    }
}
