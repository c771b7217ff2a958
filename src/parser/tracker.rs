//! Bracket tracking across a span of lines.
//!
//! [`ParenthesesTracker`] records every unmasked `(`/`)` and `{`/`}` it is
//! fed, pairs them positionally and reports whatever is left over. Matching
//! never fails: a text without brackets simply yields empty sets.

use serde::{Deserialize, Serialize};

use crate::parser::ast::{Position, Range};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::errors::ParseError;

/// Which bracket family a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketKind {
    Paren,
    Brace,
}

impl BracketKind {
    const fn open_char(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Brace => '{',
        }
    }

    const fn close_char(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Brace => '}',
        }
    }
}

/// A recorded bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketPosition {
    pub position: Position,
    pub kind: BracketKind,
}

/// An opening bracket and the closing bracket that balances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub open: Position,
    pub close: Position,
    pub kind: BracketKind,
}

/// Bracket state of a finished scan, suitable for caching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParenthesesSnapshot {
    pub matched_pairs: Vec<MatchedPair>,
    pub unmatched_open: Vec<BracketPosition>,
    pub unmatched_close: Vec<BracketPosition>,
}

impl ParenthesesSnapshot {
    /// The errors [`ParenthesesTracker::validate_at_end_of_file`] reported
    /// for the scan this snapshot was taken from.
    #[must_use]
    pub fn validate(&self) -> Vec<ParseError> {
        unmatched_errors(&self.unmatched_open, &self.unmatched_close)
    }

    /// Unmatched `(` and `)` counts, ignoring braces.
    #[must_use]
    pub fn unmatched_parens(&self) -> (usize, usize) {
        let parens = |list: &[BracketPosition]| {
            list.iter()
                .filter(|b| b.kind == BracketKind::Paren)
                .count()
        };
        (parens(&self.unmatched_open), parens(&self.unmatched_close))
    }
}

fn unmatched_errors(open: &[BracketPosition], close: &[BracketPosition]) -> Vec<ParseError> {
    let opens = open.iter().map(|b| {
        ParseError::error(
            format!("Unmatched opening '{}'", b.kind.open_char()),
            Range::char_at(b.position),
        )
    });
    let closes = close.iter().map(|b| {
        ParseError::error(
            format!("Unmatched closing '{}'", b.kind.close_char()),
            Range::char_at(b.position),
        )
    });
    let mut errors: Vec<ParseError> = opens.chain(closes).collect();
    errors.sort_by_key(|e| e.range.start);
    errors
}

/// Per-scan bracket bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct ParenthesesTracker {
    opens: Vec<BracketPosition>,
    closes: Vec<BracketPosition>,
    matched_pairs: Vec<MatchedPair>,
    unmatched_open: Vec<BracketPosition>,
    unmatched_close: Vec<BracketPosition>,
    state: ScanState,
}

impl ParenthesesTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the brackets of a whole document line.
    pub fn track_line(&mut self, line: &str, line_number: usize) {
        self.track_segment(line, Position::new(line_number, 0));
    }

    /// Record the brackets of `text` whose first character sits at `start`.
    ///
    /// Later lines of `text` start at column 0.
    pub fn track_text(&mut self, text: &str, start: Position) {
        for (offset, line) in text.split('\n').enumerate() {
            let origin = if offset == 0 {
                start
            } else {
                Position::new(start.line + offset, 0)
            };
            self.track_segment(line, origin);
        }
    }

    fn track_segment(&mut self, line: &str, origin: Position) {
        for sc in scan_line(line, &mut self.state) {
            if !sc.class.is_code() {
                continue;
            }
            let position = Position::new(origin.line, origin.character + sc.column);
            match sc.ch {
                '(' => self.opens.push(BracketPosition {
                    position,
                    kind: BracketKind::Paren,
                }),
                '{' => self.opens.push(BracketPosition {
                    position,
                    kind: BracketKind::Brace,
                }),
                ')' => self.closes.push(BracketPosition {
                    position,
                    kind: BracketKind::Paren,
                }),
                '}' => self.closes.push(BracketPosition {
                    position,
                    kind: BracketKind::Brace,
                }),
                _ => {}
            }
        }
    }

    /// Pair every close with the most recent unmatched open of its kind.
    pub fn rebuild_matched_pairs(&mut self) {
        let mut events: Vec<(BracketPosition, bool)> = self
            .opens
            .iter()
            .map(|b| (*b, true))
            .chain(self.closes.iter().map(|b| (*b, false)))
            .collect();
        events.sort_by_key(|(b, _)| b.position);

        let mut paren_stack: Vec<BracketPosition> = Vec::new();
        let mut brace_stack: Vec<BracketPosition> = Vec::new();
        self.matched_pairs.clear();
        self.unmatched_close.clear();

        for (bracket, is_open) in events {
            let stack = match bracket.kind {
                BracketKind::Paren => &mut paren_stack,
                BracketKind::Brace => &mut brace_stack,
            };
            if is_open {
                stack.push(bracket);
            } else if let Some(open) = stack.pop() {
                self.matched_pairs.push(MatchedPair {
                    open: open.position,
                    close: bracket.position,
                    kind: bracket.kind,
                });
            } else {
                self.unmatched_close.push(bracket);
            }
        }

        let mut leftover: Vec<BracketPosition> =
            paren_stack.into_iter().chain(brace_stack).collect();
        leftover.sort_by_key(|b| b.position);
        self.unmatched_open = leftover;
    }

    /// One error per unmatched bracket, each pointing at the bracket itself.
    #[must_use]
    pub fn validate_at_end_of_file(&self) -> Vec<ParseError> {
        unmatched_errors(&self.unmatched_open, &self.unmatched_close)
    }

    /// Every recorded bracket in document order.
    #[must_use]
    pub fn all_positions(&self) -> Vec<BracketPosition> {
        let mut all: Vec<BracketPosition> =
            self.opens.iter().chain(self.closes.iter()).copied().collect();
        all.sort_by_key(|b| b.position);
        all
    }

    /// Ranges of every recorded bracket in document order.
    #[must_use]
    pub fn bracket_ranges(&self) -> Vec<Range> {
        self.all_positions()
            .into_iter()
            .map(|b| Range::char_at(b.position))
            .collect()
    }

    /// Unmatched `(` minus unmatched `)` seen so far, ignoring braces.
    #[must_use]
    pub fn paren_balance(&self) -> isize {
        let count = |list: &[BracketPosition]| {
            list.iter()
                .filter(|b| b.kind == BracketKind::Paren)
                .count()
                .cast_signed()
        };
        count(&self.opens) - count(&self.closes)
    }

    #[must_use]
    pub fn matched_pairs(&self) -> &[MatchedPair] {
        &self.matched_pairs
    }

    #[must_use]
    pub fn unmatched_open(&self) -> &[BracketPosition] {
        &self.unmatched_open
    }

    #[must_use]
    pub fn unmatched_close(&self) -> &[BracketPosition] {
        &self.unmatched_close
    }

    /// Capture the matching results for reuse.
    #[must_use]
    pub fn snapshot(&self) -> ParenthesesSnapshot {
        ParenthesesSnapshot {
            matched_pairs: self.matched_pairs.clone(),
            unmatched_open: self.unmatched_open.clone(),
            unmatched_close: self.unmatched_close.clone(),
        }
    }
}

/// Ranges of every bracket in `text`, which starts at `start`.
#[must_use]
pub(crate) fn bracket_ranges(text: &str, start: Position) -> Vec<Range> {
    let mut tracker = ParenthesesTracker::new();
    tracker.track_text(text, start);
    tracker.bracket_ranges()
}
