//! Line/character positions and ranges.
//!
//! Lines are 0-based indices after splitting on `\n`; characters count
//! Unicode scalar values within the line. A range's `end` is the position just
//! past its last character.

use serde::{Deserialize, Serialize};

/// A 0-based line/character location.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A half-open span between two positions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering the single character at `position`.
    #[must_use]
    pub const fn char_at(position: Position) -> Self {
        Self {
            start: position,
            end: Position::new(position.line, position.character + 1),
        }
    }

    /// Whether any line of this range falls in `first..=last`.
    #[must_use]
    pub fn overlaps_lines(&self, first: usize, last: usize) -> bool {
        self.start.line <= last && self.end.line >= first
    }

    /// Whether `line` lies within this range.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        self.start.line <= line && line <= self.end.line
    }
}

/// Nodes whose line numbers can be moved after lines are inserted or removed
/// above them.
pub trait LineShift {
    /// Add `delta` to every line number held by the node and its children.
    fn shift_lines(&mut self, delta: isize);
}

impl LineShift for Position {
    fn shift_lines(&mut self, delta: isize) {
        self.line = self.line.saturating_add_signed(delta);
    }
}

impl LineShift for Range {
    fn shift_lines(&mut self, delta: isize) {
        self.start.shift_lines(delta);
        self.end.shift_lines(delta);
    }
}

impl<T: LineShift> LineShift for Vec<T> {
    fn shift_lines(&mut self, delta: isize) {
        for item in self {
            item.shift_lines(delta);
        }
    }
}

impl<T: LineShift> LineShift for Option<T> {
    fn shift_lines(&mut self, delta: isize) {
        if let Some(item) = self {
            item.shift_lines(delta);
        }
    }
}

/// Nodes that occupy a source range.
pub trait Ranged {
    fn range(&self) -> Range;
}

/// Map a byte `offset` within `text` to a document position, given that
/// `text` itself starts at `base`.
///
/// Offsets that do not fall on a character boundary are clamped to the end
/// of `text`.
#[must_use]
pub(crate) fn position_at(base: Position, text: &str, offset: usize) -> Position {
    let prefix = text.get(..offset).unwrap_or(text);
    match prefix.rfind('\n') {
        Some(newline) => Position::new(
            base.line + prefix.matches('\n').count(),
            prefix
                .get(newline + 1..)
                .map_or(0, |tail| tail.chars().count()),
        ),
        None => Position::new(base.line, base.character + prefix.chars().count()),
    }
}

/// Position just past the last character of `line`.
#[must_use]
pub(crate) fn end_of_line(line_number: usize, line: &str) -> Position {
    Position::new(line_number, line.chars().count())
}

/// Character column of the byte index `byte` within `line`.
#[must_use]
pub(crate) fn char_column(line: &str, byte: usize) -> usize {
    line.get(..byte).map_or(0, |prefix| prefix.chars().count())
}
