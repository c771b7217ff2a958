//! Recovery helpers.
//!
//! [`resync`] skips forward from a malformed line to the next line the
//! parsers can anchor on, looking at most a bounded number of lines ahead.
//! [`fallback`] builds the result returned when a parse had to be abandoned.

use std::any::Any;

use log::warn;

use crate::language::{is_block_boundary, statement_kind};
use crate::parser::ParseResult;
use crate::parser::ast::DroolsFile;
use crate::parser::errors::ParseFailure;
use crate::parser::statements::utils::keyword_line;

/// Where a recovery scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// A `when`, `then` or `end` line.
    Block(usize),
    /// A line starting a top-level statement.
    Statement(usize),
    /// Nothing recognisable within the lookahead; the index is the first
    /// line not inspected.
    Exhausted(usize),
}

/// Scan lines `from..` for a boundary, inspecting at most `lookahead` lines.
pub(crate) fn resync(lines: &[&str], from: usize, lookahead: usize) -> Boundary {
    for (index, line) in lines.iter().enumerate().skip(from).take(lookahead) {
        let head = keyword_line(line.trim());
        if is_block_boundary(head) {
            return Boundary::Block(index);
        }
        if statement_kind(head).is_some() {
            return Boundary::Statement(index);
        }
    }
    let stop = from.saturating_add(lookahead).min(lines.len());
    if stop < lines.len() {
        warn!(
            "no recovery point within {lookahead} lines after line {}",
            from
        );
    }
    Boundary::Exhausted(stop)
}

/// Result substituted for a parse that failed: an empty file and one
/// critical diagnostic.
#[must_use]
pub(crate) fn fallback(failure: &ParseFailure) -> ParseResult {
    ParseResult {
        ast: DroolsFile::default(),
        errors: vec![failure.to_diagnostic()],
    }
}

/// Text carried by a panic payload.
#[must_use]
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["garbage", "when"], Boundary::Block(1))]
    #[case(&["garbage", "  end // done"], Boundary::Block(1))]
    #[case(&["x", "rule \"Next\""], Boundary::Statement(1))]
    #[case(&["x", "y"], Boundary::Exhausted(2))]
    fn finds_boundaries(#[case] lines: &[&str], #[case] expected: Boundary) {
        assert_eq!(resync(lines, 0, 20), expected);
    }

    #[test]
    fn lookahead_is_bounded() {
        let lines = vec!["noise"; 50];
        assert_eq!(resync(&lines, 5, 20), Boundary::Exhausted(25));
    }

    #[test]
    fn fallback_is_empty_with_one_error() {
        let result = fallback(&ParseFailure::Panicked("boom".into()));
        assert!(result.ast.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors.first().map(|e| e.message.as_str()),
            Some("Critical parsing error: boom")
        );
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(payload.as_ref()), "static text");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
    }
}
