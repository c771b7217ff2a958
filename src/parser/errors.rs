//! Diagnostics and internal failure types.
//!
//! [`ParseError`] is data: it is collected into a [`ParseResult`] and never
//! returned as an `Err`. [`ParseFailure`] is the internal error that aborts a
//! scan; the `parse` boundary turns it into a single critical diagnostic.
//!
//! [`ParseResult`]: crate::parser::ParseResult

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::ast::Range;

/// How serious a diagnostic is. Advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// A diagnostic tied to a source range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: Range,
    pub severity: Severity,
}

impl ParseError {
    /// An `error`-severity diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            range,
            severity: Severity::Error,
        }
    }

    /// A `warning`-severity diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            range,
            severity: Severity::Warning,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity,
            self.message
        )
    }
}

/// Failures that abort a parse before a result is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// A statement parser returned without consuming its first line.
    #[error("statement scanner made no progress at line {line}")]
    Stalled { line: usize },
    /// The statement loop exceeded its iteration bound.
    #[error("statement scanner exceeded {limit} iterations")]
    IterationLimit { limit: usize },
    /// A panic escaped the scanner.
    #[error("{0}")]
    Panicked(String),
}

impl ParseFailure {
    /// The diagnostic reported in place of the failed parse.
    #[must_use]
    pub fn to_diagnostic(&self) -> ParseError {
        ParseError::error(format!("Critical parsing error: {self}"), Range::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Position;

    #[test]
    fn display_is_one_based() {
        let err = ParseError::warning(
            "deep",
            Range::new(Position::new(2, 4), Position::new(2, 5)),
        );
        assert_eq!(err.to_string(), "3:5: warning: deep");
        assert!(!err.is_error());
    }

    #[test]
    fn failures_become_critical_errors() {
        let diag = ParseFailure::Stalled { line: 7 }.to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(
            diag.message,
            "Critical parsing error: statement scanner made no progress at line 7"
        );
    }
}
