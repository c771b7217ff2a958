//! Line-oriented DRL parser.
//!
//! This module contains the entry points for parsing DRL source text. The
//! document is split into lines and walked by the statement [`scanner`],
//! which recognises top-level statements by their leading keyword and hands
//! each one to its parser in [`statements`]. Conditions inside `when` blocks
//! and query bodies are cut into chunks and classified; chunks holding
//! `exists`, `not`, `eval`, `forall`, `collect` or `accumulate` are scanned by
//! the [`multiline`] detector and decomposed by [`nested`].
//!
//! Parsing never fails from the caller's point of view. Structural problems
//! become [`ParseError`] entries next to a best-effort AST, and any internal
//! failure (including a panic) is turned into a single critical diagnostic
//! alongside an empty [`DroolsFile`].

use std::panic::{AssertUnwindSafe, catch_unwind};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;

pub mod ast;
pub mod classifier;
pub mod conditions;
pub mod constraints;
mod diagnostics;
pub mod errors;
pub mod incremental;
pub mod line_stream;
pub mod multiline;
pub mod nested;
mod recovery;
mod regexes;
mod scanner;
mod statements;
mod token_utils;
pub mod tracker;

use ast::{DroolsFile, Position, Range, end_of_line};
use errors::{ParseError, ParseFailure};
use incremental::IncrementalOptions;
use line_stream::split_lines;
use scanner::{ScanContext, scan_lines};

/// Result of a parse operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub ast: DroolsFile,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// The first `max` diagnostics, for consumers that cap what they show.
    #[must_use]
    pub fn capped_errors(&self, max: usize) -> &[ParseError] {
        self.errors.get(..max).unwrap_or(&self.errors)
    }

    /// Whether any `error`-severity diagnostic was produced.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ParseError::is_error)
    }
}

/// Range spanning every line of the document.
pub(crate) fn document_range(lines: &[&str]) -> Range {
    let last = lines.len().saturating_sub(1);
    Range::new(
        Position::default(),
        end_of_line(last, lines.get(last).copied().unwrap_or("")),
    )
}

/// Scan every line of the document.
pub(crate) fn scan_document(
    lines: &[&str],
    ctx: &ScanContext<'_>,
) -> Result<DroolsFile, ParseFailure> {
    let mut file = scan_lines(lines, 0, lines.len(), ctx)?.file;
    file.range = document_range(lines);
    Ok(file)
}

fn parse_full(src: &str, config: &ParserConfig) -> Result<ParseResult, ParseFailure> {
    let lines = split_lines(src);
    let ctx = ScanContext::new(config);
    let ast = scan_document(&lines, &ctx)?;
    let brackets = diagnostics::document_brackets(&lines);
    let errors = diagnostics::collect(&ast, &brackets, config);
    Ok(ParseResult { ast, errors })
}

/// Run `parse`, converting failures and panics into the fallback result.
fn guarded(parse: impl FnOnce() -> Result<ParseResult, ParseFailure>) -> ParseResult {
    let failure = match catch_unwind(AssertUnwindSafe(parse)) {
        Ok(Ok(result)) => return result,
        Ok(Err(failure)) => failure,
        Err(payload) => ParseFailure::Panicked(recovery::panic_message(payload.as_ref())),
    };
    warn!("parse abandoned: {failure}");
    recovery::fallback(&failure)
}

/// Parse DRL source text with the default limits.
///
/// # Examples
///
/// ```rust
/// use drlparse::parse;
///
/// let result = parse("rule \"Simple\"\nwhen\n    $p : Person(age > 18)\nthen\nend");
/// let rule = &result.ast.rules[0];
/// assert_eq!(rule.name, "Simple");
/// assert_eq!(rule.conditions()[0].fact_type.as_deref(), Some("Person"));
/// assert!(result.errors.is_empty());
/// ```
#[must_use]
pub fn parse(src: &str) -> ParseResult {
    parse_with_config(src, &ParserConfig::default())
}

/// Parse DRL source text with explicit limits.
#[must_use]
pub fn parse_with_config(src: &str, config: &ParserConfig) -> ParseResult {
    guarded(|| parse_full(src, config))
}

/// Re-parse `src` after an edit, reusing the previous AST outside the
/// edited region.
///
/// The result equals what [`parse_with_config`] returns for `src`. An empty
/// change list is a full parse.
#[must_use]
pub fn parse_incremental(
    src: &str,
    options: &IncrementalOptions<'_>,
    config: &ParserConfig,
) -> ParseResult {
    guarded(|| {
        if options.changes.is_empty() {
            return parse_full(src, config);
        }
        let lines = split_lines(src);
        incremental::reparse(src, &lines, options, config)
    })
}

#[cfg(test)]
mod tests;
