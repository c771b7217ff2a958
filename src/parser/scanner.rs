//! Top-level statement scanner.
//!
//! Walks the document line by line and hands each recognised statement to
//! its parser in [`statements`](super::statements). Every statement parser
//! advances the shared [`LineStream`]; lines that start no statement are
//! skipped without a diagnostic, as are top-level comments.

use log::debug;

use crate::config::ParserConfig;
use crate::language::{StatementKind, statement_kind};
use crate::parser::ast::{DroolsFile, MultiLinePatternNode};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::errors::ParseFailure;
use crate::parser::incremental::PatternReuse;
use crate::parser::line_stream::LineStream;
use crate::parser::multiline::PatternScan;
use crate::parser::nested::build_pattern_node;
use crate::parser::statements;

/// Settings and collaborators shared by every statement parser of one scan.
pub(crate) struct ScanContext<'a> {
    pub(crate) config: &'a ParserConfig,
    pub(crate) reuse: Option<PatternReuse<'a>>,
}

impl<'a> ScanContext<'a> {
    pub(crate) fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            reuse: None,
        }
    }

    pub(crate) fn with_reuse(config: &'a ParserConfig, reuse: PatternReuse<'a>) -> Self {
        Self {
            config,
            reuse: Some(reuse),
        }
    }

    /// The node for a top-level pattern, from the cache when it still
    /// matches the text.
    pub(crate) fn resolve_pattern(&self, scan: &PatternScan) -> MultiLinePatternNode {
        if let Some(reuse) = &self.reuse
            && let Some(node) = reuse.lookup(scan, self.config)
        {
            return node;
        }
        let node = build_pattern_node(scan, 0, self.config);
        if let Some(reuse) = &self.reuse {
            reuse.store(&node, self.config);
        }
        node
    }
}

/// Statements found by one scan.
#[derive(Debug, Default)]
pub(crate) struct ScanOutcome {
    pub(crate) file: DroolsFile,
    /// Last line consumed by any statement parser.
    pub(crate) last_consumed: Option<usize>,
}

/// Scan statements starting on lines `from..=to` of `lines`.
///
/// Statement parsers may read past `to`; the caller can detect that through
/// [`ScanOutcome::last_consumed`].
pub(crate) fn scan_lines(
    lines: &[&str],
    from: usize,
    to: usize,
    ctx: &ScanContext<'_>,
) -> Result<ScanOutcome, ParseFailure> {
    let mut stream = LineStream::starting_at(lines, from);
    let mut outcome = ScanOutcome::default();
    let mut comment_state = ScanState::default();
    let limit = lines.len() + 1;
    let mut iterations = 0usize;

    while let Some(line) = stream.peek() {
        if stream.cursor() > to {
            break;
        }
        iterations += 1;
        if iterations > limit {
            return Err(ParseFailure::IterationLimit { limit });
        }

        let trimmed = line.trim();
        if comment_state.in_block_comment() || trimmed.starts_with("/*") {
            let _ = scan_line(line, &mut comment_state);
            stream.advance();
            continue;
        }
        let Some(kind) = statement_kind(trimmed) else {
            stream.advance();
            continue;
        };

        let start = stream.cursor();
        debug!("{kind:?} statement at line {}", start + 1);
        dispatch(kind, &mut stream, ctx, &mut outcome.file);
        if stream.cursor() <= start {
            return Err(ParseFailure::Stalled { line: start + 1 });
        }
        let consumed = stream.cursor() - 1;
        outcome.last_consumed = Some(outcome.last_consumed.map_or(consumed, |c| c.max(consumed)));
    }
    Ok(outcome)
}

fn dispatch(
    kind: StatementKind,
    stream: &mut LineStream<'_>,
    ctx: &ScanContext<'_>,
    file: &mut DroolsFile,
) {
    match kind {
        StatementKind::Package => {
            if let Some(package) = statements::parse_package(stream)
                && file.package.is_none()
            {
                file.package = Some(package);
            }
        }
        StatementKind::Import => file.imports.extend(statements::parse_import(stream)),
        StatementKind::Global => file.globals.extend(statements::parse_global(stream)),
        StatementKind::Function => file
            .functions
            .extend(statements::parse_function(stream, ctx.config)),
        StatementKind::Rule => file.rules.push(statements::parse_rule(stream, ctx)),
        StatementKind::Query => file.queries.push(statements::parse_query(stream, ctx)),
        StatementKind::Declare => file.declares.push(statements::parse_declare(stream)),
    }
}
