//! Incremental re-parsing and the pattern cache.
//!
//! The controller turns the edited byte ranges into one line region of the
//! new text, widens it to whole top-level statements and re-scans only that
//! region. The result is spliced into a copy of the previous AST: nodes
//! above the region are kept, nodes below it are shifted by the change in
//! line count. Whenever the previous AST or the comment state makes that
//! unsafe, the controller falls back to a full parse.
//!
//! Pattern nodes built while scanning are stored in a [`PatternCache`] keyed
//! by document, version and line span, and reused when the keyword and text
//! of a pattern still match.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use log::{debug, warn};
use thiserror::Error;

use crate::config::ParserConfig;
use crate::language::statement_kind;
use crate::parser::ast::{
    DroolsFile, LineShift, MultiLinePatternNode, PatternKeyword, Range, Ranged,
};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::diagnostics;
use crate::parser::errors::ParseFailure;
use crate::parser::multiline::PatternScan;
use crate::parser::scanner::{ScanContext, scan_lines};
use crate::parser::tracker::ParenthesesSnapshot;
use crate::parser::{ParseResult, document_range, scan_document};
use crate::tokenizer::Span;

/// Identifies one version of one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub uri: String,
    pub version: i32,
}

impl DocumentKey {
    #[must_use]
    pub fn new(uri: impl Into<String>, version: i32) -> Self {
        Self {
            uri: uri.into(),
            version,
        }
    }
}

/// Inclusive range of document lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl From<Range> for LineSpan {
    fn from(range: Range) -> Self {
        Self {
            start: range.start.line,
            end: range.end.line,
        }
    }
}

/// A cached top-level pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMetadata {
    pub keyword: PatternKeyword,
    /// Fingerprint of the pattern text and the limits it was built with.
    pub content_hash: u64,
    pub node: MultiLinePatternNode,
}

/// Cached bracket state of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenthesesMetadata {
    pub text_hash: u64,
    pub snapshot: ParenthesesSnapshot,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    #[error("pattern cache lock poisoned")]
    Poisoned,
}

/// Storage for pattern and bracket metadata shared between parses.
///
/// Implementations must tolerate concurrent use for different documents.
pub trait PatternCache: Send + Sync {
    fn get_multi_line_patterns(
        &self,
        key: &DocumentKey,
        span: LineSpan,
    ) -> Result<Option<PatternMetadata>, CacheError>;

    fn cache_multi_line_patterns(
        &self,
        key: &DocumentKey,
        span: LineSpan,
        metadata: PatternMetadata,
    ) -> Result<(), CacheError>;

    fn get_parentheses(
        &self,
        key: &DocumentKey,
        span: LineSpan,
    ) -> Result<Option<ParenthesesMetadata>, CacheError>;

    fn cache_parentheses(
        &self,
        key: &DocumentKey,
        span: LineSpan,
        metadata: ParenthesesMetadata,
    ) -> Result<(), CacheError>;
}

type Entries<T> = RwLock<HashMap<(DocumentKey, LineSpan), T>>;

/// [`PatternCache`] backed by two locked hash maps.
#[derive(Debug, Default)]
pub struct InMemoryPatternCache {
    patterns: Entries<PatternMetadata>,
    parentheses: Entries<ParenthesesMetadata>,
}

impl InMemoryPatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry of every version of `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] if a writer panicked while holding a
    /// lock.
    pub fn evict_document(&self, uri: &str) -> Result<(), CacheError> {
        self.patterns
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .retain(|(key, _), _| key.uri != uri);
        self.parentheses
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .retain(|(key, _), _| key.uri != uri);
        Ok(())
    }

    /// Number of cached patterns.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] if a writer panicked while holding a
    /// lock.
    pub fn pattern_count(&self) -> Result<usize, CacheError> {
        Ok(self.patterns.read().map_err(|_| CacheError::Poisoned)?.len())
    }
}

fn read_entry<T: Clone>(
    entries: &Entries<T>,
    key: &DocumentKey,
    span: LineSpan,
) -> Result<Option<T>, CacheError> {
    let map = entries.read().map_err(|_| CacheError::Poisoned)?;
    Ok(map.get(&(key.clone(), span)).cloned())
}

fn write_entry<T>(
    entries: &Entries<T>,
    key: &DocumentKey,
    span: LineSpan,
    value: T,
) -> Result<(), CacheError> {
    entries
        .write()
        .map_err(|_| CacheError::Poisoned)?
        .insert((key.clone(), span), value);
    Ok(())
}

impl PatternCache for InMemoryPatternCache {
    fn get_multi_line_patterns(
        &self,
        key: &DocumentKey,
        span: LineSpan,
    ) -> Result<Option<PatternMetadata>, CacheError> {
        read_entry(&self.patterns, key, span)
    }

    fn cache_multi_line_patterns(
        &self,
        key: &DocumentKey,
        span: LineSpan,
        metadata: PatternMetadata,
    ) -> Result<(), CacheError> {
        write_entry(&self.patterns, key, span, metadata)
    }

    fn get_parentheses(
        &self,
        key: &DocumentKey,
        span: LineSpan,
    ) -> Result<Option<ParenthesesMetadata>, CacheError> {
        read_entry(&self.parentheses, key, span)
    }

    fn cache_parentheses(
        &self,
        key: &DocumentKey,
        span: LineSpan,
        metadata: ParenthesesMetadata,
    ) -> Result<(), CacheError> {
        write_entry(&self.parentheses, key, span, metadata)
    }
}

/// A cache together with the document version it is consulted for.
#[derive(Clone, Copy)]
pub struct CacheHandle<'a> {
    pub cache: &'a dyn PatternCache,
    pub key: &'a DocumentKey,
}

/// Inputs of an incremental parse.
#[derive(Clone, Copy)]
pub struct IncrementalOptions<'a> {
    /// Edited byte ranges, in coordinates of the new text.
    pub changes: &'a [Span],
    /// AST of the text before the edit.
    pub previous: &'a DroolsFile,
    pub cache: Option<CacheHandle<'a>>,
}

fn fingerprint(content: &str, config: &ParserConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    config.max_nesting_depth.hash(&mut hasher);
    config.max_paren_depth.hash(&mut hasher);
    hasher.finish()
}

fn text_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Cache access used while scanning. Cache failures are logged and treated
/// as misses.
#[derive(Clone, Copy)]
pub(crate) struct PatternReuse<'a> {
    handle: CacheHandle<'a>,
}

impl<'a> PatternReuse<'a> {
    pub(crate) fn new(handle: CacheHandle<'a>) -> Self {
        Self { handle }
    }

    pub(crate) fn lookup(
        &self,
        scan: &PatternScan,
        config: &ParserConfig,
    ) -> Option<MultiLinePatternNode> {
        let span = LineSpan::from(scan.range());
        match self.handle.cache.get_multi_line_patterns(self.handle.key, span) {
            Ok(Some(meta))
                if meta.keyword == scan.keyword
                    && meta.content_hash == fingerprint(&scan.content, config)
                    && meta.node.range.start == scan.start =>
            {
                Some(meta.node)
            }
            Ok(_) => None,
            Err(err) => {
                warn!("{err}; rebuilding pattern at line {}", scan.start.line + 1);
                None
            }
        }
    }

    pub(crate) fn store(&self, node: &MultiLinePatternNode, config: &ParserConfig) {
        let metadata = PatternMetadata {
            keyword: node.keyword,
            content_hash: fingerprint(&node.content, config),
            node: node.clone(),
        };
        if let Err(err) = self.handle.cache.cache_multi_line_patterns(
            self.handle.key,
            LineSpan::from(node.range),
            metadata,
        ) {
            warn!("{err}; pattern at line {} not cached", node.range.start.line + 1);
        }
    }
}

/// Store the top-level patterns of `ast` under `key`.
///
/// # Errors
///
/// Returns the first cache failure.
pub fn seed_cache(
    cache: &dyn PatternCache,
    key: &DocumentKey,
    ast: &DroolsFile,
    config: &ParserConfig,
) -> Result<(), CacheError> {
    for node in ast.multi_line_patterns() {
        cache.cache_multi_line_patterns(
            key,
            LineSpan::from(node.range),
            PatternMetadata {
                keyword: node.keyword,
                content_hash: fingerprint(&node.content, config),
                node: node.clone(),
            },
        )?;
    }
    Ok(())
}

/// Line region to re-scan. `start..=end` in the new text corresponds to
/// `start..old_stop` in the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    start: usize,
    end: usize,
    old_stop: usize,
    delta: isize,
}

fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()
        .get(..offset.min(text.len()))
        .map_or(0, |prefix| prefix.iter().filter(|&&b| b == b'\n').count())
}

fn is_statement_line(line: &str) -> bool {
    statement_kind(line.trim()).is_some()
}

fn plan_region(text: &str, lines: &[&str], changes: &[Span], previous: &DroolsFile) -> Option<Region> {
    let first = changes.iter().map(|c| line_of(text, c.start)).min()?;
    let last = changes
        .iter()
        .map(|c| line_of(text, c.end.max(c.start)))
        .max()?;
    let last_line = lines.len().saturating_sub(1);

    let start = (0..=first.min(last_line))
        .rev()
        .find(|&i| lines.get(i).is_some_and(|l| is_statement_line(l)))
        .unwrap_or(0);
    let end = (last.min(last_line) + 1..lines.len())
        .find(|&i| lines.get(i).is_some_and(|l| is_statement_line(l)))
        .map_or(last_line, |next| next - 1);

    let delta = lines.len().cast_signed() - previous.line_count().cast_signed();
    let old_stop = (end + 1).checked_add_signed(-delta)?;
    if old_stop < start || old_stop > previous.line_count() {
        return None;
    }
    Some(Region {
        start,
        end,
        old_stop,
        delta,
    })
}

fn top_level_ranges(file: &DroolsFile) -> Vec<Range> {
    file.package
        .iter()
        .map(Ranged::range)
        .chain(file.imports.iter().map(Ranged::range))
        .chain(file.globals.iter().map(Ranged::range))
        .chain(file.functions.iter().map(Ranged::range))
        .chain(file.rules.iter().map(Ranged::range))
        .chain(file.queries.iter().map(Ranged::range))
        .chain(file.declares.iter().map(Ranged::range))
        .collect()
}

/// Whether the previous AST can be cut at the region boundaries.
fn previous_is_separable(previous: &DroolsFile, region: &Region, lookahead: usize) -> bool {
    let crosses = |line: usize| {
        top_level_ranges(previous)
            .iter()
            .any(|r| r.start.line < line && r.end.line >= line)
    };
    if crosses(region.start) || crosses(region.old_stop) {
        return false;
    }
    // A function header still looking for its `{` may reach into the region.
    !previous.functions.iter().any(|f| {
        f.body.is_empty()
            && f.range.end.line < region.start
            && f.range.end.line + lookahead >= region.start
    })
}

/// Whether the comment state is clean on both sides of the region.
fn comments_are_local(lines: &[&str], region: &Region) -> bool {
    let mut state = ScanState::default();
    for line in lines.iter().take(region.start) {
        let _ = scan_line(line, &mut state);
    }
    if state.in_block_comment() {
        return false;
    }
    for line in lines.iter().take(region.end + 1).skip(region.start) {
        let _ = scan_line(line, &mut state);
    }
    if state.in_block_comment() {
        return false;
    }
    // A `*/` below the region with no opener means an opener was removed.
    for line in lines.iter().skip(region.end + 1) {
        let scanned = scan_line(line, &mut state);
        let stray = scanned
            .windows(2)
            .any(|pair| matches!(pair, [a, b] if a.ch == '*' && b.ch == '/' && a.class.is_code()));
        if stray {
            return false;
        }
    }
    true
}

/// Whether every statement the top-level scan would meet below the region
/// is one the previous AST already holds, shifted by the line delta.
///
/// Catches edits that remove an unterminated `/*`: the text it hid is live
/// again but the previous AST has no nodes for it.
fn tail_matches_previous(lines: &[&str], region: &Region, previous: &DroolsFile) -> bool {
    let shifted: Vec<(usize, usize)> = top_level_ranges(previous)
        .iter()
        .filter(|r| r.start.line >= region.old_stop)
        .filter_map(|r| {
            Some((
                r.start.line.checked_add_signed(region.delta)?,
                r.end.line.checked_add_signed(region.delta)?,
            ))
        })
        .collect();
    let mut state = ScanState::default();
    let mut index = region.end + 1;
    while let Some(line) = lines.get(index) {
        if state.in_block_comment() || line.trim().starts_with("/*") {
            let _ = scan_line(line, &mut state);
        } else if is_statement_line(line) {
            let Some(&(_, end)) = shifted.iter().find(|&&(start, _)| start == index) else {
                return false;
            };
            index = index.max(end);
        }
        index += 1;
    }
    true
}

fn splice_nodes<T: Ranged + LineShift>(previous: &[T], fresh: Vec<T>, region: &Region) -> Vec<T>
where
    T: Clone,
{
    let mut before: Vec<T> = previous
        .iter()
        .filter(|node| node.range().end.line < region.start)
        .cloned()
        .collect();
    let after = previous
        .iter()
        .filter(|node| node.range().start.line >= region.old_stop)
        .cloned()
        .map(|mut node| {
            node.shift_lines(region.delta);
            node
        });
    before.extend(fresh);
    before.extend(after);
    before
}

/// Re-scan `region` and splice it into a copy of `previous`. `None` means
/// the region was not self-contained.
fn splice(
    lines: &[&str],
    region: &Region,
    previous: &DroolsFile,
    ctx: &ScanContext<'_>,
) -> Result<Option<DroolsFile>, ParseFailure> {
    let outcome = scan_lines(lines, region.start, region.end, ctx)?;
    if outcome.last_consumed.is_some_and(|line| line > region.end) {
        return Ok(None);
    }
    let fresh = outcome.file;
    let previous_package: Vec<_> = previous.package.iter().cloned().collect();
    let fresh_package: Vec<_> = fresh.package.into_iter().collect();
    let package = splice_nodes(&previous_package, fresh_package, region)
        .into_iter()
        .next();
    Ok(Some(DroolsFile {
        package,
        imports: splice_nodes(&previous.imports, fresh.imports, region),
        globals: splice_nodes(&previous.globals, fresh.globals, region),
        functions: splice_nodes(&previous.functions, fresh.functions, region),
        rules: splice_nodes(&previous.rules, fresh.rules, region),
        queries: splice_nodes(&previous.queries, fresh.queries, region),
        declares: splice_nodes(&previous.declares, fresh.declares, region),
        range: document_range(lines),
    }))
}

fn document_brackets(
    text: &str,
    lines: &[&str],
    handle: Option<CacheHandle<'_>>,
) -> ParenthesesSnapshot {
    let Some(handle) = handle else {
        return diagnostics::document_brackets(lines);
    };
    let span = LineSpan {
        start: 0,
        end: lines.len().saturating_sub(1),
    };
    let hash = text_hash(text);
    match handle.cache.get_parentheses(handle.key, span) {
        Ok(Some(meta)) if meta.text_hash == hash => return meta.snapshot,
        Ok(_) => {}
        Err(err) => warn!("{err}; recomputing brackets"),
    }
    let snapshot = diagnostics::document_brackets(lines);
    let metadata = ParenthesesMetadata {
        text_hash: hash,
        snapshot: snapshot.clone(),
    };
    if let Err(err) = handle.cache.cache_parentheses(handle.key, span, metadata) {
        warn!("{err}; brackets not cached");
    }
    snapshot
}

/// Parse `text` reusing `options.previous` outside the edited region.
pub(crate) fn reparse(
    text: &str,
    lines: &[&str],
    options: &IncrementalOptions<'_>,
    config: &ParserConfig,
) -> Result<ParseResult, ParseFailure> {
    let ctx = options.cache.map_or_else(
        || ScanContext::new(config),
        |handle| ScanContext::with_reuse(config, PatternReuse::new(handle)),
    );

    let region = plan_region(text, lines, options.changes, options.previous).filter(|region| {
        previous_is_separable(options.previous, region, config.max_resync_lookahead)
            && comments_are_local(lines, region)
            && tail_matches_previous(lines, region, options.previous)
    });
    let spliced = region
        .as_ref()
        .map(|region| splice(lines, region, options.previous, &ctx))
        .transpose()?
        .flatten();
    let ast = match (spliced, region) {
        (Some(ast), Some(region)) => {
            debug!(
                "incremental parse of lines {}..={} (shift {})",
                region.start + 1,
                region.end + 1,
                region.delta
            );
            ast
        }
        _ => {
            debug!("incremental parse fell back to a full parse");
            scan_document(lines, &ctx)?
        }
    };

    let brackets = document_brackets(text, lines, options.cache);
    let errors = diagnostics::collect(&ast, &brackets, config);
    Ok(ParseResult { ast, errors })
}
