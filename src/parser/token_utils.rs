//! Token-level helpers shared by the pattern detector and splitters.
//!
//! Working on tokens rather than characters means string literals and
//! comments arrive as single opaque tokens, so none of these helpers can be
//! fooled by brackets or keywords inside them.

use crate::parser::ast::{ConditionType, PatternKeyword};
use crate::{Span, SyntaxKind, tokenize_with_trivia};

/// Index of the next non-trivia token at or after `index`.
fn next_significant(tokens: &[(SyntaxKind, Span)], index: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(index)
        .find(|(_, (kind, _))| !kind.is_trivia())
        .map(|(i, _)| i)
}

/// Every pattern keyword in `text` that is followed by `(`, with its byte
/// offset, in document order.
#[must_use]
pub(crate) fn pattern_keyword_hits(text: &str) -> Vec<(usize, PatternKeyword)> {
    let tokens = tokenize_with_trivia(text);
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, (kind, span))| {
            let keyword = kind.pattern_keyword()?;
            let next = next_significant(&tokens, i + 1)?;
            let (next_kind, _) = tokens.get(next)?;
            (*next_kind == SyntaxKind::T_LPAREN).then_some((span.start, keyword))
        })
        .collect()
}

/// The first pattern keyword followed by `(` in `text`.
#[must_use]
pub(crate) fn find_pattern_keyword(text: &str) -> Option<(usize, PatternKeyword)> {
    pattern_keyword_hits(text).into_iter().next()
}

/// Whether `content` holds a pattern keyword other than the one at offset 0.
#[must_use]
pub(crate) fn has_nested_patterns(content: &str) -> bool {
    pattern_keyword_hits(content)
        .iter()
        .any(|&(offset, _)| offset > 0)
}

/// The pattern keyword spelled by the first significant token of `text`.
#[must_use]
pub(crate) fn leading_keyword(text: &str) -> Option<(PatternKeyword, Span)> {
    let tokens = tokenize_with_trivia(text);
    let first = next_significant(&tokens, 0)?;
    let (kind, span) = tokens.get(first)?;
    kind.pattern_keyword().map(|kw| (kw, span.clone()))
}

/// `accumulate` or `collect` when `text` contains `from accumulate(` or
/// `from collect(`.
#[must_use]
pub(crate) fn from_source_keyword(text: &str) -> Option<PatternKeyword> {
    let significant: Vec<SyntaxKind> = tokenize_with_trivia(text)
        .into_iter()
        .map(|(kind, _)| kind)
        .filter(|kind| !kind.is_trivia())
        .collect();
    significant.windows(3).find_map(|window| match window {
        [SyntaxKind::K_FROM, kind, SyntaxKind::T_LPAREN] => match kind {
            SyntaxKind::K_ACCUMULATE => Some(PatternKeyword::Accumulate),
            SyntaxKind::K_COLLECT => Some(PatternKeyword::Collect),
            _ => None,
        },
        _ => None,
    })
}

/// Byte offset of the `)` matching the `(` at `open`, if it is closed.
#[must_use]
pub(crate) fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    if !tail.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (kind, span) in tokenize_with_trivia(tail) {
        match kind {
            SyntaxKind::T_LPAREN => depth += 1,
            SyntaxKind::T_RPAREN => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + span.start);
                }
            }
            _ => {}
        }
    }
    None
}

/// `Some((kind, parts))` when `text` contains `and`/`or` at parenthesis
/// depth 0 with whitespace on both sides.
///
/// Parts carry their byte offset within `text` and are trimmed; empty parts
/// are dropped. The connective type is taken from the first split point.
#[must_use]
pub(crate) fn split_logical(text: &str) -> Option<(ConditionType, Vec<(usize, &str)>)> {
    let tokens = tokenize_with_trivia(text);
    let mut depth = 0usize;
    let mut cuts: Vec<Span> = Vec::new();
    let mut connective = None;
    for (i, (kind, span)) in tokens.iter().enumerate() {
        match kind {
            SyntaxKind::T_LPAREN => depth += 1,
            SyntaxKind::T_RPAREN => depth = depth.saturating_sub(1),
            SyntaxKind::K_AND | SyntaxKind::K_OR if depth == 0 => {
                let before = i
                    .checked_sub(1)
                    .and_then(|p| tokens.get(p))
                    .is_some_and(|(k, _)| *k == SyntaxKind::T_WHITESPACE);
                let after = tokens
                    .get(i + 1)
                    .is_some_and(|(k, _)| *k == SyntaxKind::T_WHITESPACE);
                if before && after {
                    connective.get_or_insert(if *kind == SyntaxKind::K_AND {
                        ConditionType::And
                    } else {
                        ConditionType::Or
                    });
                    cuts.push(span.clone());
                }
            }
            _ => {}
        }
    }
    let connective = connective?;
    Some((connective, pieces_between(text, &cuts)))
}

/// Split `text` on commas at bracket depth 0.
#[must_use]
pub(crate) fn split_top_level_commas(text: &str) -> Vec<(usize, &str)> {
    let mut depth = 0usize;
    let cuts: Vec<Span> = tokenize_with_trivia(text)
        .into_iter()
        .filter_map(|(kind, span)| {
            match kind {
                SyntaxKind::T_LPAREN | SyntaxKind::T_LBRACE | SyntaxKind::T_LBRACKET => {
                    depth += 1;
                }
                SyntaxKind::T_RPAREN | SyntaxKind::T_RBRACE | SyntaxKind::T_RBRACKET => {
                    depth = depth.saturating_sub(1);
                }
                SyntaxKind::T_COMMA if depth == 0 => return Some(span),
                _ => {}
            }
            None
        })
        .collect();
    pieces_between(text, &cuts)
}

/// The trimmed, non-empty pieces of `text` between the `cuts` spans.
fn pieces_between<'t>(text: &'t str, cuts: &[Span]) -> Vec<(usize, &'t str)> {
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    let bounds = cuts
        .iter()
        .map(|cut| (cut.start, cut.end))
        .chain(std::iter::once((text.len(), text.len())));
    for (end, next_start) in bounds {
        if let Some(raw) = text.get(start..end) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let lead = raw.len() - raw.trim_start().len();
                pieces.push((start + lead, trimmed));
            }
        }
        start = next_start;
    }
    pieces
}
