//! Decomposition of a scanned pattern into a [`MultiLinePatternNode`].
//!
//! Two passes run over each pattern:
//!
//! 1. nested discovery re-runs the keyword search over the pattern text,
//!    skipping the outer keyword at offset 0 and anything inside a child
//!    already found, so only direct children are built here and each child
//!    builds its own;
//! 2. the body between the outer parentheses is split on top-level
//!    `and`/`or` into `inner_conditions`.
//!
//! Recursion is bounded by `max_nesting_depth`: a node at the cap is returned
//! as a leaf.

use log::warn;

use crate::config::ParserConfig;
use crate::parser::ast::{MultiLinePatternNode, position_at};
use crate::parser::conditions::build_condition;
use crate::parser::multiline::{PatternScan, detect_pattern};
use crate::parser::token_utils::{has_nested_patterns, pattern_keyword_hits, split_logical};
use crate::parser::tracker::bracket_ranges;

/// Build the node for `scan` at nesting level `depth`.
#[must_use]
pub fn build_pattern_node(
    scan: &PatternScan,
    depth: usize,
    config: &ParserConfig,
) -> MultiLinePatternNode {
    let mut node = MultiLinePatternNode {
        keyword: scan.keyword,
        content: scan.content.clone(),
        is_complete: scan.is_complete(),
        depth,
        nested_patterns: Vec::new(),
        inner_conditions: Vec::new(),
        parentheses_ranges: bracket_ranges(&scan.content, scan.start),
        range: scan.range(),
    };

    if depth >= config.max_nesting_depth {
        if has_nested_patterns(&scan.content) {
            warn!(
                "pattern nesting truncated at depth {depth} (line {})",
                scan.start.line + 1
            );
        }
        return node;
    }

    node.nested_patterns = nested_children(scan, depth, config);

    let (inner_offset, inner) = scan.inner();
    let inner_base = position_at(scan.start, &scan.content, inner_offset);
    let parts = match split_logical(inner) {
        Some((_, parts)) => parts,
        None => {
            let trimmed = inner.trim();
            let lead = inner.len() - inner.trim_start().len();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![(lead, trimmed)]
            }
        }
    };
    node.inner_conditions = parts
        .into_iter()
        .map(|(offset, part)| {
            let base = position_at(inner_base, inner, offset);
            build_condition(part, base, depth + 1, config, &node.nested_patterns)
        })
        .collect();
    node
}

/// Direct child patterns of `scan`, each built one level deeper.
fn nested_children(
    scan: &PatternScan,
    depth: usize,
    config: &ParserConfig,
) -> Vec<MultiLinePatternNode> {
    let mut children = Vec::new();
    let mut resume = 1;
    for (offset, keyword) in pattern_keyword_hits(&scan.content) {
        if offset < resume {
            continue;
        }
        let child = detect_pattern(&scan.content, scan.start, offset, keyword, config);
        resume = offset + child.content.len().max(1);
        children.push(build_pattern_node(&child, depth + 1, config));
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{ConditionType, PatternKeyword, Position};

    fn build(text: &str, keyword: PatternKeyword, config: &ParserConfig) -> MultiLinePatternNode {
        let scan = detect_pattern(text, Position::default(), 0, keyword, config);
        build_pattern_node(&scan, 0, config)
    }

    #[test]
    fn finds_one_direct_child() {
        let node = build(
            "exists(Person(age>18) and not(Account(balance<0)))",
            PatternKeyword::Exists,
            &ParserConfig::default(),
        );
        assert_eq!(node.nested_patterns.len(), 1);
        let child = node.nested_patterns.first().map(|c| (c.keyword, c.depth));
        assert_eq!(child, Some((PatternKeyword::Not, 1)));
        assert_eq!(node.inner_conditions.len(), 2);
        let types: Vec<ConditionType> = node
            .inner_conditions
            .iter()
            .map(|c| c.condition_type)
            .collect();
        assert_eq!(types, vec![ConditionType::Pattern, ConditionType::Not]);
    }

    #[test]
    fn grandchildren_belong_to_their_parent() {
        let node = build(
            "forall(not(exists(A())))",
            PatternKeyword::Forall,
            &ParserConfig::default(),
        );
        assert_eq!(node.nested_patterns.len(), 1);
        let child = node.nested_patterns.first();
        assert_eq!(child.map(|c| c.nested_patterns.len()), Some(1));
        assert_eq!(node.max_depth(), 2);
    }

    #[test]
    fn depth_cap_truncates_tree() {
        let config = ParserConfig::default().with_max_nesting_depth(1);
        let node = build("not(not(not(A())))", PatternKeyword::Not, &config);
        assert_eq!(node.max_depth(), 1);
        let leaf = node.nested_patterns.first();
        assert!(leaf.is_some_and(|l| l.nested_patterns.is_empty()));
        assert!(leaf.is_some_and(|l| l.inner_conditions.is_empty()));
    }

    #[test]
    fn child_ranges_point_into_document() {
        let node = build(
            "exists(\n  A() and\n  not(B())\n)",
            PatternKeyword::Exists,
            &ParserConfig::default(),
        );
        let child = node.nested_patterns.first().map(|c| c.range);
        assert_eq!(
            child.map(|r| (r.start, r.end)),
            Some((Position::new(2, 2), Position::new(2, 10)))
        );
    }
}
