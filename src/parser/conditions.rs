//! Condition splitting and classification.
//!
//! [`split_conditions`] cuts the lines of a `when` block (or query body) into
//! condition chunks. A new chunk starts at a line that looks like the start
//! of a condition, but only while the parentheses seen so far in the current
//! chunk are balanced, so an open multi-line pattern is never cut in half.
//!
//! [`build_condition`] then turns one chunk into a [`ConditionNode`],
//! attaching a [`MultiLinePatternNode`] when the chunk holds a multi-line
//! pattern.

use log::trace;

use crate::config::ParserConfig;
use crate::parser::ast::{ConditionNode, MultiLinePatternNode, Position, Range, position_at};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::constraints::parse_constraints;
use crate::parser::multiline::{PatternScan, detect_pattern};
use crate::parser::nested::build_pattern_node;
use crate::parser::regexes::{BARE_FACT, BINDING, CONDITION_START};
use crate::parser::scanner::ScanContext;
use crate::parser::token_utils::{
    find_pattern_keyword, from_source_keyword, leading_keyword, matching_paren, split_logical,
};
use crate::parser::tracker::bracket_ranges;

/// Lines of one condition, not yet classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionChunk {
    pub text: String,
    /// Document line of the chunk's first line.
    pub start_line: usize,
}

/// Cut `lines`, the first of which is document line `first_line`, into
/// condition chunks.
///
/// A blank or comment-only line closes a balanced chunk; inside an
/// unbalanced chunk it is kept. A line whose code ends in `and` or `or`
/// carries the chunk on to the next condition, so the connective joins both
/// sides into one logical condition.
#[must_use]
pub fn split_conditions(lines: &[&str], first_line: usize) -> Vec<ConditionChunk> {
    let mut bounds: Vec<(usize, usize)> = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut balance = 0isize;
    let mut state = ScanState::default();
    let mut joined = false;

    for (index, line) in lines.iter().enumerate() {
        let scanned = scan_line(line, &mut state);
        let mut code = String::new();
        let mut delta = 0isize;
        for sc in scanned.iter().filter(|sc| sc.class.is_code()) {
            match sc.ch {
                '(' => delta += 1,
                ')' => delta -= 1,
                _ => {}
            }
            code.push(sc.ch);
        }

        if code.trim().is_empty() {
            if balance <= 0 && !joined {
                bounds.extend(current.take());
            }
            continue;
        }

        let starter = CONDITION_START.is_match(line.trim_start());
        current = match current {
            Some(open) if starter && balance <= 0 && !joined => {
                bounds.push(open);
                balance = 0;
                Some((index, index))
            }
            Some((from, _)) => Some((from, index)),
            None => {
                balance = 0;
                Some((index, index))
            }
        };
        balance += delta;
        joined = matches!(code.split_whitespace().next_back(), Some("and" | "or"));
    }
    bounds.extend(current);

    bounds
        .into_iter()
        .filter_map(|(from, to)| {
            let text = lines.get(from..=to)?.join("\n");
            trace!("condition chunk at line {}: {text:?}", first_line + from + 1);
            Some(ConditionChunk {
                text,
                start_line: first_line + from,
            })
        })
        .collect()
}

/// Build a depth-0 condition, resolving its pattern through `ctx`.
#[must_use]
pub(crate) fn build_top_level_condition(
    text: &str,
    base: Position,
    ctx: &ScanContext<'_>,
) -> ConditionNode {
    build_condition_using(text, base, 0, ctx.config, |scan| ctx.resolve_pattern(scan))
}

/// Build the condition for `text`, which starts at `base`, at nesting level
/// `depth`.
///
/// `known` holds pattern nodes already built for this region; a pattern
/// starting at the same position is reused instead of being rebuilt.
///
/// # Examples
///
/// ```rust
/// use drlparse::ParserConfig;
/// use drlparse::parser::ast::{ConditionType, Position};
/// use drlparse::parser::conditions::build_condition;
///
/// let node = build_condition(
///     "$p : Person(age > 18)",
///     Position::new(2, 4),
///     0,
///     &ParserConfig::default(),
///     &[],
/// );
/// assert_eq!(node.condition_type, ConditionType::Pattern);
/// assert_eq!(node.variable.as_deref(), Some("$p"));
/// assert_eq!(node.fact_type.as_deref(), Some("Person"));
/// assert!(!node.is_multi_line);
/// ```
#[must_use]
pub fn build_condition(
    text: &str,
    base: Position,
    depth: usize,
    config: &ParserConfig,
    known: &[MultiLinePatternNode],
) -> ConditionNode {
    build_condition_using(text, base, depth, config, |scan| {
        known
            .iter()
            .find(|node| node.range.start == scan.start && node.keyword == scan.keyword)
            .cloned()
            .unwrap_or_else(|| build_pattern_node(scan, depth, config))
    })
}

fn build_condition_using(
    text: &str,
    base: Position,
    depth: usize,
    config: &ParserConfig,
    resolve: impl FnOnce(&PatternScan) -> MultiLinePatternNode,
) -> ConditionNode {
    let lead = text.len() - text.trim_start().len();
    let body = text.trim();
    let start = position_at(base, text, lead);
    let end = position_at(start, body, body.len());

    let mut node = ConditionNode {
        content: body.to_string(),
        span_lines: (start.line..=end.line).collect(),
        parentheses_ranges: bracket_ranges(body, start),
        range: Range::new(start, end),
        ..ConditionNode::default()
    };

    let (inner_offset, unwrapped) = strip_wrapping_parens(body);
    let unwrapped_base = position_at(start, body, inner_offset);
    let leading = leading_keyword(unwrapped);

    if let Some((keyword, _)) = &leading {
        node.condition_type = (*keyword).into();
    } else if let Some(keyword) = from_source_keyword(unwrapped) {
        node.condition_type = keyword.into();
    } else if let Some((connective, parts)) = split_logical(unwrapped) {
        node.condition_type = connective;
        if depth < config.max_nesting_depth {
            node.nested_conditions = Some(
                parts
                    .into_iter()
                    .map(|(offset, part)| {
                        let part_base = position_at(unwrapped_base, unwrapped, offset);
                        build_condition(part, part_base, depth + 1, config, &[])
                    })
                    .collect(),
            );
        }
        return node;
    }

    let fact_text = match &leading {
        Some((_, span)) => unwrapped
            .get(span.end..)
            .map(str::trim_start)
            .filter(|rest| !rest.starts_with('(')),
        None => Some(unwrapped),
    };
    if let Some(fact_text) = fact_text {
        project_fact(fact_text, &mut node);
    }

    if let Some((offset, keyword)) = find_pattern_keyword(body) {
        let scan = detect_pattern(body, start, offset, keyword, config);
        if scan.is_multi_line() {
            node.is_multi_line = true;
            node.multi_line_pattern = Some(resolve(&scan));
        }
    }
    node
}

/// Fill `variable`, `fact_type` and `constraints` from a fact pattern.
fn project_fact(text: &str, node: &mut ConditionNode) {
    let (open, variable, fact_type) = if let Some(caps) = BINDING.captures(text) {
        let (Some(whole), Some(var), Some(fact)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            return;
        };
        (whole.end() - 1, Some(var.as_str()), fact.as_str())
    } else if let Some(caps) = BARE_FACT.captures(text) {
        let (Some(whole), Some(fact)) = (caps.get(0), caps.get(1)) else {
            return;
        };
        if leading_keyword(fact.as_str()).is_some() {
            return;
        }
        (whole.end() - 1, None, fact.as_str())
    } else {
        return;
    };

    let body = match matching_paren(text, open) {
        Some(close) => text.get(open + 1..close),
        None => text.get(open + 1..),
    };
    node.variable = variable.map(str::to_string);
    node.fact_type = Some(fact_type.to_string());
    node.constraints = Some(body.map(parse_constraints).unwrap_or_default());
}

/// Strip one pair of parentheses enclosing all of `body`.
fn strip_wrapping_parens(body: &str) -> (usize, &str) {
    if body.starts_with('(') && matching_paren(body, 0) == Some(body.len() - 1) {
        let inner = body.get(1..body.len() - 1).unwrap_or("");
        let lead = inner.len() - inner.trim_start().len();
        return (1 + lead, inner.trim());
    }
    (0, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{ConditionType, PatternKeyword};
    use rstest::rstest;

    fn chunks(src: &str) -> Vec<(usize, String)> {
        let lines: Vec<&str> = src.split('\n').collect();
        split_conditions(&lines, 10)
            .into_iter()
            .map(|c| (c.start_line, c.text.trim().to_string()))
            .collect()
    }

    fn build(text: &str) -> ConditionNode {
        build_condition(text, Position::default(), 0, &ParserConfig::default(), &[])
    }

    #[test]
    fn splits_on_condition_starters() {
        let found = chunks("    $p : Person(age > 18)\n    $a : Account(owner == $p)");
        assert_eq!(
            found,
            vec![
                (10, "$p : Person(age > 18)".to_string()),
                (11, "$a : Account(owner == $p)".to_string()),
            ]
        );
    }

    #[test]
    fn open_pattern_is_not_cut() {
        let found = chunks("exists(\n  $p : Person()\n\n  Account()\n)\nB()");
        assert_eq!(found.len(), 2);
        assert_eq!(
            found.first().map(|(line, _)| *line),
            Some(10)
        );
        assert_eq!(found.get(1), Some(&(15, "B()".to_string())));
    }

    #[test]
    fn continuation_lines_join_previous_chunk() {
        let found = chunks("$t : Number()\n    from accumulate(A(), count(1))\n// done\n");
        assert_eq!(found.len(), 1);
        assert!(found.first().is_some_and(|(_, t)| t.ends_with("count(1))")));
    }

    #[rstest]
    #[case("$a : A()\nand\n$b : B()\n$c : C()", "$a : A()\nand\n$b : B()")]
    #[case("$a : A() or\n\n$b : B()\n$c : C()", "$a : A() or\n\n$b : B()")]
    fn connective_line_joins_neighbours(#[case] src: &str, #[case] joined: &str) {
        let found = chunks(src);
        let texts: Vec<&str> = found.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec![joined, "$c : C()"]);
        assert_eq!(found.get(1).map(|(line, _)| *line), Some(13));
    }

    #[test]
    fn connective_line_builds_logical_condition() {
        let lines = ["    $a : A()", "    and", "    $b : B()"];
        let chunk = split_conditions(&lines, 0);
        let node = chunk.first().map(|c| build(&c.text));
        assert_eq!(chunk.len(), 1);
        assert_eq!(node.as_ref().map(|n| n.condition_type), Some(ConditionType::And));
        let vars: Vec<Option<String>> = node
            .and_then(|n| n.nested_conditions)
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.variable)
            .collect();
        assert_eq!(vars, vec![Some("$a".to_string()), Some("$b".to_string())]);
    }

    #[rstest]
    #[case("exists(A())", ConditionType::Exists)]
    #[case("not Person(age < 18)", ConditionType::Not)]
    #[case("eval($x > 1)", ConditionType::Eval)]
    #[case("$n : Number() from accumulate(A(), count(1))", ConditionType::Accumulate)]
    #[case("$l : List() from collect(A())", ConditionType::Collect)]
    #[case("A() or B()", ConditionType::Or)]
    #[case("(A() and B())", ConditionType::And)]
    #[case("Person(android == true)", ConditionType::Pattern)]
    fn classifies_condition_type(#[case] text: &str, #[case] expected: ConditionType) {
        assert_eq!(build(text).condition_type, expected);
    }

    #[test]
    fn binding_projection_includes_constraints() {
        let node = build("$p : com.acme.Person(age > 18, name == \"Ann\") from $people");
        assert_eq!(node.variable.as_deref(), Some("$p"));
        assert_eq!(node.fact_type.as_deref(), Some("com.acme.Person"));
        let fields: Vec<String> = node
            .constraints
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, vec!["age", "name"]);
    }

    #[test]
    fn negated_fact_without_parens_keeps_fact_type() {
        let node = build("not Person(age < 18)");
        assert_eq!(node.fact_type.as_deref(), Some("Person"));
        assert!(!node.is_multi_line);
    }

    #[test]
    fn logical_condition_has_children() {
        let node = build("$a : A() or $b : B()");
        let children = node.nested_conditions.unwrap_or_default();
        let vars: Vec<Option<String>> = children.into_iter().map(|c| c.variable).collect();
        assert_eq!(vars, vec![Some("$a".to_string()), Some("$b".to_string())]);
    }

    #[test]
    fn multi_line_pattern_is_attached() {
        let node = build_condition(
            "exists(\n        Person(age > 18)\n    )",
            Position::new(2, 4),
            0,
            &ParserConfig::default(),
            &[],
        );
        assert!(node.is_multi_line);
        assert_eq!(node.span_lines, vec![2, 3, 4]);
        let pattern = node.multi_line_pattern.as_ref();
        assert_eq!(pattern.map(|p| p.keyword), Some(PatternKeyword::Exists));
        assert_eq!(pattern.map(|p| p.is_complete), Some(true));
        assert_eq!(node.parentheses_ranges.len(), 4);
    }

    #[test]
    fn nested_single_line_pattern_is_multi_line() {
        let node = build("exists(Person(age>18) and not(Account(balance<0)))");
        assert!(node.is_multi_line);
        let nested = node
            .multi_line_pattern
            .map(|p| p.nested_patterns)
            .unwrap_or_default();
        let keywords: Vec<PatternKeyword> = nested.iter().map(|p| p.keyword).collect();
        assert_eq!(keywords, vec![PatternKeyword::Not]);
    }
}
