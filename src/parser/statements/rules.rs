//! Parser for `rule` statements.
//!
//! A rule is read as a linear sequence: header, attribute lines, a `when`
//! block, a `then` block and the closing `end`. Each block runs until the
//! next block keyword or the next top-level statement, so a rule missing its
//! `end` never swallows the statement after it. Lines in the attribute
//! section that are not attributes trigger a bounded recovery scan.

use crate::language::{is_rule_attribute, statement_kind};
use crate::parser::ast::{Position, Range, RuleAttribute, RuleNode, ThenNode, WhenNode};
use crate::parser::line_stream::LineStream;
use crate::parser::recovery::{Boundary, resync};
use crate::parser::regexes::{RULE, RULE_ATTRIBUTE};
use crate::parser::scanner::ScanContext;

use super::utils::{
    body_conditions, find_terminator, first_group, is_blank_or_comment, keyword_line,
    last_content_line, leading_column, skip_block_comment, span_range,
};

/// `when`, alone or followed by conditions on the same line.
fn opens_when(head: &str) -> bool {
    head.strip_prefix("when")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn opens_then(head: &str) -> bool {
    head.strip_prefix("then")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn parse_attribute(line: &str, index: usize) -> Option<RuleAttribute> {
    let head = keyword_line(line.trim());
    let caps = RULE_ATTRIBUTE.captures(head)?;
    let name = caps.get(1)?.as_str();
    if !is_rule_attribute(name) {
        return None;
    }
    let value = caps
        .get(2)
        .map(|m| m.as_str().trim_end_matches(';').trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    let column = leading_column(line);
    Some(RuleAttribute {
        name: name.to_string(),
        value,
        range: Range::new(
            Position::new(index, column),
            Position::new(index, column + head.chars().count()),
        ),
    })
}

/// Parse the `when` block opening on line `index`. Returns the node and the
/// index of the line that ended it.
fn parse_when(lines: &[&str], index: usize, ctx: &ScanContext<'_>) -> (WhenNode, usize) {
    let terminator = find_terminator(lines, index + 1, &["then", "end"]);
    let opening = lines
        .get(index)
        .map(|line| line.replacen("when", "    ", 1))
        .unwrap_or_default();
    let mut body: Vec<&str> = Vec::with_capacity(terminator.saturating_sub(index));
    body.push(&opening);
    body.extend(lines.get(index + 1..terminator).unwrap_or_default());

    let conditions = body_conditions(&body, index, ctx);
    let last = terminator.saturating_sub(1).max(index);
    (
        WhenNode {
            conditions,
            range: span_range(lines, index, last),
        },
        terminator,
    )
}

/// Parse the `then` block opening on line `index`. Returns the node and the
/// index of the line that ended it.
fn parse_then(lines: &[&str], index: usize) -> (ThenNode, usize) {
    let terminator = find_terminator(lines, index + 1, &["end"]);
    let inline = lines
        .get(index)
        .map(|line| keyword_line(line.trim()))
        .and_then(|head| head.strip_prefix("then"))
        .unwrap_or("");
    let content = std::iter::once(inline)
        .chain(
            lines
                .get(index + 1..terminator)
                .unwrap_or_default()
                .iter()
                .copied(),
        )
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    let last = last_content_line(lines, index, terminator);
    (
        ThenNode {
            content,
            range: span_range(lines, index, last),
        },
        terminator,
    )
}

pub(crate) fn parse_rule(stream: &mut LineStream<'_>, ctx: &ScanContext<'_>) -> RuleNode {
    let header_line = stream.cursor();
    let lines = stream.lines();
    let header = stream.peek().unwrap_or("");
    let (name, parent) = RULE.captures(header.trim()).map_or_else(
        || (String::new(), None),
        |caps| {
            (
                first_group(&caps, &[1, 2, 3]).unwrap_or("").to_string(),
                first_group(&caps, &[4, 5, 6]).map(str::to_string),
            )
        },
    );
    stream.advance();

    let mut rule = RuleNode {
        name,
        parent,
        ..RuleNode::default()
    };
    let mut end_line = None;

    while let Some(line) = stream.peek() {
        let index = stream.cursor();
        let head = keyword_line(line.trim());
        if head == "end" {
            end_line = Some(index);
            stream.advance();
            break;
        }
        if statement_kind(head).is_some() {
            break;
        }
        let in_header = rule.when.is_none() && rule.then.is_none();
        if in_header && opens_when(head) {
            let (when, next) = parse_when(lines, index, ctx);
            rule.when = Some(when);
            stream.seek(next);
            continue;
        }
        if rule.then.is_none() && opens_then(head) {
            let (then, next) = parse_then(lines, index);
            rule.then = Some(then);
            stream.seek(next);
            continue;
        }
        if head.starts_with("/*") {
            stream.seek(skip_block_comment(lines, index));
            continue;
        }
        if is_blank_or_comment(line) {
            stream.advance();
            continue;
        }
        if in_header && let Some(attribute) = parse_attribute(line, index) {
            rule.attributes.push(attribute);
            stream.advance();
            continue;
        }
        match resync(lines, index + 1, ctx.config.max_resync_lookahead) {
            Boundary::Block(next) => stream.seek(next),
            Boundary::Statement(next) | Boundary::Exhausted(next) => {
                stream.seek(next);
                break;
            }
        }
    }

    let last = end_line.unwrap_or_else(|| last_content_line(lines, header_line, stream.cursor()));
    let mut range = span_range(lines, header_line, last);
    range.start = Position::new(header_line, leading_column(header));
    let block_ends = [
        rule.when.as_ref().map(|w| w.range.end),
        rule.then.as_ref().map(|t| t.range.end),
    ];
    for end in block_ends.into_iter().flatten() {
        range.end = range.end.max(end);
    }
    rule.range = range;
    rule
}
