//! Shared helpers used by the statement parsers.

use regex::Captures;

use crate::language::statement_kind;
use crate::parser::ast::{ConditionNode, ParameterNode, Position, Range, end_of_line, position_at};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::conditions::{build_top_level_condition, split_conditions};
use crate::parser::regexes::PARAMETER;
use crate::parser::scanner::ScanContext;

/// Character column of the first non-whitespace character of `line`.
#[must_use]
pub(crate) fn leading_column(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Range of the trimmed text of lines `first..=last`.
#[must_use]
pub(crate) fn span_range(lines: &[&str], first: usize, last: usize) -> Range {
    let first_line = lines.get(first).copied().unwrap_or("");
    let last_line = lines.get(last).copied().unwrap_or("");
    Range::new(
        Position::new(first, leading_column(first_line)),
        end_of_line(last, last_line.trim_end()),
    )
}

/// The part of a trimmed line before any `//` comment.
#[must_use]
pub(crate) fn keyword_line(trimmed: &str) -> &str {
    trimmed
        .split_once("//")
        .map_or(trimmed, |(head, _)| head)
        .trim_end()
}

/// Whether `line` consists of exactly `word`, ignoring a trailing comment.
#[must_use]
pub(crate) fn is_keyword_line(line: &str, word: &str) -> bool {
    keyword_line(line.trim()) == word
}

/// Whether `line` holds nothing but whitespace or a `//` comment.
#[must_use]
pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    keyword_line(line.trim()).is_empty()
}

/// Index of the line closing a block that starts at `from`: the first line
/// that is exactly one of `words` or that starts a top-level statement.
/// Returns `lines.len()` when there is none.
#[must_use]
pub(crate) fn find_terminator(lines: &[&str], from: usize, words: &[&str]) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| {
            let head = keyword_line(line.trim());
            words.contains(&head) || statement_kind(head).is_some()
        })
        .map_or(lines.len(), |(index, _)| index)
}

/// The first group among `groups` that participated in the match.
#[must_use]
pub(crate) fn first_group<'t>(caps: &Captures<'t>, groups: &[usize]) -> Option<&'t str> {
    groups
        .iter()
        .find_map(|&group| caps.get(group))
        .map(|m| m.as_str())
}

/// Parameters of a comma-separated `Type name` list starting at `base`.
///
/// Pieces that do not look like `Type name` are omitted.
#[must_use]
pub(crate) fn parse_parameters(text: &str, base: Position) -> Vec<ParameterNode> {
    let mut offset = 0;
    let mut params = Vec::new();
    for piece in text.split(',') {
        let lead = piece.len() - piece.trim_start().len();
        let trimmed = piece.trim();
        if let Some(caps) = PARAMETER.captures(trimmed)
            && let (Some(data_type), Some(name)) = (caps.get(1), caps.get(2))
        {
            let start = offset + lead;
            params.push(ParameterNode {
                data_type: data_type.as_str().to_string(),
                name: name.as_str().to_string(),
                range: Range::new(
                    position_at(base, text, start),
                    position_at(base, text, start + trimmed.len()),
                ),
            });
        }
        offset += piece.len() + 1;
    }
    params
}

/// Conditions held by `body`, whose first entry is document line
/// `first_line`.
#[must_use]
pub(crate) fn body_conditions(
    body: &[&str],
    first_line: usize,
    ctx: &ScanContext<'_>,
) -> Vec<ConditionNode> {
    split_conditions(body, first_line)
        .into_iter()
        .map(|chunk| {
            build_top_level_condition(&chunk.text, Position::new(chunk.start_line, 0), ctx)
        })
        .collect()
}

/// Index of the first line after the block comment opening on line `from`.
#[must_use]
pub(crate) fn skip_block_comment(lines: &[&str], from: usize) -> usize {
    let mut state = ScanState::default();
    for (index, line) in lines.iter().enumerate().skip(from) {
        let _ = scan_line(line, &mut state);
        if !state.in_block_comment() {
            return index + 1;
        }
    }
    lines.len()
}

/// Index of the last line before `before` (and not before `from`) that
/// holds anything other than whitespace or a comment.
#[must_use]
pub(crate) fn last_content_line(lines: &[&str], from: usize, before: usize) -> usize {
    (from..before)
        .rev()
        .find(|&index| lines.get(index).is_some_and(|line| !is_blank_or_comment(line)))
        .unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("when", "when", true)]
    #[case("  when   // conditions", "when", true)]
    #[case("whenever", "when", false)]
    #[case("end;", "end", false)]
    fn keyword_lines(#[case] line: &str, #[case] word: &str, #[case] expected: bool) {
        assert_eq!(is_keyword_line(line, word), expected);
    }

    #[test]
    fn terminator_stops_at_statement_starters() {
        let lines = ["when", "  $p : Person()", "rule \"Next\"", "then"];
        assert_eq!(find_terminator(&lines, 1, &["then", "end"]), 2);
        assert_eq!(find_terminator(&lines, 3, &["end"]), 4);
    }

    #[test]
    fn parameters_skip_malformed_pieces() {
        let params = parse_parameters("String name, 42, int count", Position::new(3, 10));
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "count"]);
        assert_eq!(
            params.get(1).map(|p| p.range.start),
            Some(Position::new(3, 27))
        );
    }

    #[test]
    fn block_comment_skip_finds_closing_line() {
        let lines = ["/* a", "b", "c */", "rule"];
        assert_eq!(skip_block_comment(&lines, 0), 3);
        assert_eq!(skip_block_comment(&["/* x */"], 0), 1);
    }

    #[test]
    fn last_content_line_ignores_blank_tail() {
        let lines = ["rule \"R\"", "  salience 1", "", "// note"];
        assert_eq!(last_content_line(&lines, 0, 4), 1);
    }

    #[test]
    fn span_range_trims_both_ends() {
        let lines = ["  rule \"R\"", "end  "];
        let range = span_range(&lines, 0, 1);
        assert_eq!(range.start, Position::new(0, 2));
        assert_eq!(range.end, Position::new(1, 3));
    }
}
