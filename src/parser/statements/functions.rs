//! Parser for `function` declarations.
//!
//! The body is found by brace counting over unmasked characters from the
//! header on. A header with no `{` before the next top-level statement or
//! within the recovery lookahead ends on its own line; a body whose braces
//! never balance runs to the end of the file.

use log::warn;

use crate::config::ParserConfig;
use crate::language::statement_kind;
use crate::parser::ast::{FunctionNode, ParameterNode, Position, Range, end_of_line, position_at};
use crate::parser::classifier::{ScanState, scan_line};
use crate::parser::line_stream::LineStream;
use crate::parser::regexes::FUNCTION;
use crate::parser::token_utils::matching_paren;

use super::utils::{keyword_line, leading_column, parse_parameters, span_range};

/// Location of a brace: line index and byte offset within that line.
type BracePos = (usize, usize);

/// Find the first `{` at or after line `from` within `lookahead` lines and
/// the `}` that closes it. The search for `{` stops at the next top-level
/// statement.
fn find_body(
    lines: &[&str],
    from: usize,
    lookahead: usize,
) -> Option<(BracePos, Option<BracePos>)> {
    let mut state = ScanState::default();
    let mut depth = 0usize;
    let mut open = None;
    for (index, line) in lines.iter().enumerate().skip(from) {
        if open.is_none()
            && index > from
            && (index > from + lookahead || statement_kind(keyword_line(line.trim())).is_some())
        {
            return None;
        }
        for sc in scan_line(line, &mut state) {
            if !sc.class.is_code() {
                continue;
            }
            match sc.ch {
                '{' => {
                    open.get_or_insert((index, sc.byte));
                    depth += 1;
                }
                '}' if open.is_some() => {
                    depth -= 1;
                    if depth == 0 {
                        return open.map(|o| (o, Some((index, sc.byte))));
                    }
                }
                _ => {}
            }
        }
    }
    open.map(|o| (o, None))
}

pub(crate) fn parse_function(
    stream: &mut LineStream<'_>,
    config: &ParserConfig,
) -> Option<FunctionNode> {
    let header_line = stream.cursor();
    let lines = stream.lines();
    let header = stream.peek()?;
    let lead = header.len() - header.trim_start().len();
    let Some(caps) = FUNCTION.captures(header.trim_start()) else {
        stream.advance();
        return None;
    };
    let name = caps.get(2)?.as_str().to_string();
    let return_type = caps.get(1).map(|m| m.as_str().to_string());
    let paren = lead + caps.get(0)?.end() - 1;

    let Some((open, close)) = find_body(lines, header_line, config.max_resync_lookahead) else {
        warn!(
            "function '{name}' at line {} has no body within {} lines",
            header_line + 1,
            config.max_resync_lookahead
        );
        stream.advance();
        return Some(FunctionNode {
            name,
            return_type,
            parameters: header_parameters(header, header_line, paren),
            body: String::new(),
            range: span_range(lines, header_line, header_line),
        });
    };

    let last_line = close.map_or(stream.last_index(), |(line, _)| line);
    let text = lines
        .get(header_line..=last_line)
        .map(|slice| slice.join("\n"))
        .unwrap_or_default();
    let offset_of = |(line, byte): BracePos| -> usize {
        lines
            .get(header_line..line)
            .map_or(0, |before| before.iter().map(|l| l.len() + 1).sum::<usize>())
            + byte
    };
    let body_start = offset_of(open) + 1;
    let body_end = close.map_or(text.len(), offset_of);
    let body = text.get(body_start..body_end).unwrap_or("").trim().to_string();

    let header_base = Position::new(header_line, 0);
    let parameters = matching_paren(&text, paren)
        .filter(|&close_paren| close_paren < body_start)
        .and_then(|close_paren| {
            let params = text.get(paren + 1..close_paren)?;
            Some(parse_parameters(
                params,
                position_at(header_base, &text, paren + 1),
            ))
        })
        .unwrap_or_default();

    let end = match close {
        Some(pos) => position_at(header_base, &text, offset_of(pos) + 1),
        None => end_of_line(last_line, lines.get(last_line).copied().unwrap_or("").trim_end()),
    };
    stream.seek(last_line + 1);
    Some(FunctionNode {
        name,
        return_type,
        parameters,
        body,
        range: Range::new(
            Position::new(header_line, leading_column(header)),
            end,
        ),
    })
}

fn header_parameters(
    header: &str,
    header_line: usize,
    paren: usize,
) -> Vec<ParameterNode> {
    let base = Position::new(header_line, 0);
    matching_paren(header, paren)
        .and_then(|close| {
            let params = header.get(paren + 1..close)?;
            Some(parse_parameters(params, position_at(base, header, paren + 1)))
        })
        .unwrap_or_default()
}
