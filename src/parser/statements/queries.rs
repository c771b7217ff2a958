//! Parser for `query` statements.

use crate::parser::ast::{Position, QueryNode, char_column};
use crate::parser::line_stream::LineStream;
use crate::parser::regexes::QUERY;
use crate::parser::scanner::ScanContext;

use super::utils::{
    body_conditions, find_terminator, first_group, is_keyword_line, last_content_line,
    leading_column, parse_parameters, span_range,
};

pub(crate) fn parse_query(stream: &mut LineStream<'_>, ctx: &ScanContext<'_>) -> QueryNode {
    let header_line = stream.cursor();
    let lines = stream.lines();
    let header = stream.peek().unwrap_or("");
    let lead = header.len() - header.trim_start().len();

    let mut query = QueryNode::default();
    if let Some(caps) = QUERY.captures(header.trim()) {
        query.name = first_group(&caps, &[1, 2, 3]).unwrap_or("").to_string();
        if let Some(params) = caps.get(4) {
            let base = Position::new(header_line, char_column(header, lead + params.start()));
            query.parameters = parse_parameters(params.as_str(), base);
        }
    }

    let terminator = find_terminator(lines, header_line + 1, &["end"]);
    let body = lines.get(header_line + 1..terminator).unwrap_or_default();
    query.conditions = body_conditions(body, header_line + 1, ctx);

    let closed = lines
        .get(terminator)
        .is_some_and(|line| is_keyword_line(line, "end"));
    let last = if closed {
        stream.seek(terminator + 1);
        terminator
    } else {
        stream.seek(terminator);
        last_content_line(lines, header_line, terminator)
    };
    query.range = span_range(lines, header_line, last);
    query.range.start = Position::new(header_line, leading_column(header));
    query
}
