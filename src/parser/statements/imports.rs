//! Parsers for the single-line `package`, `import` and `global` statements.
//!
//! A line that starts with the keyword but does not fit the expected shape
//! (typically half-typed) is consumed without producing a node.

use crate::parser::ast::{GlobalNode, ImportKind, ImportNode, PackageNode};
use crate::parser::line_stream::LineStream;
use crate::parser::regexes::{GLOBAL, IMPORT, PACKAGE};

use super::utils::span_range;

pub(crate) fn parse_package(stream: &mut LineStream<'_>) -> Option<PackageNode> {
    let line_no = stream.cursor();
    let line = stream.peek()?;
    stream.advance();
    let caps = PACKAGE.captures(line.trim())?;
    Some(PackageNode {
        name: caps.get(1)?.as_str().to_string(),
        range: span_range(stream.lines(), line_no, line_no),
    })
}

pub(crate) fn parse_import(stream: &mut LineStream<'_>) -> Option<ImportNode> {
    let line_no = stream.cursor();
    let line = stream.peek()?;
    stream.advance();
    let caps = IMPORT.captures(line.trim())?;
    let kind = match caps.get(1).map(|m| m.as_str()) {
        Some("static") => ImportKind::Static,
        Some("function") => ImportKind::Function,
        _ => ImportKind::Class,
    };
    Some(ImportNode {
        path: caps.get(2)?.as_str().to_string(),
        kind,
        range: span_range(stream.lines(), line_no, line_no),
    })
}

pub(crate) fn parse_global(stream: &mut LineStream<'_>) -> Option<GlobalNode> {
    let line_no = stream.cursor();
    let line = stream.peek()?;
    stream.advance();
    let caps = GLOBAL.captures(line.trim())?;
    Some(GlobalNode {
        data_type: caps.get(1)?.as_str().to_string(),
        name: caps.get(2)?.as_str().to_string(),
        range: span_range(stream.lines(), line_no, line_no),
    })
}
