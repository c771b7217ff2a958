//! Parser for `declare` statements: declared types, traits and enums.
//!
//! Annotation lines that come before the first field belong to the type;
//! later ones attach to the most recent field. Lines that are neither
//! annotations nor `name : Type` fields (enum constants, stray text) are
//! skipped.

use crate::parser::ast::{DeclareKind, DeclareNode, FieldNode, Position, Range};
use crate::parser::line_stream::LineStream;
use crate::parser::regexes::{ANNOTATION, DECLARE, FIELD};

use super::utils::{
    find_terminator, is_keyword_line, keyword_line, last_content_line, leading_column, span_range,
};

fn annotations(text: &str) -> impl Iterator<Item = String> + '_ {
    ANNOTATION.find_iter(text).map(|m| m.as_str().to_string())
}

fn parse_field(line: &str, index: usize) -> Option<FieldNode> {
    let head = keyword_line(line.trim());
    let caps = FIELD.captures(head)?;
    let column = leading_column(line);
    Some(FieldNode {
        name: caps.get(1)?.as_str().to_string(),
        data_type: caps.get(2)?.as_str().to_string(),
        annotations: caps
            .get(3)
            .map(|tail| annotations(tail.as_str()).collect())
            .unwrap_or_default(),
        range: Range::new(
            Position::new(index, column),
            Position::new(index, column + head.chars().count()),
        ),
    })
}

pub(crate) fn parse_declare(stream: &mut LineStream<'_>) -> DeclareNode {
    let header_line = stream.cursor();
    let lines = stream.lines();
    let header = stream.peek().unwrap_or("");

    let mut declare = DeclareNode::default();
    if let Some(caps) = DECLARE.captures(header.trim()) {
        declare.kind = match caps.get(1).map(|m| m.as_str()) {
            Some("trait") => DeclareKind::Trait,
            Some("enum") => DeclareKind::Enum,
            _ => DeclareKind::Type,
        };
        declare.name = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        declare.super_type = caps.get(3).map(|m| m.as_str().to_string());
    }

    let terminator = find_terminator(lines, header_line + 1, &["end"]);
    for (index, line) in lines
        .iter()
        .enumerate()
        .take(terminator)
        .skip(header_line + 1)
    {
        let head = keyword_line(line.trim());
        if head.starts_with('@') {
            let target = declare
                .fields
                .last_mut()
                .map_or(&mut declare.annotations, |field| &mut field.annotations);
            target.extend(annotations(head));
        } else if let Some(field) = parse_field(line, index) {
            declare.fields.push(field);
        }
    }

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
    declare.range = span_range(lines, header_line, last);
    declare.range.start = Position::new(header_line, leading_column(header));
    declare
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line_stream::split_lines;
    use rstest::rstest;

    fn parse(src: &str) -> (DeclareNode, usize) {
        let lines = split_lines(src);
        let mut stream = LineStream::new(&lines);
        let declare = parse_declare(&mut stream);
        (declare, stream.cursor())
    }

    #[test]
    fn parses_fields_and_annotations() {
        let (declare, cursor) = parse(
            "declare Person extends Base\n  @role(event)\n  name : String @key\n  age : int\n  @position(1)\nend",
        );
        assert_eq!(cursor, 6);
        assert_eq!(declare.name, "Person");
        assert_eq!(declare.kind, DeclareKind::Type);
        assert_eq!(declare.super_type.as_deref(), Some("Base"));
        assert_eq!(declare.annotations, vec!["@role(event)"]);
        let fields: Vec<(&str, &str)> = declare
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.data_type.as_str()))
            .collect();
        assert_eq!(fields, vec![("name", "String"), ("age", "int")]);
        assert_eq!(
            declare.fields.first().map(|f| f.annotations.clone()),
            Some(vec!["@key".to_string()])
        );
        assert_eq!(
            declare.fields.get(1).map(|f| f.annotations.clone()),
            Some(vec!["@position(1)".to_string()])
        );
        assert_eq!(declare.range.end, Position::new(5, 3));
    }

    #[rstest]
    #[case("declare trait Named", DeclareKind::Trait)]
    #[case("declare enum Color", DeclareKind::Enum)]
    #[case("declare Plain", DeclareKind::Type)]
    fn declare_kinds(#[case] header: &str, #[case] kind: DeclareKind) {
        let (declare, _) = parse(&format!("{header}\nend"));
        assert_eq!(declare.kind, kind);
    }

    #[test]
    fn enum_constants_are_skipped() {
        let (declare, _) =
            parse("declare enum Color\n  RED(\"r\"), GREEN(\"g\");\n  code : String\nend");
        assert_eq!(declare.fields.len(), 1);
    }
}
