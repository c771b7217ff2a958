//! Structural diagnostics.
//!
//! Every diagnostic is derived from the finished AST and the document's
//! bracket state, never emitted while scanning, so a spliced incremental
//! result reports exactly what a full parse of the same text would.

use crate::config::ParserConfig;
use crate::parser::ast::{ConditionNode, DroolsFile, MultiLinePatternNode};
use crate::parser::errors::ParseError;
use crate::parser::token_utils::has_nested_patterns;
use crate::parser::tracker::{ParenthesesSnapshot, ParenthesesTracker};

/// Bracket state of the whole document.
#[must_use]
pub(crate) fn document_brackets(lines: &[&str]) -> ParenthesesSnapshot {
    let mut tracker = ParenthesesTracker::new();
    for (number, line) in lines.iter().enumerate() {
        tracker.track_line(line, number);
    }
    tracker.rebuild_matched_pairs();
    tracker.snapshot()
}

/// All diagnostics for `ast`, ordered by position.
#[must_use]
pub(crate) fn collect(
    ast: &DroolsFile,
    brackets: &ParenthesesSnapshot,
    config: &ParserConfig,
) -> Vec<ParseError> {
    let mut errors = Vec::new();
    for condition in ast.conditions() {
        condition_diagnostics(condition, config, &mut errors);
    }
    errors.extend(brackets.validate());
    errors.sort_by_key(|e| e.range.start);
    errors
}

fn condition_diagnostics(
    condition: &ConditionNode,
    config: &ParserConfig,
    errors: &mut Vec<ParseError>,
) {
    if let Some(pattern) = &condition.multi_line_pattern {
        if !pattern.is_complete {
            errors.push(incomplete_pattern(pattern, config));
        }
        truncation_warnings(pattern, config, errors);
    } else if let Some(children) = &condition.nested_conditions {
        for child in children {
            condition_diagnostics(child, config, errors);
        }
    }
}

/// A scan cut off by the paren-depth cap ends on the parenthesis that
/// exceeded it, so its content holds more unmatched `(` than the cap allows.
fn incomplete_pattern(pattern: &MultiLinePatternNode, config: &ParserConfig) -> ParseError {
    let mut tracker = ParenthesesTracker::new();
    tracker.track_text(&pattern.content, pattern.range.start);
    tracker.rebuild_matched_pairs();
    let (opens, closes) = tracker.snapshot().unmatched_parens();
    let message = if opens > config.max_paren_depth {
        format!(
            "'{}' pattern exceeds the maximum parenthesis depth of {}; the rest of it is not analysed",
            pattern.keyword, config.max_paren_depth
        )
    } else {
        format!(
            "Incomplete '{}' pattern: {opens} unmatched '(' and {closes} unmatched ')'",
            pattern.keyword
        )
    };
    ParseError::error(message, pattern.range)
}

fn truncation_warnings(
    pattern: &MultiLinePatternNode,
    config: &ParserConfig,
    errors: &mut Vec<ParseError>,
) {
    if pattern.depth >= config.max_nesting_depth {
        if has_nested_patterns(&pattern.content) {
            errors.push(ParseError::warning(
                format!(
                    "Pattern nesting exceeds the maximum depth of {}; inner patterns are not analysed",
                    config.max_nesting_depth
                ),
                pattern.range,
            ));
        }
        return;
    }
    for child in &pattern.nested_patterns {
        truncation_warnings(child, config, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::errors::Severity;
    use crate::parser::line_stream::split_lines;
    use crate::parser::parse_with_config;

    fn diagnostics(src: &str, config: &ParserConfig) -> Vec<ParseError> {
        let ast = parse_with_config(src, config).ast;
        let lines = split_lines(src);
        collect(&ast, &document_brackets(&lines), config)
    }

    #[test]
    fn balanced_document_is_clean() {
        let src = "rule R\nwhen\n  exists(\n    Person()\n  )\nthen\nend";
        assert!(diagnostics(src, &ParserConfig::default()).is_empty());
    }

    #[test]
    fn incomplete_pattern_reports_imbalance() {
        let src = "rule R\nwhen\n  exists(\n    Person(age > 18)\nthen\nend";
        let errors = diagnostics(src, &ParserConfig::default());
        let pattern_error = errors
            .iter()
            .find(|e| e.message.starts_with("Incomplete 'exists' pattern"));
        assert_eq!(
            pattern_error.map(|e| e.message.as_str()),
            Some("Incomplete 'exists' pattern: 1 unmatched '(' and 0 unmatched ')'")
        );
        assert!(errors.iter().any(|e| e.message == "Unmatched opening '('"));
        assert!(errors.iter().all(|e| e.severity == Severity::Error));
        assert!(errors.windows(2).all(|w| match w {
            [a, b] => a.range.start <= b.range.start,
            _ => true,
        }));
    }

    #[test]
    fn paren_cap_names_the_limit() {
        let depth = ParserConfig::default().max_paren_depth;
        let condition = format!("eval({}x{})", "(".repeat(depth), ")".repeat(depth + 1));
        let src = format!("rule R\nwhen\n    {condition}\nthen\nend");
        let result = crate::parser::parse(&src);
        let pattern = result
            .ast
            .rules
            .first()
            .and_then(|r| r.conditions().first())
            .and_then(|c| c.multi_line_pattern.as_ref());
        let expected_content = format!("eval{}", "(".repeat(depth + 1));
        assert_eq!(pattern.map(|p| p.content.as_str()), Some(expected_content.as_str()));
        assert_eq!(pattern.map(|p| p.is_complete), Some(false));
        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["'eval' pattern exceeds the maximum parenthesis depth of 20; the rest of it is not analysed"]
        );
    }

    #[test]
    fn truncated_nesting_warns() {
        let config = ParserConfig::default().with_max_nesting_depth(1);
        let src = "rule R\nwhen\n  exists(not(exists(Person())))\nthen\nend";
        let errors = diagnostics(src, &config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.severity), Some(Severity::Warning));
        assert_eq!(errors.first().map(|e| e.range.start.character), Some(9));
    }
}
