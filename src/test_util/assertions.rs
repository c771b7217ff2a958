//! Assertion helpers for verifying parse results in tests.

use crate::ParseResult;
use crate::parser::ast::{ConditionNode, MultiLinePatternNode, PatternKeyword};
use crate::parser::errors::Severity;

/// Assert that a parse produced no diagnostics at all.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use drlparse::{parse, test_util::assert_no_errors};
/// assert_no_errors(&parse("rule \"R\"\nwhen\nthen\nend"));
/// # }
/// ```
///
/// # Panics
/// Panics if `result.errors` is not empty.
#[track_caller]
pub fn assert_no_errors(result: &ParseResult) {
    assert!(
        result.errors.is_empty(),
        "unexpected diagnostics: {:?}",
        result.errors
    );
}

/// Assert that some `error`-severity diagnostic mentions `needle`.
///
/// # Panics
/// Panics if no error message contains `needle`.
#[track_caller]
pub fn assert_error_containing(result: &ParseResult, needle: &str) {
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.severity == Severity::Error && e.message.contains(needle)),
        "expected an error containing '{needle}', got {:?}",
        result.errors
    );
}

/// Assert that `condition` carries a multi-line pattern with `keyword` and
/// the given completeness, and return it.
///
/// # Panics
/// Panics if the condition is not multi-line, has no pattern, or the
/// pattern's keyword or completeness differ.
#[track_caller]
pub fn assert_pattern(
    condition: &ConditionNode,
    keyword: PatternKeyword,
    complete: bool,
) -> &MultiLinePatternNode {
    assert!(
        condition.is_multi_line,
        "condition is not multi-line: {:?}",
        condition.content
    );
    let Some(pattern) = condition.multi_line_pattern.as_ref() else {
        panic!("multi-line condition has no pattern: {:?}", condition.content);
    };
    assert_eq!(pattern.keyword, keyword);
    assert_eq!(
        pattern.is_complete, complete,
        "unexpected completeness for {:?}",
        pattern.content
    );
    pattern
}
