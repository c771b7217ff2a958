//! Shared helpers for the integration tests.
//!
//! They mirror the crate's `test_util` module without requiring the
//! `test-support` feature, so the tests compile against the plain library.

#![expect(
    dead_code,
    reason = "helpers are reused across multiple tests so some may be unused"
)]

use drlparse::ParseResult;
use drlparse::Severity;
use drlparse::ast::{ConditionNode, MultiLinePatternNode, RuleNode};

/// Build a rule whose `when` block holds `conditions`, one per line.
#[must_use]
pub fn rule_source(name: &str, conditions: &[&str], action: &str) -> String {
    let mut src = format!("rule \"{name}\"\nwhen\n");
    for condition in conditions {
        src.push_str("    ");
        src.push_str(condition);
        src.push('\n');
    }
    src.push_str("then\n");
    if !action.is_empty() {
        src.push_str("    ");
        src.push_str(action);
        src.push('\n');
    }
    src.push_str("end\n");
    src
}

/// The only rule of `result`.
///
/// # Panics
/// Panics unless exactly one rule was parsed.
#[track_caller]
#[must_use]
pub fn single_rule(result: &ParseResult) -> &RuleNode {
    match result.ast.rules.as_slice() {
        [rule] => rule,
        rules => panic!("expected one rule, got {}", rules.len()),
    }
}

/// The first `when` condition of the only rule.
///
/// # Panics
/// Panics if the rule has no conditions.
#[track_caller]
#[must_use]
pub fn first_condition(result: &ParseResult) -> &ConditionNode {
    single_rule(result)
        .conditions()
        .first()
        .unwrap_or_else(|| panic!("rule has no conditions"))
}

/// The multi-line pattern of `condition`.
///
/// # Panics
/// Panics if the condition carries none.
#[track_caller]
#[must_use]
pub fn pattern_of(condition: &ConditionNode) -> &MultiLinePatternNode {
    condition
        .multi_line_pattern
        .as_ref()
        .unwrap_or_else(|| panic!("no pattern on {:?}", condition.content))
}

/// Count the diagnostics of `severity`.
#[must_use]
pub fn count_severity(result: &ParseResult, severity: Severity) -> usize {
    result
        .errors
        .iter()
        .filter(|e| e.severity == severity)
        .count()
}

/// Messages of every diagnostic, in document order.
#[must_use]
pub fn error_messages(result: &ParseResult) -> Vec<&str> {
    result.errors.iter().map(|e| e.message.as_str()).collect()
}
