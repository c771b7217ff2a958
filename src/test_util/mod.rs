//! Helpers for building DRL sources and asserting over parse results in
//! tests.
//!
//! These functions reduce boilerplate when a test only cares about one rule
//! or one condition of the parsed document.

mod assertions;

pub use assertions::{assert_error_containing, assert_no_errors, assert_pattern};

use crate::ParseResult;
use crate::parser::ast::{ConditionNode, RuleNode};

/// Source of a rule named `name` whose `when` block holds `conditions`,
/// one per line and indented by four spaces.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use drlparse::test_util::rule_source;
/// let src = rule_source("R", &["$p : Person()"], "go();");
/// assert!(src.starts_with("rule \"R\"\nwhen\n    $p : Person()\n"));
/// # }
/// ```
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

/// The first condition of the only rule of `result`.
///
/// # Panics
/// Panics unless exactly one rule with at least one condition was parsed.
#[track_caller]
#[must_use]
pub fn first_condition(result: &ParseResult) -> &ConditionNode {
    let Some(condition) = single_rule(result).conditions().first() else {
        panic!("rule has no conditions");
    };
    condition
}
