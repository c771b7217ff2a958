//! Tests for the parser entry points and integration scenarios.

mod robustness;

use super::{ParseResult, parse};
use crate::test_util::{assert_no_errors, first_condition, rule_source, single_rule};
use rstest::{fixture, rstest};

#[fixture]
fn simple_rule() -> ParseResult {
    parse("rule \"Simple\"\nwhen\n    $p : Person(age > 18)\nthen\n    System.out.println($p);\nend")
}

#[rstest]
fn simple_rule_has_one_bound_condition(simple_rule: ParseResult) {
    assert_no_errors(&simple_rule);
    let rule = single_rule(&simple_rule);
    assert_eq!(rule.name, "Simple");
    assert_eq!(rule.conditions().len(), 1);
    let condition = first_condition(&simple_rule);
    assert_eq!(condition.variable.as_deref(), Some("$p"));
    assert_eq!(condition.fact_type.as_deref(), Some("Person"));
    assert!(!condition.is_multi_line);
    assert!(condition.multi_line_pattern.is_none());
}

#[rstest]
fn document_range_spans_all_lines(simple_rule: ParseResult) {
    assert_eq!(simple_rule.ast.line_count(), 6);
    assert_eq!(simple_rule.ast.range.end.character, 3);
}

#[test]
fn parses_every_statement_kind() {
    let src = "\
package com.acme.rules;

import com.acme.Person;
import static com.acme.Util.check;
global java.util.List results;

function int twice(int x) {
    return x * 2;
}

declare Account
    balance : double
end

query \"rich\" (double min)
    Account(balance > min)
end

rule \"Adults\"
    salience 10
when
    $p : Person(age >= 18)
then
    results.add($p);
end
";
    let result = parse(src);
    assert_no_errors(&result);
    let ast = &result.ast;
    assert_eq!(ast.package.as_ref().map(|p| p.name.as_str()), Some("com.acme.rules"));
    assert_eq!(ast.imports.len(), 2);
    assert_eq!(ast.globals.len(), 1);
    assert_eq!(ast.functions.len(), 1);
    assert_eq!(ast.declares.len(), 1);
    assert_eq!(ast.queries.len(), 1);
    assert_eq!(ast.rules.len(), 1);
    assert_eq!(ast.rules.first().and_then(|r| r.attribute("salience")), Some("10"));
}

#[test]
fn conditions_keep_document_order() {
    let src = rule_source(
        "Order",
        &["$a : Account()", "not Person(name == \"x\")", "eval($a.balance > 0)"],
        "",
    );
    let result = parse(&src);
    let lines: Vec<usize> = single_rule(&result)
        .conditions()
        .iter()
        .map(|c| c.range.start.line)
        .collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn capped_errors_truncates() {
    let result = parse("rule R\nwhen\n  exists(\nthen\nend\n(((");
    assert!(result.errors.len() > 2);
    assert_eq!(result.capped_errors(2).len(), 2);
    assert_eq!(result.capped_errors(100).len(), result.errors.len());
    assert!(result.has_errors());
}

#[test]
fn result_serialises_with_camel_case_fields() {
    let result = parse("rule R\nwhen\n  exists(\n    Person()\n  )\nthen\nend");
    let json = serde_json::to_value(&result).unwrap_or_default();
    let condition = &json["ast"]["rules"][0]["when"]["conditions"][0];
    assert_eq!(condition["conditionType"], "exists");
    assert_eq!(condition["isMultiLine"], true);
    assert_eq!(condition["multiLinePattern"]["isComplete"], true);
    assert_eq!(json["errors"], serde_json::json!([]));
}
