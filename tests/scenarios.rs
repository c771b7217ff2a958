//! End-to-end parsing scenarios through the public API.

mod test_util;

use drlparse::ast::{ConditionType, ConstraintOperator, DeclareKind, ImportKind, PatternKeyword};
use drlparse::{ParserConfig, Severity, parse, parse_with_config};
use rstest::rstest;
use test_util::{count_severity, first_condition, pattern_of, rule_source, single_rule};

#[test]
fn simple_rule_with_bound_fact() {
    let parsed = parse("rule \"Simple\"\nwhen\n    $p : Person(age > 18)\nthen\n    System.out.println($p);\nend");
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let rule = single_rule(&parsed);
    assert_eq!(rule.name, "Simple");
    assert_eq!(rule.conditions().len(), 1);
    let condition = first_condition(&parsed);
    assert_eq!(condition.variable.as_deref(), Some("$p"));
    assert_eq!(condition.fact_type.as_deref(), Some("Person"));
    assert_eq!(
        rule.then.as_ref().map(|t| t.content.as_str()),
        Some("System.out.println($p);")
    );
}

#[test]
fn exists_spanning_lines_is_complete() {
    let parsed = parse("rule \"R\"\nwhen\n    exists(\n        Person(age > 18)\n    )\nthen\nend");
    let condition = first_condition(&parsed);
    assert!(condition.is_multi_line);
    let pattern = pattern_of(condition);
    assert_eq!(pattern.keyword, PatternKeyword::Exists);
    assert!(pattern.is_complete);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
}

#[test]
fn exists_missing_close_is_reported() {
    let parsed = parse("rule \"R\"\nwhen\n    exists(\n        Person(age > 18)\nthen\nend");
    assert!(count_severity(&parsed, Severity::Error) >= 1);
    assert!(!pattern_of(first_condition(&parsed)).is_complete);
}

#[test]
fn single_line_nested_not() {
    let parsed = parse(&rule_source(
        "Nested",
        &["exists(Person(age>18) and not(Account(balance<0)))"],
        "",
    ));
    let nested = &pattern_of(first_condition(&parsed)).nested_patterns;
    assert_eq!(nested.len(), 1);
    assert_eq!(nested.first().map(|p| p.keyword), Some(PatternKeyword::Not));
}

#[rstest]
#[case("age > 18", "age", ConstraintOperator::Gt, "18")]
#[case("name == \"Bob\"", "name", ConstraintOperator::Eq, "\"Bob\"")]
#[case("address.city != null", "address.city", ConstraintOperator::NotEq, "null")]
#[case("tags contains \"vip\"", "tags", ConstraintOperator::Contains, "\"vip\"")]
#[case("email matches \".*@acme\"", "email", ConstraintOperator::Matches, "\".*@acme\"")]
fn constraints_are_extracted(
    #[case] body: &str,
    #[case] field: &str,
    #[case] operator: ConstraintOperator,
    #[case] value: &str,
) {
    let condition = format!("$p : Person({body})");
    let parsed = parse(&rule_source("C", &[condition.as_str()], ""));
    let constraints = first_condition(&parsed).constraints.clone().unwrap_or_default();
    let Some(first) = constraints.first() else {
        panic!("no constraints parsed from {body}");
    };
    assert_eq!(first.field, field);
    assert_eq!(first.operator, operator);
    assert_eq!(first.value, value);
}

#[test]
fn top_level_statements() {
    let src = "\
package org.example;
import org.example.Person;
import function org.example.Util.check;
global org.example.Log log;

function boolean adult(Person p) {
    return p.getAge() >= 18;
}

declare enum Colour
    RED, GREEN
end

declare trait Named extends Base
    @doc(\"name\")
    name : String @key
end

query \"adults\" (int min, String city)
    $p : Person(age >= min, address.city == city)
end
";
    let parsed = parse(src);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let ast = &parsed.ast;
    assert_eq!(ast.package.as_ref().map(|p| p.name.as_str()), Some("org.example"));
    let kinds: Vec<ImportKind> = ast.imports.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ImportKind::Class, ImportKind::Function]);
    assert_eq!(ast.globals.first().map(|g| g.name.as_str()), Some("log"));

    let Some(function) = ast.functions.first() else {
        panic!("function missing");
    };
    assert_eq!(function.name, "adult");
    assert_eq!(function.return_type.as_deref(), Some("boolean"));
    assert_eq!(function.parameters.len(), 1);

    let declare_kinds: Vec<DeclareKind> = ast.declares.iter().map(|d| d.kind).collect();
    assert_eq!(declare_kinds, vec![DeclareKind::Enum, DeclareKind::Trait]);
    let Some(named) = ast.declares.get(1) else {
        panic!("trait missing");
    };
    assert_eq!(named.super_type.as_deref(), Some("Base"));
    assert_eq!(named.fields.first().map(|f| f.name.as_str()), Some("name"));

    let Some(query) = ast.queries.first() else {
        panic!("query missing");
    };
    assert_eq!(query.name, "adults");
    assert_eq!(query.parameters.len(), 2);
    assert_eq!(query.conditions.len(), 1);
}

#[test]
fn rule_attributes_and_inheritance() {
    let src = "rule \"Child\" extends \"Parent\"\n    salience 10\n    no-loop true\n    @Propagation(IMMEDIATE)\nwhen\nthen\nend";
    let parsed = parse(src);
    let rule = single_rule(&parsed);
    assert_eq!(rule.parent.as_deref(), Some("Parent"));
    assert_eq!(rule.attribute("salience"), Some("10"));
    assert_eq!(rule.attribute("no-loop"), Some("true"));
    assert_eq!(rule.attributes.len(), 3);
}

#[test]
fn several_rules_keep_their_conditions() {
    let mut src = rule_source("One", &["$a : Account()"], "");
    src.push_str(&rule_source(
        "Two",
        &["not Person(age < 18)", "eval(true)"],
        "update($a);",
    ));
    let parsed = parse(&src);
    let counts: Vec<usize> = parsed.ast.rules.iter().map(|r| r.conditions().len()).collect();
    assert_eq!(counts, vec![1, 2]);
    let types: Vec<ConditionType> = parsed
        .ast
        .rules
        .get(1)
        .map(|r| r.conditions().iter().map(|c| c.condition_type).collect())
        .unwrap_or_default();
    assert_eq!(types, vec![ConditionType::Not, ConditionType::Eval]);
}

#[test]
fn configured_nesting_cap_applies() {
    let config = ParserConfig::default().with_max_nesting_depth(1);
    let parsed = parse_with_config(
        &rule_source("Cap", &["exists(not(exists(Person())))"], ""),
        &config,
    );
    assert_eq!(pattern_of(first_condition(&parsed)).max_depth(), 1);
    assert_eq!(count_severity(&parsed, Severity::Warning), 1);
}

#[test]
fn stray_closing_bracket_is_an_error() {
    let parsed = parse(&rule_source("Stray", &["$p : Person(age > 1))"], ""));
    assert!(count_severity(&parsed, Severity::Error) >= 1);
}

#[test]
fn errors_serialise_with_lowercase_severity() {
    let parsed = parse("rule R\nwhen\n  exists(\nthen\nend");
    let json = serde_json::to_value(&parsed.errors).unwrap_or_default();
    assert_eq!(json[0]["severity"], "error");
    assert!(json[0]["range"]["start"]["line"].is_u64());
}
