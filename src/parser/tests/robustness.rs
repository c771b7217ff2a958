//! Malformed and partial input.

use crate::parser::ast::Position;
use crate::parser::parse;
use crate::test_util::first_condition;
use rstest::rstest;

#[rstest]
#[case("")]
#[case("rule")]
#[case("rule \"x\"\nwhen\n  $p : Person(")]
#[case("when\nthen\nend")]
#[case("function")]
#[case("function void f(")]
#[case("query")]
#[case("declare")]
#[case(")))\n(((")]
#[case("/* never closed\nrule \"R\"")]
#[case("rule R\nwhen\n  eval(\"(\" + x\n")]
#[case("rule R\nwhen\n  exists(not(forall(collect(accumulate(")]
#[case("rule R\n  salience\n  ???\n  !!!\nend")]
fn partial_input_never_fails(#[case] src: &str) {
    let result = parse(src);
    assert!(
        result
            .errors
            .iter()
            .all(|e| !e.message.starts_with("Critical parsing error")),
        "{:?}",
        result.errors
    );
}

#[test]
fn brackets_in_strings_and_comments_are_ignored() {
    let src = "rule R\nwhen\n  $p : Person(name == \"(\") // )\n  /* ( */\nthen\nend";
    let result = parse(src);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(!first_condition(&result).is_multi_line);
}

#[test]
fn crlf_matches_lf() {
    let lf = "rule R\nwhen\n  exists(\n    Person()\n  )\nthen\nend\n";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(lf), parse(&crlf));
}

#[test]
fn columns_count_characters() {
    let result = parse("rule \"é\"\nwhen\n  $ü : Persön(naïve == \"ß\")\nthen\nend");
    let condition = first_condition(&result);
    assert_eq!(condition.range.start, Position::new(2, 2));
    assert_eq!(condition.range.end, Position::new(2, 27));
}

#[test]
fn parse_is_deterministic() {
    let src = "rule A\nwhen\n  exists(\n    Person() and not(Account())\n  )\nthen\nend\nrule B\nwhen\n  eval(\n";
    assert_eq!(parse(src), parse(src));
}
