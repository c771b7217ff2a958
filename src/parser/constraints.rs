//! Best-effort projection of a fact pattern body into constraints.
//!
//! The body is split on top-level commas and each piece is matched against
//! `field operator value`. Pieces that do not fit are dropped silently: the
//! embedded expression language is not parsed beyond this shape.

use chumsky::prelude::*;

use crate::parser::ast::{Constraint, ConstraintOperator};
use crate::parser::token_utils::split_top_level_commas;

fn operator() -> impl Parser<char, ConstraintOperator, Error = Simple<char>> {
    let not_member_of = text::keyword("not")
        .then(text::whitespace())
        .then(text::keyword("memberOf"))
        .to(ConstraintOperator::NotMemberOf);

    choice((
        just("==").to(ConstraintOperator::Eq),
        just("!=").to(ConstraintOperator::NotEq),
        just("<=").to(ConstraintOperator::LtEq),
        just(">=").to(ConstraintOperator::GtEq),
        just("<").to(ConstraintOperator::Lt),
        just(">").to(ConstraintOperator::Gt),
        text::keyword("matches").to(ConstraintOperator::Matches),
        text::keyword("contains").to(ConstraintOperator::Contains),
        text::keyword("memberOf").to(ConstraintOperator::MemberOf),
        not_member_of,
    ))
}

fn constraint() -> impl Parser<char, Constraint, Error = Simple<char>> {
    let field = filter(|c: &char| c.is_alphanumeric() || matches!(c, '_' | '.' | '$'))
        .repeated()
        .at_least(1)
        .collect::<String>();
    let value = any().repeated().at_least(1).collect::<String>();

    field
        .then_ignore(text::whitespace())
        .then(operator())
        .then_ignore(text::whitespace())
        .then(value)
        .then_ignore(end())
        .map(|((field, operator), value)| Constraint {
            field,
            operator,
            value: value.trim().to_string(),
        })
}

/// Constraints recognised in the text between a fact pattern's parentheses.
///
/// # Examples
///
/// ```rust
/// use drlparse::parser::ast::ConstraintOperator;
/// use drlparse::parser::constraints::parse_constraints;
///
/// let found = parse_constraints("age >= 18, isAdult(), name matches \"A.*\"");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].operator, ConstraintOperator::GtEq);
/// assert_eq!(found[1].value, "\"A.*\"");
/// ```
#[must_use]
pub fn parse_constraints(body: &str) -> Vec<Constraint> {
    let parser = constraint();
    split_top_level_commas(body)
        .into_iter()
        .filter_map(|(_, piece)| parser.parse(piece).ok())
        .filter(|c| !c.value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("age > 18", "age", ConstraintOperator::Gt, "18")]
    #[case("age>18", "age", ConstraintOperator::Gt, "18")]
    #[case("balance <= 0.5", "balance", ConstraintOperator::LtEq, "0.5")]
    #[case("status != \"closed\"", "status", ConstraintOperator::NotEq, "\"closed\"")]
    #[case("address.city == $city", "address.city", ConstraintOperator::Eq, "$city")]
    #[case("tags contains \"vip\"", "tags", ConstraintOperator::Contains, "\"vip\"")]
    #[case("code memberOf $codes", "code", ConstraintOperator::MemberOf, "$codes")]
    #[case("code not memberOf $codes", "code", ConstraintOperator::NotMemberOf, "$codes")]
    fn recognises_simple_constraints(
        #[case] body: &str,
        #[case] field: &str,
        #[case] operator: ConstraintOperator,
        #[case] value: &str,
    ) {
        let found = parse_constraints(body);
        assert_eq!(
            found,
            vec![Constraint {
                field: field.to_string(),
                operator,
                value: value.to_string(),
            }]
        );
    }

    #[rstest]
    #[case("")]
    #[case("isAdult()")]
    #[case("$n : name")]
    #[case("age >")]
    fn drops_unrecognised_pieces(#[case] body: &str) {
        assert!(parse_constraints(body).is_empty());
    }

    #[test]
    fn commas_inside_calls_do_not_split() {
        let found = parse_constraints("score > max(a, b), name == \"x,y\"");
        let fields: Vec<&str> = found.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["score", "name"]);
        assert_eq!(found.first().map(|c| c.value.as_str()), Some("max(a, b)"));
    }
}
