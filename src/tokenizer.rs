//! Lexical analysis for DRL source.
//!
//! This module exposes `tokenize_with_trivia` and `tokenize_without_trivia`
//! which convert raw text into a sequence of `(SyntaxKind, Span)` pairs. It
//! uses the `logos` crate so that string literals and comments come out as
//! single tokens, which lets the keyword searches and splitters ignore their
//! content without re-implementing the masking rules.

use logos::Logos;
use phf::phf_map;

use crate::SyntaxKind;

/// Byte range for a token within the source.
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[regex(r"/\*([^*]|\*[^/])*\*/", priority = 2)]
    #[regex(r"//[^\n]*")]
    Comment,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Variable,
    #[regex(r"[0-9]+(?:\.[0-9]+)?[lLdDfFbB]?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[regex(r"[-+*/%^~?#|&]")]
    Operator,
}

/// Maps identifier strings to their keyword `SyntaxKind`.
///
/// Only words that change how the scanners read a line are listed; every
/// other identifier stays `T_IDENT`.
static KEYWORDS: phf::Map<&'static str, SyntaxKind> = phf_map! {
    "exists" => SyntaxKind::K_EXISTS,
    "not" => SyntaxKind::K_NOT,
    "eval" => SyntaxKind::K_EVAL,
    "forall" => SyntaxKind::K_FORALL,
    "collect" => SyntaxKind::K_COLLECT,
    "accumulate" => SyntaxKind::K_ACCUMULATE,
    "and" => SyntaxKind::K_AND,
    "or" => SyntaxKind::K_OR,
    "from" => SyntaxKind::K_FROM,
    "matches" => SyntaxKind::K_MATCHES,
    "contains" => SyntaxKind::K_CONTAINS,
    "memberOf" => SyntaxKind::K_MEMBER_OF,
    "package" => SyntaxKind::K_PACKAGE,
    "import" => SyntaxKind::K_IMPORT,
    "global" => SyntaxKind::K_GLOBAL,
    "function" => SyntaxKind::K_FUNCTION,
    "rule" => SyntaxKind::K_RULE,
    "query" => SyntaxKind::K_QUERY,
    "declare" => SyntaxKind::K_DECLARE,
    "when" => SyntaxKind::K_WHEN,
    "then" => SyntaxKind::K_THEN,
    "end" => SyntaxKind::K_END,
    "extends" => SyntaxKind::K_EXTENDS,
};

fn keyword_kind(ident: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(ident).copied()
}

#[must_use]
fn tokenize_impl(src: &str) -> Vec<(SyntaxKind, Span)> {
    let mut lexer = Token::lexer(src);
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "rough capacity estimate"
    )]
    let estimated_tokens = src.len() / 3;
    let mut out = Vec::with_capacity(estimated_tokens);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let Ok(token) = result else {
            out.push((SyntaxKind::N_ERROR, span));
            continue;
        };
        let kind = match token {
            Token::Whitespace => SyntaxKind::T_WHITESPACE,
            Token::Comment => SyntaxKind::T_COMMENT,
            Token::Ident => src
                .get(span.clone())
                .and_then(keyword_kind)
                .unwrap_or(SyntaxKind::T_IDENT),
            Token::Variable => SyntaxKind::T_VARIABLE,
            Token::Number => SyntaxKind::T_NUMBER,
            Token::String => SyntaxKind::T_STRING,
            Token::LParen => SyntaxKind::T_LPAREN,
            Token::RParen => SyntaxKind::T_RPAREN,
            Token::LBrace => SyntaxKind::T_LBRACE,
            Token::RBrace => SyntaxKind::T_RBRACE,
            Token::LBracket => SyntaxKind::T_LBRACKET,
            Token::RBracket => SyntaxKind::T_RBRACKET,
            Token::Comma => SyntaxKind::T_COMMA,
            Token::Semi => SyntaxKind::T_SEMI,
            Token::Colon => SyntaxKind::T_COLON,
            Token::Dot => SyntaxKind::T_DOT,
            Token::At => SyntaxKind::T_AT,
            Token::EqEq => SyntaxKind::T_EQEQ,
            Token::Neq => SyntaxKind::T_NEQ,
            Token::Lte => SyntaxKind::T_LTE,
            Token::Gte => SyntaxKind::T_GTE,
            Token::Lt => SyntaxKind::T_LT,
            Token::Gt => SyntaxKind::T_GT,
            Token::Eq => SyntaxKind::T_EQ,
            Token::AndAnd => SyntaxKind::T_AND_AND,
            Token::OrOr => SyntaxKind::T_OR_OR,
            Token::Bang => SyntaxKind::T_BANG,
            Token::Operator => SyntaxKind::T_OPERATOR,
        };
        out.push((kind, span));
    }
    out
}

/// Tokenise the source, excluding whitespace and comments.
///
/// # Examples
///
/// ```rust
/// use drlparse::{tokenize_without_trivia, SyntaxKind};
///
/// let tokens = tokenize_without_trivia("$p : Person(age > 18) // adult");
/// assert!(!tokens.iter().any(|(k, _)| k.is_trivia()));
/// assert_eq!(tokens.first().map(|t| t.0), Some(SyntaxKind::T_VARIABLE));
/// ```
#[must_use]
pub fn tokenize_without_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
        .into_iter()
        .filter(|(k, _)| !k.is_trivia())
        .collect()
}

/// Tokenise the provided DRL text.
///
/// This variant retains whitespace and comment tokens, which the logical
/// splitter needs to check word boundaries.
///
/// # Examples
///
/// ```rust
/// use drlparse::{tokenize_with_trivia, SyntaxKind};
///
/// let tokens = tokenize_with_trivia("not(Person())");
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[0].0, SyntaxKind::K_NOT);
/// ```
#[must_use]
pub fn tokenize_with_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(src: &str) -> Vec<SyntaxKind> {
        tokenize_without_trivia(src).into_iter().map(|(k, _)| k).collect()
    }

    #[rstest]
    #[case("exists", SyntaxKind::K_EXISTS)]
    #[case("accumulate", SyntaxKind::K_ACCUMULATE)]
    #[case("memberOf", SyntaxKind::K_MEMBER_OF)]
    #[case("android", SyntaxKind::T_IDENT)]
    #[case("$person", SyntaxKind::T_VARIABLE)]
    #[case("\"a ( b\"", SyntaxKind::T_STRING)]
    #[case("'x)'", SyntaxKind::T_STRING)]
    fn single_tokens(#[case] src: &str, #[case] expected: SyntaxKind) {
        assert_eq!(kinds(src), vec![expected]);
    }

    #[test]
    fn comments_swallow_brackets() {
        let tokens = tokenize_with_trivia("a /* ( */ b // )");
        let brackets = tokens
            .iter()
            .filter(|(k, _)| matches!(k, SyntaxKind::T_LPAREN | SyntaxKind::T_RPAREN))
            .count();
        assert_eq!(brackets, 0);
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        assert_eq!(
            kinds(r#"name == "say \"hi\"""#),
            vec![SyntaxKind::T_IDENT, SyntaxKind::T_EQEQ, SyntaxKind::T_STRING]
        );
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(
            kinds("a <= b && c != d"),
            vec![
                SyntaxKind::T_IDENT,
                SyntaxKind::T_LTE,
                SyntaxKind::T_IDENT,
                SyntaxKind::T_AND_AND,
                SyntaxKind::T_IDENT,
                SyntaxKind::T_NEQ,
                SyntaxKind::T_IDENT,
            ]
        );
    }
}
