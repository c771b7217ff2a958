//! Token kinds and keyword tables for DRL source.
//!
//! This module defines the `SyntaxKind` enum covering every token the
//! [`tokenizer`](crate::tokenizer) produces, together with the keyword sets the
//! scanners dispatch on. Lookups go through static `phf` maps so recognising a
//! statement starter or a pattern keyword is a single hash lookup.

use phf::{phf_map, phf_set};

use crate::parser::ast::PatternKeyword;

/// Every token kind produced when lexing DRL text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(non_camel_case_types, reason = "token naming follows keyword spelling")]
pub enum SyntaxKind {
    // Trivia
    T_WHITESPACE,
    T_COMMENT,
    // Atoms
    T_IDENT,
    T_VARIABLE,
    T_STRING,
    T_NUMBER,
    // Delimiters
    T_LPAREN,
    T_RPAREN,
    T_LBRACE,
    T_RBRACE,
    T_LBRACKET,
    T_RBRACKET,
    T_COMMA,
    T_SEMI,
    T_COLON,
    T_DOT,
    T_AT,
    // Operators
    T_EQEQ,
    T_NEQ,
    T_LTE,
    T_GTE,
    T_LT,
    T_GT,
    T_EQ,
    T_AND_AND,
    T_OR_OR,
    T_BANG,
    T_OPERATOR,
    // Pattern keywords
    K_EXISTS,
    K_NOT,
    K_EVAL,
    K_FORALL,
    K_COLLECT,
    K_ACCUMULATE,
    // Logical and constraint keywords
    K_AND,
    K_OR,
    K_FROM,
    K_MATCHES,
    K_CONTAINS,
    K_MEMBER_OF,
    // Statement keywords
    K_PACKAGE,
    K_IMPORT,
    K_GLOBAL,
    K_FUNCTION,
    K_RULE,
    K_QUERY,
    K_DECLARE,
    K_WHEN,
    K_THEN,
    K_END,
    K_EXTENDS,
    // Special
    N_ERROR,
}

impl SyntaxKind {
    /// Whether the token carries no syntactic meaning.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::T_WHITESPACE | Self::T_COMMENT)
    }

    /// The pattern keyword this token spells, if any.
    #[must_use]
    pub fn pattern_keyword(self) -> Option<PatternKeyword> {
        match self {
            Self::K_EXISTS => Some(PatternKeyword::Exists),
            Self::K_NOT => Some(PatternKeyword::Not),
            Self::K_EVAL => Some(PatternKeyword::Eval),
            Self::K_FORALL => Some(PatternKeyword::Forall),
            Self::K_COLLECT => Some(PatternKeyword::Collect),
            Self::K_ACCUMULATE => Some(PatternKeyword::Accumulate),
            _ => None,
        }
    }
}

/// Top-level statements recognised by the statement scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Package,
    Import,
    Global,
    Function,
    Rule,
    Query,
    Declare,
}

/// Words that open a top-level statement when followed by whitespace.
static STATEMENT_STARTERS: phf::Map<&'static str, StatementKind> = phf_map! {
    "package" => StatementKind::Package,
    "import" => StatementKind::Import,
    "global" => StatementKind::Global,
    "function" => StatementKind::Function,
    "rule" => StatementKind::Rule,
    "query" => StatementKind::Query,
    "declare" => StatementKind::Declare,
};

/// Classify a trimmed line by its leading statement keyword.
///
/// The keyword must be followed by whitespace or stand alone on the line, so
/// `rules` or `import;` are not statement starters while a half-typed `rule`
/// still is.
///
/// # Examples
///
/// ```rust
/// use drlparse::language::{StatementKind, statement_kind};
///
/// assert_eq!(statement_kind("rule \"Adults\""), Some(StatementKind::Rule));
/// assert_eq!(statement_kind("ruler"), None);
/// ```
#[must_use]
pub fn statement_kind(trimmed: &str) -> Option<StatementKind> {
    let word = trimmed
        .split_once(char::is_whitespace)
        .map_or(trimmed, |(word, _)| word);
    STATEMENT_STARTERS.get(word).copied()
}

/// Words the recovery scan treats as block boundaries inside a statement.
pub(crate) fn is_block_boundary(trimmed: &str) -> bool {
    matches!(trimmed, "when" | "then" | "end")
}

/// Rule attribute names accepted between a rule header and its `when`.
static RULE_ATTRIBUTES: phf::Set<&'static str> = phf_set! {
    "salience",
    "enabled",
    "no-loop",
    "lock-on-active",
    "auto-focus",
    "agenda-group",
    "activation-group",
    "ruleflow-group",
    "dialect",
    "date-effective",
    "date-expires",
    "duration",
    "timer",
    "calendars",
    "refract",
    "direct",
};

/// Whether `name` is a rule attribute or an annotation.
///
/// # Examples
///
/// ```rust
/// use drlparse::language::is_rule_attribute;
///
/// assert!(is_rule_attribute("no-loop"));
/// assert!(is_rule_attribute("@Propagation"));
/// assert!(!is_rule_attribute("Person"));
/// ```
#[must_use]
pub fn is_rule_attribute(name: &str) -> bool {
    name.starts_with('@') || RULE_ATTRIBUTES.contains(name)
}
