//! Conditions inside `when` blocks and query bodies.
//!
//! A [`ConditionNode`] keeps the raw text of one condition together with a
//! best-effort projection: its type, an optional `$binding : FactType(...)`
//! shape and a flat list of simple constraints. Fields that could not be
//! recognised are left empty rather than reported.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{LineShift, MultiLinePatternNode, PatternKeyword, Range, Ranged};

/// The syntactic role of a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    #[default]
    Pattern,
    Exists,
    Not,
    Eval,
    Forall,
    Collect,
    Accumulate,
    And,
    Or,
}

impl From<PatternKeyword> for ConditionType {
    fn from(keyword: PatternKeyword) -> Self {
        match keyword {
            PatternKeyword::Exists => Self::Exists,
            PatternKeyword::Not => Self::Not,
            PatternKeyword::Eval => Self::Eval,
            PatternKeyword::Forall => Self::Forall,
            PatternKeyword::Collect => Self::Collect,
            PatternKeyword::Accumulate => Self::Accumulate,
        }
    }
}

/// Comparison operators recognised in constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "matches")]
    Matches,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "memberOf")]
    MemberOf,
    #[serde(rename = "not memberOf")]
    NotMemberOf,
}

impl ConstraintOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Matches => "matches",
            Self::Contains => "contains",
            Self::MemberOf => "memberOf",
            Self::NotMemberOf => "not memberOf",
        }
    }
}

impl fmt::Display for ConstraintOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `field operator value` constraint from a fact pattern body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub field: String,
    pub operator: ConstraintOperator,
    pub value: String,
}

/// One condition of a rule or query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    pub content: String,
    pub condition_type: ConditionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<Constraint>>,
    pub is_multi_line: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_line_pattern: Option<MultiLinePatternNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_conditions: Option<Vec<ConditionNode>>,
    pub span_lines: Vec<usize>,
    pub parentheses_ranges: Vec<Range>,
    pub range: Range,
}

impl Ranged for ConditionNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for ConditionNode {
    fn shift_lines(&mut self, delta: isize) {
        self.multi_line_pattern.shift_lines(delta);
        self.nested_conditions.shift_lines(delta);
        for line in &mut self.span_lines {
            *line = line.saturating_add_signed(delta);
        }
        self.parentheses_ranges.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
