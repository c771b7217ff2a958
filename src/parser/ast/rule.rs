//!
//! AST nodes for rule declarations.
//!
//! A [`RuleNode`] owns its attributes plus the optional `when` and `then`
//! blocks. When both blocks are present they lie inside the rule's range and
//! the `when` block ends before the `then` block starts.
//!
//! # Examples
//!
//! ```rust
//! use drlparse::parse;
//!
//! let result = parse("rule \"Adults\"\n    salience 10\nwhen\n    $p : Person(age >= 18)\nthen\nend");
//! let rule = &result.ast.rules[0];
//! assert_eq!(rule.name, "Adults");
//! assert_eq!(rule.attribute("salience"), Some("10"));
//! ```

use serde::{Deserialize, Serialize};

use super::{ConditionNode, LineShift, Range, Ranged};

/// A rule attribute such as `salience 10` or `no-loop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAttribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub range: Range,
}

/// The condition block of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenNode {
    pub conditions: Vec<ConditionNode>,
    pub range: Range,
}

/// The action block of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThenNode {
    pub content: String,
    pub range: Range,
}

/// A `rule "name" … end` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleNode {
    /// Empty when the header carries no name yet.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub attributes: Vec<RuleAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<WhenNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub then: Option<ThenNode>,
    pub range: Range,
}

impl RuleNode {
    /// Value of the first attribute called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_deref())
    }

    /// Conditions of the `when` block, empty when the block is missing.
    #[must_use]
    pub fn conditions(&self) -> &[ConditionNode] {
        self.when.as_ref().map_or(&[], |when| &when.conditions)
    }
}

impl Ranged for RuleNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for RuleAttribute {
    fn shift_lines(&mut self, delta: isize) {
        self.range.shift_lines(delta);
    }
}

impl LineShift for WhenNode {
    fn shift_lines(&mut self, delta: isize) {
        self.conditions.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl LineShift for ThenNode {
    fn shift_lines(&mut self, delta: isize) {
        self.range.shift_lines(delta);
    }
}

impl LineShift for RuleNode {
    fn shift_lines(&mut self, delta: isize) {
        self.attributes.shift_lines(delta);
        self.when.shift_lines(delta);
        self.then.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
