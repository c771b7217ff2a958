//! AST node for `query` declarations.

use serde::{Deserialize, Serialize};

use super::{ConditionNode, LineShift, ParameterNode, Range, Ranged};

/// A `query "name" (params) … end` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryNode {
    pub name: String,
    pub parameters: Vec<ParameterNode>,
    pub conditions: Vec<ConditionNode>,
    pub range: Range,
}

impl Ranged for QueryNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for QueryNode {
    fn shift_lines(&mut self, delta: isize) {
        self.parameters.shift_lines(delta);
        self.conditions.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
