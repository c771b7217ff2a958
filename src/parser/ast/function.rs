//! AST nodes for `function` declarations.

use serde::{Deserialize, Serialize};

use super::{LineShift, Range, Ranged};

/// A `Type name` parameter of a function or query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterNode {
    pub data_type: String,
    pub name: String,
    pub range: Range,
}

/// A `function ReturnType name(params) { … }` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Parameters that matched `type name`; malformed ones are omitted.
    pub parameters: Vec<ParameterNode>,
    /// Text between the outer braces.
    pub body: String,
    pub range: Range,
}

impl Ranged for FunctionNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for ParameterNode {
    fn shift_lines(&mut self, delta: isize) {
        self.range.shift_lines(delta);
    }
}

impl LineShift for FunctionNode {
    fn shift_lines(&mut self, delta: isize) {
        self.parameters.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
