//! AST nodes for `declare` blocks.

use serde::{Deserialize, Serialize};

use super::{LineShift, Range, Ranged};

/// What a `declare` block introduces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclareKind {
    #[default]
    Type,
    Trait,
    Enum,
}

/// A `name : Type @annotation` line of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub name: String,
    pub data_type: String,
    pub annotations: Vec<String>,
    pub range: Range,
}

/// A `declare Name … end` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareNode {
    pub name: String,
    pub kind: DeclareKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type: Option<String>,
    /// Type-level annotations such as `@role(event)`.
    pub annotations: Vec<String>,
    pub fields: Vec<FieldNode>,
    pub range: Range,
}

impl Ranged for DeclareNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for FieldNode {
    fn shift_lines(&mut self, delta: isize) {
        self.range.shift_lines(delta);
    }
}

impl LineShift for DeclareNode {
    fn shift_lines(&mut self, delta: isize) {
        self.fields.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
