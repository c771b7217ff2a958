//! AST nodes for single-line declarations: `package`, `import` and `global`.

use serde::{Deserialize, Serialize};

use super::{LineShift, Range, Ranged};

/// The `package` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageNode {
    pub name: String,
    pub range: Range,
}

/// Which form of `import` was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    #[default]
    Class,
    Static,
    Function,
}

/// An `import [static|function] path;` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportNode {
    /// Imported path, including a trailing `.*` for wildcard imports.
    pub path: String,
    pub kind: ImportKind,
    pub range: Range,
}

impl ImportNode {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.path.ends_with(".*")
    }
}

/// A `global Type name;` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalNode {
    pub data_type: String,
    pub name: String,
    pub range: Range,
}

macro_rules! impl_line_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Ranged for $ty {
                fn range(&self) -> Range {
                    self.range
                }
            }

            impl LineShift for $ty {
                fn shift_lines(&mut self, delta: isize) {
                    self.range.shift_lines(delta);
                }
            }
        )*
    };
}

impl_line_node!(PackageNode, ImportNode, GlobalNode);
