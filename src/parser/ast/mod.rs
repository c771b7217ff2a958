//! Typed AST produced by the DRL parser.
//!
//! Every node is created fresh per parse and owned by its parent; nodes never
//! point at each other, only at source ranges, so the tree and the error list
//! can be serialised independently. The incremental controller works on a
//! deep copy, which is why every node is `Clone` and implements
//! [`LineShift`].

mod condition;
mod declare;
mod function;
mod import;
mod pattern;
mod position;
mod query;
mod root;
mod rule;

pub use condition::{ConditionNode, ConditionType, Constraint, ConstraintOperator};
pub use declare::{DeclareKind, DeclareNode, FieldNode};
pub use function::{FunctionNode, ParameterNode};
pub use import::{GlobalNode, ImportKind, ImportNode, PackageNode};
pub use pattern::{MultiLinePatternNode, PatternKeyword};
pub use position::{LineShift, Position, Range, Ranged};
pub use query::QueryNode;
pub use root::DroolsFile;
pub use rule::{RuleAttribute, RuleNode, ThenNode, WhenNode};

pub(crate) use position::{char_column, end_of_line, position_at};
