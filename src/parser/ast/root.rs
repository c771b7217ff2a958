//! The root of a parsed DRL document.
//!
//! [`DroolsFile`] owns every top-level node in document order per category.
//! Its own range spans the whole text, which lets the incremental controller
//! know how many lines the previous parse saw.
//!
//! # Examples
//!
//! ```rust
//! use drlparse::parse;
//!
//! let file = parse("package com.acme;\nimport com.acme.Person;\n").ast;
//! assert_eq!(file.package.map(|p| p.name).as_deref(), Some("com.acme"));
//! assert_eq!(file.imports.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::{
    ConditionNode, DeclareNode, FunctionNode, GlobalNode, ImportNode, LineShift,
    MultiLinePatternNode, PackageNode, QueryNode, Range, RuleNode,
};

/// A whole DRL document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroolsFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageNode>,
    pub imports: Vec<ImportNode>,
    pub globals: Vec<GlobalNode>,
    pub functions: Vec<FunctionNode>,
    pub rules: Vec<RuleNode>,
    pub queries: Vec<QueryNode>,
    pub declares: Vec<DeclareNode>,
    pub range: Range,
}

impl DroolsFile {
    /// Number of lines in the text this AST was built from.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.range.end.line + 1
    }

    /// Whether no top-level construct was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.package.is_none()
            && self.imports.is_empty()
            && self.globals.is_empty()
            && self.functions.is_empty()
            && self.rules.is_empty()
            && self.queries.is_empty()
            && self.declares.is_empty()
    }

    /// Top-level conditions of every rule and query, in document order per
    /// category (rules first).
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionNode> {
        self.rules
            .iter()
            .flat_map(RuleNode::conditions)
            .chain(self.queries.iter().flat_map(|q| q.conditions.iter()))
    }

    /// Multi-line patterns that head a top-level condition.
    pub fn multi_line_patterns(&self) -> impl Iterator<Item = &MultiLinePatternNode> {
        self.conditions()
            .filter_map(|condition| condition.multi_line_pattern.as_ref())
    }
}

impl LineShift for DroolsFile {
    fn shift_lines(&mut self, delta: isize) {
        self.package.shift_lines(delta);
        self.imports.shift_lines(delta);
        self.globals.shift_lines(delta);
        self.functions.shift_lines(delta);
        self.rules.shift_lines(delta);
        self.queries.shift_lines(delta);
        self.declares.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
