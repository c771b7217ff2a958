//! Multi-line logical patterns.
//!
//! A [`MultiLinePatternNode`] describes one `exists`/`not`/`eval`/`forall`/
//! `collect`/`accumulate` construct whose argument list may span lines and
//! nest. Children sit one level deeper than their parent; the builder stops
//! adding children once the configured depth cap is reached.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConditionNode, LineShift, Range, Ranged};

/// Keywords that open a multi-line pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKeyword {
    Exists,
    Not,
    Eval,
    Forall,
    Collect,
    Accumulate,
}

impl PatternKeyword {
    /// Every pattern keyword in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Exists,
        Self::Not,
        Self::Eval,
        Self::Forall,
        Self::Collect,
        Self::Accumulate,
    ];

    /// The keyword as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Not => "not",
            Self::Eval => "eval",
            Self::Forall => "forall",
            Self::Collect => "collect",
            Self::Accumulate => "accumulate",
        }
    }

    /// Look a keyword up by its source spelling.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }
}

impl fmt::Display for PatternKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical pattern construct and its decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLinePatternNode {
    pub keyword: PatternKeyword,
    /// Text from the keyword through the closing parenthesis, or to the end
    /// of the scanned input when the pattern is incomplete.
    pub content: String,
    pub is_complete: bool,
    /// Nesting level; 0 for a pattern that heads a condition.
    pub depth: usize,
    pub nested_patterns: Vec<MultiLinePatternNode>,
    /// The body split on top-level `and`/`or`.
    pub inner_conditions: Vec<ConditionNode>,
    pub parentheses_ranges: Vec<Range>,
    pub range: Range,
}

impl MultiLinePatternNode {
    /// Alias for [`keyword`](Self::keyword) matching the condition tag names.
    #[must_use]
    pub fn pattern_type(&self) -> PatternKeyword {
        self.keyword
    }

    /// Depth of the deepest descendant, counting this node.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        let mut deepest = self.depth;
        let mut stack: Vec<&Self> = self.nested_patterns.iter().collect();
        while let Some(node) = stack.pop() {
            deepest = deepest.max(node.depth);
            stack.extend(node.nested_patterns.iter());
        }
        deepest
    }
}

impl Ranged for MultiLinePatternNode {
    fn range(&self) -> Range {
        self.range
    }
}

impl LineShift for MultiLinePatternNode {
    fn shift_lines(&mut self, delta: isize) {
        self.nested_patterns.shift_lines(delta);
        self.inner_conditions.shift_lines(delta);
        self.parentheses_ranges.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
