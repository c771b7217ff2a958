//! Parser limits.
//!
//! `ParserConfig` carries the hard bounds that guarantee termination on
//! pathological input. It is passed explicitly to every entry point; there is
//! no process-wide configuration. Hosts that keep settings in JSON can
//! deserialise it directly since every field has a default.

use serde::{Deserialize, Serialize};

/// Default cap on the depth of the multi-line pattern tree.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 10;
/// Default cap on parenthesis depth while scanning one pattern.
pub const DEFAULT_MAX_PAREN_DEPTH: usize = 20;
/// Default number of lines the recovery scan may look ahead.
pub const DEFAULT_MAX_RESYNC_LOOKAHEAD: usize = 20;
/// Default number of diagnostics a consumer should surface.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// Hard bounds applied while parsing.
///
/// # Examples
///
/// ```rust
/// use drlparse::ParserConfig;
///
/// let config: ParserConfig = serde_json::from_str(r#"{"maxNestingDepth": 4}"#)
///     .expect("valid config");
/// assert_eq!(config.max_nesting_depth, 4);
/// assert_eq!(config.max_paren_depth, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Deepest `MultiLinePatternNode` depth that may still have children.
    pub max_nesting_depth: usize,
    /// Parenthesis depth at which a pattern scan gives up.
    pub max_paren_depth: usize,
    /// Lines the recovery scan inspects before giving up.
    pub max_resync_lookahead: usize,
    /// Diagnostics a consumer should surface; the parser itself never drops any.
    pub max_errors: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_paren_depth: DEFAULT_MAX_PAREN_DEPTH,
            max_resync_lookahead: DEFAULT_MAX_RESYNC_LOOKAHEAD,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl ParserConfig {
    /// Return a copy with a different nesting cap.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Return a copy with a different paren-scan cap.
    #[must_use]
    pub fn with_max_paren_depth(mut self, depth: usize) -> Self {
        self.max_paren_depth = depth;
        self
    }

    /// Return a copy with a different diagnostic cap.
    #[must_use]
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let config = ParserConfig::default();
        assert_eq!(config.max_nesting_depth, 10);
        assert_eq!(config.max_paren_depth, 20);
        assert_eq!(config.max_resync_lookahead, 20);
        assert_eq!(config.max_errors, 100);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config: ParserConfig = match serde_json::from_str("{}") {
            Ok(config) => config,
            Err(err) => panic!("config should deserialise: {err}"),
        };
        assert_eq!(config, ParserConfig::default());
    }
}
