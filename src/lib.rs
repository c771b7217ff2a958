//! Library crate for drlparse.
//!
//! Parses Drools rule language (DRL) documents into a typed AST for editor
//! tooling, with structured diagnostics, multi-line pattern analysis and
//! incremental re-parsing.

#![forbid(unsafe_code)]

pub mod config;
pub mod language;
pub mod parser;
pub mod tokenizer;

// Only expose test utilities to tests and opt-in consumers.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_util;

pub use config::ParserConfig;
pub use language::{StatementKind, SyntaxKind};
pub use parser::errors::{ParseError, Severity};
pub use parser::incremental::{
    CacheError, CacheHandle, DocumentKey, InMemoryPatternCache, IncrementalOptions, LineSpan,
    ParenthesesMetadata, PatternCache, PatternMetadata, seed_cache,
};
pub use parser::{ParseResult, ast, parse, parse_incremental, parse_with_config};
pub use tokenizer::{Span, tokenize_with_trivia, tokenize_without_trivia};
