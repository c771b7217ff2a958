//! Parsers for individual top-level statements.
//!
//! Each submodule handles one statement category. Every parser starts with
//! the stream's cursor on the statement's first line and leaves it on the
//! first line after the statement, always advancing by at least one line.

mod declares;
mod functions;
mod imports;
mod queries;
mod rules;
pub(crate) mod utils;

pub(crate) use declares::parse_declare;
pub(crate) use functions::parse_function;
pub(crate) use imports::{parse_global, parse_import, parse_package};
pub(crate) use queries::parse_query;
pub(crate) use rules::parse_rule;
