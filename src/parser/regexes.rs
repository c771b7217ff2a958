//! Compiled patterns for the line-oriented recognisers.

use std::sync::LazyLock;

use regex::Regex;

#[expect(clippy::expect_used, reason = "patterns are literals checked by tests")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

/// `$var : Type(` at the start of a condition.
pub(crate) static BINDING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\$?\w+)\s*:\s*([\w.]+)\s*\("));

/// `Type(` at the start of a condition.
pub(crate) static BARE_FACT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([A-Za-z_][\w.]*)\s*\("));

/// Lines that open a new condition inside a `when` block or query body.
pub(crate) static CONDITION_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(?:\$?\w+\s*:|(?:exists|not|eval|forall|collect|accumulate)\s*\(|(?:not|exists)\s+[\$\w]|[A-Z][\w.]*\s*\()",
    )
});

pub(crate) static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^package\s+([\w.]+)\s*;?"));

pub(crate) static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^import\s+(?:(static|function)\s+)?([\w.]+(?:\.\*)?)\s*;?")
});

pub(crate) static GLOBAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^global\s+([\w.<>\[\],]+)\s+(\w+)\s*;?"));

pub(crate) static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^function\s+(?:([\w.<>\[\],]+)\s+)?(\w+)\s*\("));

/// `Type name` inside a parameter list.
pub(crate) static PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([\w.<>\[\],]+(?:\s*\[\])?)\s+(\w+)$"));

pub(crate) static RULE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"^rule\s+(?:"([^"]*)"|'([^']*)'|([\w.-]+))(?:\s+extends\s+(?:"([^"]*)"|'([^']*)'|([\w.-]+)))?"#,
    )
});

/// `salience 10`, `no-loop`, `agenda-group "g"` or `@Annotation(...)`.
pub(crate) static RULE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(@\w+|[a-z][\w-]*)(?:\s*(.*?))?\s*;?$"));

pub(crate) static QUERY: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^query\s+(?:"([^"]*)"|'([^']*)'|([\w.-]+))\s*(?:\((.*)\))?"#)
});

pub(crate) static DECLARE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^declare\s+(?:(trait|enum)\s+)?([\w.]+)(?:\s+extends\s+([\w.]+))?")
});

/// `name : Type` line of a declared type, annotations left in the tail.
pub(crate) static FIELD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\w+)\s*:\s*([\w.<>\[\],]+)\s*(.*)$"));

/// One `@name` or `@name(...)` annotation.
pub(crate) static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"@\w+(?:\([^)]*\))?"));
