//! CLI entry point for the `drlparse` tool.
//!
//! Parses one DRL file and prints its diagnostics, or the whole parse result
//! as JSON. Exits with status 1 when an error-severity diagnostic was
//! produced and 2 when the file cannot be read or the output cannot be
//! written.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use drlparse::{ParseResult, ParserConfig, parse_with_config};

#[derive(Debug, Parser)]
#[command(name = "drlparse", version, about = "Parse a Drools DRL file and report problems")]
struct Cli {
    /// DRL file to parse.
    file: PathBuf,

    /// Print the AST and diagnostics as JSON.
    #[arg(long)]
    json: bool,

    /// Deepest multi-line pattern nesting to analyse.
    #[arg(long, value_name = "N")]
    max_nesting_depth: Option<usize>,

    /// Number of diagnostics to print.
    #[arg(long, value_name = "N")]
    max_errors: Option<usize>,
}

impl Cli {
    fn config(&self) -> ParserConfig {
        let mut config = ParserConfig::default();
        if let Some(depth) = self.max_nesting_depth {
            config = config.with_max_nesting_depth(depth);
        }
        if let Some(max) = self.max_errors {
            config = config.with_max_errors(max);
        }
        config
    }
}

fn summarise(
    out: &mut impl Write,
    cli: &Cli,
    result: &ParseResult,
    max: usize,
) -> io::Result<()> {
    let file = cli.file.display();
    for error in result.capped_errors(max) {
        writeln!(out, "{file}:{error}")?;
    }
    let ast = &result.ast;
    writeln!(
        out,
        "{file}: {} rules, {} queries, {} functions, {} declares, {} diagnostics",
        ast.rules.len(),
        ast.queries.len(),
        ast.functions.len(),
        ast.declares.len(),
        result.errors.len()
    )
}

fn run(cli: &Cli) -> io::Result<ExitCode> {
    let src = fs::read_to_string(&cli.file)?;
    let config = cli.config();
    let result = parse_with_config(&src, &config);

    let mut out = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        summarise(&mut out, cli, &result, config.max_errors)?;
    }

    Ok(if result.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(io::stderr(), "drlparse: {}: {err}", cli.file.display());
            ExitCode::from(2)
        }
    }
}
