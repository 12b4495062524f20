//! terraform-ast: dumps the variables, resources and outputs of one file

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use terraform_index::AstDump;
use terraform_index::parse_bytes;
use terraform_index_cli::STDIN_PATH;
use terraform_index_cli::init_tracing;
use terraform_index_cli::read_contents;

/// Dumps the declarations of a Terraform file, optionally with its syntax tree
#[derive(Parser, Debug)]
#[command(name = "terraform-ast")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Include the raw syntax tree in the output
    #[arg(long)]
    raw_ast: bool,

    /// Verbosity level (ignored when RUST_LOG is set)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// File to parse; `-` reads standard input
    #[arg(long, default_value = STDIN_PATH, value_name = "PATH")]
    file: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let content = match read_contents(&cli.file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return Ok(ExitCode::from(1));
        }
    };

    let file = match parse_bytes(&content) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("ERROR: Cannot parse '{}': {err}", cli.file);
            return Ok(ExitCode::from(2));
        }
    };

    let mut dump = match AstDump::collect(Arc::new(file), &cli.file) {
        Ok(dump) => dump,
        Err(err) => {
            eprintln!("ERROR: Could not collect dump: {err}");
            return Ok(ExitCode::from(3));
        }
    };
    if !cli.raw_ast {
        dump.raw_ast = None;
    }

    let Ok(json) = serde_json::to_string_pretty(&dump) else {
        return Ok(ExitCode::from(3));
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write dump to stdout")?;
    Ok(ExitCode::SUCCESS)
}
