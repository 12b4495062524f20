//! terraform-index: extracts declarations and references from Terraform files

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::num::NonZeroUsize;
use std::process::ExitCode;
use terraform_index_cli::Source;
use terraform_index_cli::index_sources;
use terraform_index_cli::init_tracing;
use terraform_index_cli::read_contents;
use tracing::error;
use tracing::info;

/// Extracts references and declarations from Terraform files
#[derive(Parser, Debug)]
#[command(name = "terraform-index")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Include the raw syntax tree of the last file in the output
    #[arg(long)]
    raw_ast: bool,

    /// Verbosity level (ignored when RUST_LOG is set)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of files parsed concurrently [default: available parallelism]
    #[arg(short, long, env = "TERRAFORM_INDEX_JOBS")]
    jobs: Option<NonZeroUsize>,

    /// Files to index; `-` reads standard input
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut sources = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        match read_contents(path) {
            Ok(content) => sources.push(Source {
                path: path.clone(),
                content,
            }),
            Err(err) => {
                eprintln!("ERROR: {err}");
                return Ok(ExitCode::from(2));
            }
        }
    }

    let (index, failures) = index_sources(&sources, cli.raw_ast, cli.jobs)?;
    for failure in &failures {
        eprintln!("ERROR: Could not parse '{}': {}", failure.path, failure.error);
    }
    info!(
        files = sources.len(),
        failed = failures.len(),
        references = index.references.len(),
        "indexed"
    );

    let json = match serde_json::to_string_pretty(&index) {
        Ok(json) => json,
        Err(err) => {
            error!("failed to serialize index: {err}");
            return Ok(ExitCode::from(3));
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write index to stdout")?;
    Ok(ExitCode::SUCCESS)
}
