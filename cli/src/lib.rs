//! Shared plumbing for the `terraform-index` and `terraform-ast` binaries

pub mod error;

pub use error::CliError;
pub use error::Result;

use rayon::prelude::*;
use std::io::Read;
use std::num::NonZeroUsize;
use terraform_index::Index;
use terraform_index::IndexError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Path argument that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Raw content of one input, read before any parsing starts.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: String,
    pub content: Vec<u8>,
}

/// A file that could not be parsed. Its error is also recorded in the index.
#[derive(Debug)]
pub struct Failure {
    pub path: String,
    pub error: IndexError,
}

/// Read `path`, or standard input for `-`.
pub fn read_contents(path: &str) -> Result<Vec<u8>> {
    let open = |source| CliError::Open {
        path: path.to_string(),
        source,
    };

    if path == STDIN_PATH {
        let mut content = Vec::new();
        std::io::stdin().read_to_end(&mut content).map_err(open)?;
        return Ok(content);
    }
    std::fs::read(path).map_err(open)
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::Tracing(err.to_string()))
}

/// Index every source, in parallel, and merge the results in input order.
///
/// `jobs` bounds the worker threads; `None` uses the global rayon pool.
pub fn index_sources(
    sources: &[Source],
    include_raw: bool,
    jobs: Option<NonZeroUsize>,
) -> Result<(Index, Vec<Failure>)> {
    let run = || {
        sources
            .par_iter()
            .map(|source| {
                debug!(path = %source.path, bytes = source.content.len(), "indexing");
                let mut index = Index::new();
                let outcome = index.collect_bytes(&source.content, &source.path, include_raw);
                (index, outcome)
            })
            .collect::<Vec<_>>()
    };

    let partials = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.get())
            .build()?
            .install(run),
        None => run(),
    };

    let mut index = Index::new();
    let mut failures = Vec::new();
    for (source, (partial, outcome)) in sources.iter().zip(partials) {
        if let Err(error) = outcome {
            failures.push(Failure {
                path: source.path.clone(),
                error,
            });
        }
        index.merge(partial);
    }
    Ok((index, failures))
}
