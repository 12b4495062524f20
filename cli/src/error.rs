//! Errors raised by the command-line front ends

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot open path '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Tracing(String),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
