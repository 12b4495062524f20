//! Error types for indexing operations

use terraform_index_syntax::hcl;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error(transparent)]
    Parse(#[from] hcl::ParseError),

    #[error("content is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Root node is not an object list")]
    UnexpectedRoot,
}

pub type IndexResult<T> = Result<T, IndexError>;
