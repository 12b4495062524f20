//! Error type for the configuration parser

use super::token::Pos;
use thiserror::Error;

/// A syntax failure, carrying the position it was detected at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("At {pos}: {message}")]
pub struct ParseError {
    pub pos: Pos,
    pub message: String,
}

impl ParseError {
    pub fn new(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
