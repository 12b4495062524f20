//! Error type for the interpolation parser

use super::token::Pos;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at {pos}: {message}")]
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
