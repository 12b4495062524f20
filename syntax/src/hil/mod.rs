//! Interpolation language embedded in configuration string literals
//!
//! A template is literal text with `${ expr }` sequences; `$${` is an escaped
//! `${`. Parsing never evaluates anything, it only produces a tree whose
//! [`Node::VariableAccess`] nodes are what the indexer cares about.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::ArithmeticOp;
pub use ast::LiteralValue;
pub use ast::Node;
pub use ast::UnaryOp;
pub use error::ParseError;
pub use error::ParseResult;
pub use parser::MAX_DEPTH;
pub use parser::parse;
pub use parser::parse_with_position;
pub use token::Pos;
