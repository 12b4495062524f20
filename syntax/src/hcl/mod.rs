//! Block-structured configuration language
//!
//! ```text
//! # Lead comments document the block below them
//! resource "aws_instance" "web" {
//!   ami = "${var.ami}"
//! }
//! ```
//!
//! Parsing is delegated to the tree-sitter HCL grammar and the result is
//! lowered into an owned, serializable tree. String literals (including the
//! `${ ... }` sequences inside them) are kept verbatim in [`Token::text`];
//! evaluating them is up to [`crate::hil`].

pub mod ast;
pub mod error;
pub mod parser;
pub mod token;

pub use ast::Comment;
pub use ast::CommentGroup;
pub use ast::File;
pub use ast::ListType;
pub use ast::LiteralType;
pub use ast::Node;
pub use ast::NodeRef;
pub use ast::ObjectItem;
pub use ast::ObjectKey;
pub use ast::ObjectList;
pub use ast::ObjectType;
pub use ast::walk;
pub use error::ParseError;
pub use error::ParseResult;
pub use parser::MAX_NESTING;
pub use parser::parse;
pub use token::Pos;
pub use token::Token;
pub use token::TokenKind;
