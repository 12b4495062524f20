//! Adapters between the two parser coordinate systems and [`Position`]
//!
//! Parser positions never leave this module unconverted: the configuration
//! parser reports `{offset, line, column}` (tree-sitter's 0-based byte points
//! already shifted to 1-based characters), the interpolation parser reports
//! `{line, column}` with no offset.

use crate::types::Position;
use terraform_index_syntax::hcl;
use terraform_index_syntax::hil;

/// Configuration-parser position, stamped with `path`.
pub fn from_config(pos: hcl::Pos, path: &str) -> Position {
    Position::new(path, pos.offset, pos.line, pos.column)
}

/// Interpolation-parser position, stamped with `path`. The offset is lost.
pub fn from_expression(pos: hil::Pos, path: &str) -> Position {
    Position::new(path, 0, pos.line, pos.column)
}

/// Starting basis for parsing a configuration literal as an interpolation.
pub const fn to_expression(pos: hcl::Pos) -> hil::Pos {
    hil::Pos::new(pos.line, pos.column)
}
