//! Syntax layer for terraform-index
//!
//! Two independent languages live here:
//!
//! - [`hcl`]: the block-structured configuration language, parsed with
//!   tree-sitter. String literals are kept as raw token text, interpolations
//!   inside them are *not* parsed.
//! - [`hil`]: the interpolation language found inside `${ ... }` sequences of
//!   those string literals.
//!
//! Each parser tracks positions in its own coordinate system ([`hcl::Pos`] and
//! [`hil::Pos`]). Reconciling the two is left to the indexing layer.

pub mod hcl;
pub mod hil;
