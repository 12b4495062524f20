//! Reference resolver
//!
//! Every configuration literal is parsed as an interpolation template and
//! each variable access in it becomes a [`Reference`].

use crate::position;
use crate::types::Position;
use crate::types::SourceError;
use terraform_index_syntax::hcl;
use terraform_index_syntax::hil;
use tracing::trace;
use tracing::warn;

/// One variable access found in a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Canonical name: the second dotted component.
    pub name: String,
    pub kind: String,
    pub path: Option<String>,
    pub location: Position,
}

/// Split a dotted access into `(kind, name, path)`.
///
/// `var` is canonicalized to `variable`; everything after the second
/// component is kept verbatim as the path. `None` for fewer than two
/// components.
pub fn split_reference(access: &str) -> Option<(String, String, Option<String>)> {
    let mut parts = access.splitn(3, '.');
    let kind = parts.next()?;
    let name = parts.next()?;
    let path = parts.next().map(str::to_string);
    let kind = match kind {
        "var" => "variable",
        other => other,
    };
    Some((kind.to_string(), name.to_string(), path))
}

/// References found in `literal`, in the order the expression tree yields them.
///
/// A literal that does not parse as a template yields a [`SourceError`]
/// positioned inside that literal.
pub fn resolve_literal(
    literal: &hcl::LiteralType,
    path: &str,
) -> Result<Vec<Reference>, SourceError> {
    let start = position::to_expression(literal.token.pos);
    let tree = hil::parse_with_position(&literal.token.text, start).map_err(|err| {
        SourceError::new(err.message, position::from_expression(err.pos, path))
    })?;

    let mut references = Vec::new();
    tree.walk(&mut |node| {
        let hil::Node::VariableAccess { name: access, pos } = node else {
            return;
        };
        match split_reference(access) {
            Some((kind, name, attribute)) => {
                trace!(path, line = pos.line, column = pos.column, %access, "reference");
                references.push(Reference {
                    name,
                    kind,
                    path: attribute,
                    location: position::from_expression(*pos, path),
                });
            }
            None => warn!(
                path,
                line = pos.line,
                column = pos.column,
                "Cannot understand reference {access}"
            ),
        }
    });
    Ok(references)
}
