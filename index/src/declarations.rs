//! Declaration classifier
//!
//! Recognizes blocks of a configuration file by their first key and turns
//! them into section records.

use crate::position;
use crate::property::extract_property;
use crate::types::TypedSection;
use crate::types::UntypedSection;
use terraform_index_syntax::hcl;
use tracing::warn;

/// A classified block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Variable(UntypedSection),
    Resource(TypedSection),
    Data(TypedSection),
    DefaultProvider(UntypedSection),
    Provider(TypedSection),
    Module(UntypedSection),
    Output(UntypedSection),
}

/// Classify one item of an object list.
///
/// Items whose first key is quoted or not a known keyword are not
/// declarations. Items missing a required key are logged and skipped.
pub fn classify(item: &hcl::ObjectItem, path: &str) -> Option<Declaration> {
    let Some(first) = item.keys.first() else {
        let pos = item.pos();
        warn!(
            path,
            line = pos.line,
            column = pos.column,
            "Ignoring item with no keys"
        );
        return None;
    };
    if first.token.kind != hcl::TokenKind::Ident {
        return None;
    }

    let declaration = match first.token.text.as_str() {
        "variable" => Declaration::Variable(untyped(item, required_key(item, 1, path)?, path)),
        "module" => Declaration::Module(untyped(item, required_key(item, 1, path)?, path)),
        "output" => Declaration::Output(untyped(item, required_key(item, 1, path)?, path)),
        "resource" => Declaration::Resource(typed(item, path)?),
        "data" => Declaration::Data(typed(item, path)?),
        "provider" => match extract_property(item, "alias") {
            None => Declaration::DefaultProvider(untyped(item, &first.token, path)),
            Some(alias) => {
                let ty = required_key(item, 1, path)?;
                Declaration::Provider(TypedSection {
                    ty: ty.unquoted().to_string(),
                    name: alias,
                    location: position::from_config(ty.pos, path),
                    documentation: documentation(item),
                })
            }
        },
        _ => return None,
    };
    Some(declaration)
}

/// `<keyword> "<type>" "<name>"`, located at the name.
fn typed(item: &hcl::ObjectItem, path: &str) -> Option<TypedSection> {
    let ty = required_key(item, 1, path)?;
    let name = required_key(item, 2, path)?;
    Some(TypedSection {
        ty: ty.unquoted().to_string(),
        name: name.unquoted().to_string(),
        location: position::from_config(name.pos, path),
        documentation: documentation(item),
    })
}

fn untyped(item: &hcl::ObjectItem, name: &hcl::Token, path: &str) -> UntypedSection {
    UntypedSection {
        name: name.unquoted().to_string(),
        location: position::from_config(name.pos, path),
        documentation: documentation(item),
    }
}

fn required_key<'a>(item: &'a hcl::ObjectItem, index: usize, path: &str) -> Option<&'a hcl::Token> {
    let key = item.keys.get(index).map(|key| &key.token);
    if key.is_none() {
        let pos = item.pos();
        let keyword = item.keys.first().map_or("", |key| key.token.text.as_str());
        warn!(
            path,
            line = pos.line,
            column = pos.column,
            keyword,
            "Ignoring block missing key #{}",
            index + 1
        );
    }
    key
}

fn documentation(item: &hcl::ObjectItem) -> Vec<String> {
    item.lead_comment
        .as_ref()
        .map(hcl::CommentGroup::lines)
        .unwrap_or_default()
}
