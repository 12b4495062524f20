//! Property extractor: reads one attribute out of a block body

use terraform_index_syntax::hcl;

/// Scalar value of property `name` in the body of block `item`.
///
/// `None` when the body is not an object or has no `name = <literal>` entry.
/// The first matching literal wins; quotes are trimmed.
pub fn extract_property(item: &hcl::ObjectItem, name: &str) -> Option<String> {
    let hcl::Node::ObjectType(body) = &item.val else {
        return None;
    };

    body.list.items.iter().find_map(|entry| {
        let key = entry.keys.first()?;
        if key.token.unquoted() != name {
            return None;
        }
        match &entry.val {
            hcl::Node::Literal(literal) => Some(literal.token.unquoted().to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_item(src: &str) -> hcl::ObjectItem {
        let file = hcl::parse(src).unwrap();
        match file.node {
            hcl::Node::ObjectList(mut list) => list.items.remove(0),
            other => panic!("unexpected root {other:?}"),
        }
    }

    #[test]
    fn test_extracts_literal_property() {
        let item = first_item("provider \"aws\" {\n  region = \"us-east-1\"\n  alias = \"east\"\n}\n");
        assert_eq!(extract_property(&item, "alias"), Some("east".to_string()));
        assert_eq!(extract_property(&item, "region"), Some("us-east-1".to_string()));
    }

    #[test]
    fn test_missing_property() {
        let item = first_item("provider \"aws\" {\n  region = \"us-east-1\"\n}\n");
        assert_eq!(extract_property(&item, "alias"), None);
    }

    #[test]
    fn test_non_literal_value_is_skipped() {
        let item = first_item("provider \"aws\" {\n  alias = [\"a\"]\n  alias = \"b\"\n}\n");
        assert_eq!(extract_property(&item, "alias"), Some("b".to_string()));
    }

    #[test]
    fn test_non_object_value() {
        let item = first_item("alias = \"x\"\n");
        assert_eq!(extract_property(&item, "alias"), None);
    }
}
