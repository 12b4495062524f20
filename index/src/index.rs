//! Index accumulator

use crate::INDEX_VERSION;
use crate::declarations::Declaration;
use crate::declarations::classify;
use crate::error::IndexError;
use crate::error::IndexResult;
use crate::position;
use crate::references::Reference;
use crate::references::resolve_literal;
use crate::types::Position;
use crate::types::ReferenceList;
use crate::types::SourceError;
use crate::types::TypedSection;
use crate::types::UntypedSection;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use terraform_index_syntax::hcl;
use tracing::debug;

/// Declarations, references and errors collected from one or more files.
///
/// Lists are kept in document order, files in the order they were collected.
/// References are keyed by canonical name only, so a variable and a resource
/// both named `x` share one [`ReferenceList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub version: String,
    pub errors: Vec<SourceError>,
    pub variables: Vec<UntypedSection>,
    pub default_providers: Vec<UntypedSection>,
    pub providers: Vec<TypedSection>,
    pub resources: Vec<TypedSection>,
    pub data_resources: Vec<TypedSection>,
    pub modules: Vec<UntypedSection>,
    pub outputs: Vec<UntypedSection>,
    pub references: BTreeMap<String, ReferenceList>,
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub raw_ast: Option<Arc<hcl::File>>,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    pub fn new() -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            errors: Vec::new(),
            variables: Vec::new(),
            default_providers: Vec::new(),
            providers: Vec::new(),
            resources: Vec::new(),
            data_resources: Vec::new(),
            modules: Vec::new(),
            outputs: Vec::new(),
            references: BTreeMap::new(),
            raw_ast: None,
        }
    }

    /// Index one parsed file in a single traversal.
    ///
    /// Items of every object list, block bodies included, are classified as
    /// declarations; every literal in the tree is scanned for references.
    /// Malformed interpolations are recorded in [`Index::errors`] and never
    /// stop the traversal.
    pub fn collect(&mut self, file: Arc<hcl::File>, path: &str, include_raw: bool) {
        debug!(path, "collecting");
        hcl::walk(&file.node, &mut |node| {
            match node {
                hcl::NodeRef::ObjectList(list) => {
                    for item in &list.items {
                        if let Some(declaration) = classify(item, path) {
                            self.add_declaration(declaration);
                        }
                    }
                }
                hcl::NodeRef::Literal(literal) => match resolve_literal(literal, path) {
                    Ok(references) => {
                        for reference in references {
                            self.add_reference(reference);
                        }
                    }
                    Err(error) => self.errors.push(error),
                },
                _ => {}
            }
            true
        });

        if include_raw {
            self.raw_ast = Some(file);
        }
    }

    /// Parse `content` and index it.
    ///
    /// Content that is not UTF-8 or does not parse is recorded in
    /// [`Index::errors`] and also returned, leaving the rest of the index
    /// untouched.
    pub fn collect_bytes(
        &mut self,
        content: &[u8],
        path: &str,
        include_raw: bool,
    ) -> IndexResult<()> {
        match parse_bytes(content) {
            Ok(file) => {
                self.collect(Arc::new(file), path, include_raw);
                Ok(())
            }
            Err(err) => {
                self.errors.push(source_error(&err, path));
                Err(err)
            }
        }
    }

    /// Fold an independently built index into this one, as if its files had
    /// been collected here after the ones already present.
    pub fn merge(&mut self, other: Index) {
        let Index {
            version: _,
            errors,
            variables,
            default_providers,
            providers,
            resources,
            data_resources,
            modules,
            outputs,
            references,
            raw_ast,
        } = other;

        self.errors.extend(errors);
        self.variables.extend(variables);
        self.default_providers.extend(default_providers);
        self.providers.extend(providers);
        self.resources.extend(resources);
        self.data_resources.extend(data_resources);
        self.modules.extend(modules);
        self.outputs.extend(outputs);

        for (name, list) in references {
            match self.references.entry(name) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.kind = list.kind;
                    existing.path = list.path;
                    existing.locations.extend(list.locations);
                }
                Entry::Vacant(entry) => {
                    entry.insert(list);
                }
            }
        }

        if raw_ast.is_some() {
            self.raw_ast = raw_ast;
        }
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceList> {
        self.references.get(name)
    }

    /// True when nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
            && self.variables.is_empty()
            && self.default_providers.is_empty()
            && self.providers.is_empty()
            && self.resources.is_empty()
            && self.data_resources.is_empty()
            && self.modules.is_empty()
            && self.outputs.is_empty()
            && self.references.is_empty()
    }

    fn add_declaration(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Variable(section) => self.variables.push(section),
            Declaration::Resource(section) => self.resources.push(section),
            Declaration::Data(section) => self.data_resources.push(section),
            Declaration::DefaultProvider(section) => self.default_providers.push(section),
            Declaration::Provider(section) => self.providers.push(section),
            Declaration::Module(section) => self.modules.push(section),
            Declaration::Output(section) => self.outputs.push(section),
        }
    }

    /// Append an occurrence. Kind and path are overwritten by every occurrence.
    fn add_reference(&mut self, reference: Reference) {
        let Reference {
            name,
            kind,
            path,
            location,
        } = reference;
        let list = self
            .references
            .entry(name)
            .or_insert_with_key(|name| ReferenceList {
                name: name.clone(),
                kind: String::new(),
                path: None,
                locations: Vec::new(),
            });
        list.kind = kind;
        list.path = path;
        list.locations.push(location);
    }
}

/// Decode `content` as UTF-8 and parse it as a configuration file.
pub fn parse_bytes(content: &[u8]) -> IndexResult<hcl::File> {
    let source =
        std::str::from_utf8(content).map_err(|err| IndexError::Encoding(err.to_string()))?;
    Ok(hcl::parse(source)?)
}

fn source_error(err: &IndexError, path: &str) -> SourceError {
    match err {
        IndexError::Parse(parse) => {
            SourceError::new(parse.message.clone(), position::from_config(parse.pos, path))
        }
        other => SourceError::new(other.to_string(), Position::new(path, 0, 0, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_index_is_empty_and_versioned() {
        let index = Index::new();
        assert!(index.is_empty());
        assert_eq!(index.version, "1.2.0");
    }

    #[test]
    fn test_collect_bytes_records_parse_error() {
        let mut index = Index::new();
        let err = index
            .collect_bytes(b"variable \"x\" {}\n\n@@@\n", "bad.tf", false)
            .unwrap_err();
        assert!(matches!(err, IndexError::Parse(_)));
        assert_eq!(index.errors.len(), 1);
        assert_eq!(index.errors[0].location.filename, "bad.tf");
        assert_eq!(index.errors[0].location.line, 3);
        assert!(index.variables.is_empty());
    }

    #[test]
    fn test_collect_bytes_rejects_invalid_utf8() {
        let mut index = Index::new();
        let err = index.collect_bytes(&[0xff, 0xfe], "bin.tf", false).unwrap_err();
        assert!(matches!(err, IndexError::Encoding(_)));
        assert_eq!(index.errors.len(), 1);
        assert_eq!(index.errors[0].location, Position::new("bin.tf", 0, 0, 0));
    }

    #[test]
    fn test_nested_object_lists_are_classified() {
        let mut index = Index::new();
        index
            .collect_bytes(
                b"resource \"aws_instance\" \"web\" {\n  provider = \"aws.east\"\n  variable \"x\" {}\n}\n",
                "main.tf",
                false,
            )
            .unwrap();
        assert_eq!(index.resources.len(), 1);
        assert_eq!(
            index.variables,
            vec![UntypedSection {
                name: "x".to_string(),
                location: Position::new("main.tf", 67, 3, 12),
                documentation: Vec::new(),
            }]
        );
        // A `provider` attribute has no alias property, so it reads as a
        // default provider named after its key.
        assert_eq!(index.default_providers.len(), 1);
        assert_eq!(index.default_providers[0].name, "provider");
        assert_eq!(
            index.default_providers[0].location,
            Position::new("main.tf", 34, 2, 3)
        );
    }

    #[test]
    fn test_short_nested_keys_are_skipped() {
        let mut index = Index::new();
        index
            .collect_bytes(
                b"locals {\n  tags = { output = \"web\" }\n}\n",
                "main.tf",
                false,
            )
            .unwrap();
        assert!(index.outputs.is_empty());
        assert!(index.errors.is_empty());
    }

    #[test]
    fn test_raw_ast_is_kept_only_on_request() {
        let mut index = Index::new();
        index.collect_bytes(b"output \"a\" {}\n", "a.tf", false).unwrap();
        assert!(index.raw_ast.is_none());
        index.collect_bytes(b"output \"b\" {}\n", "b.tf", true).unwrap();
        assert!(index.raw_ast.is_some());
    }

    #[test]
    fn test_reference_path_follows_latest_occurrence() {
        let mut index = Index::new();
        index
            .collect_bytes(
                b"a = \"${aws_instance.x.id}\"\nb = \"${var.x}\"\n",
                "main.tf",
                false,
            )
            .unwrap();
        let list = index.reference("x").unwrap();
        assert_eq!(list.kind, "variable");
        assert_eq!(list.path, None);
        assert_eq!(list.locations.len(), 2);
    }

    #[test]
    fn test_merge_matches_sequential_collection() {
        let first: &[u8] = b"variable \"a\" {}\nx = \"${var.a}\"\n";
        let second: &[u8] = b"output \"o\" {\n  value = \"${var.a} ${aws_instance.web.ip}\"\n}\n";

        let mut sequential = Index::new();
        sequential.collect_bytes(first, "a.tf", false).unwrap();
        sequential.collect_bytes(second, "b.tf", false).unwrap();

        let mut merged = Index::new();
        merged.collect_bytes(first, "a.tf", false).unwrap();
        let mut other = Index::new();
        other.collect_bytes(second, "b.tf", false).unwrap();
        merged.merge(other);

        assert_eq!(merged, sequential);
        assert_eq!(merged.reference("a").map(|list| list.locations.len()), Some(2));
    }
}
