//! Records produced by the indexer

use serde::Deserialize;
use serde::Serialize;

/// Source position stamped with the file it belongs to.
///
/// `offset` is a byte offset into the configuration file. Positions that
/// came out of an interpolation expression have no offset and carry `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(filename: impl Into<String>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A declaration identified by name alone: variables, modules, outputs and
/// unaliased providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntypedSection {
    pub name: String,
    pub location: Position,
    /// Lead comment lines, comment markers included.
    pub documentation: Vec<String>,
}

/// A declaration with a type and a name: resources, data sources and aliased
/// providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedSection {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub location: Position,
    pub documentation: Vec<String>,
}

/// Every occurrence of one canonical reference name.
///
/// `kind` and `path` reflect the most recently recorded occurrence only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceList {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub locations: Vec<Position>,
}

/// A parse failure recorded in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub message: String,
    pub location: Position,
}

impl SourceError {
    pub fn new(message: impl Into<String>, location: Position) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_typed_section_serializes_type_field() {
        let section = TypedSection {
            ty: "aws_instance".to_string(),
            name: "web".to_string(),
            location: Position::new("main.tf", 10, 2, 25),
            documentation: vec![],
        };
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({
                "type": "aws_instance",
                "name": "web",
                "location": {"filename": "main.tf", "offset": 10, "line": 2, "column": 25},
                "documentation": [],
            })
        );
    }

    #[test]
    fn test_reference_path_omitted_when_absent() {
        let list = ReferenceList {
            name: "foo".to_string(),
            kind: "variable".to_string(),
            path: None,
            locations: vec![],
        };
        let value = serde_json::to_value(&list).unwrap();
        assert!(value.get("path").is_none());
        assert_eq!(value["type"], "variable");

        let back: ReferenceList = serde_json::from_value(value).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new("a.tf", 0, 3, 7).to_string(), "a.tf:3:7");
    }
}
