//! Declaration dump: variables, resources and outputs of a single file,
//! optionally with its syntax tree.

use crate::declarations::Declaration;
use crate::declarations::classify;
use crate::error::IndexError;
use crate::error::IndexResult;
use crate::types::TypedSection;
use crate::types::UntypedSection;
use serde::Serialize;
use std::sync::Arc;
use terraform_index_syntax::hcl;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AstDump {
    pub variables: Vec<UntypedSection>,
    pub resources: Vec<TypedSection>,
    pub outputs: Vec<UntypedSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ast: Option<Arc<hcl::File>>,
}

impl AstDump {
    /// Classify the root items of `file`. The tree is retained in
    /// [`AstDump::raw_ast`]; clear it before serializing to leave it out.
    pub fn collect(file: Arc<hcl::File>, path: &str) -> IndexResult<Self> {
        let hcl::Node::ObjectList(list) = &file.node else {
            return Err(IndexError::UnexpectedRoot);
        };

        let mut variables = Vec::new();
        let mut resources = Vec::new();
        let mut outputs = Vec::new();
        for item in &list.items {
            match classify(item, path) {
                Some(Declaration::Variable(section)) => variables.push(section),
                Some(Declaration::Resource(section)) => resources.push(section),
                Some(Declaration::Output(section)) => outputs.push(section),
                _ => {}
            }
        }

        Ok(Self {
            variables,
            resources,
            outputs,
            raw_ast: Some(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dump_keeps_three_kinds() {
        let file = hcl::parse(
            "variable \"a\" {}\nresource \"t\" \"n\" {}\nmodule \"m\" {}\noutput \"o\" {}\n",
        )
        .unwrap();
        let dump = AstDump::collect(Arc::new(file), "main.tf").unwrap();
        assert_eq!(dump.variables[0].name, "a");
        assert_eq!(dump.resources[0].name, "n");
        assert_eq!(dump.resources[0].ty, "t");
        assert_eq!(dump.outputs[0].name, "o");
        assert!(dump.raw_ast.is_some());
    }

    #[test]
    fn test_dump_rejects_non_list_root() {
        let file = hcl::File {
            node: hcl::Node::Literal(hcl::LiteralType {
                token: hcl::Token::new(hcl::TokenKind::Number, hcl::Pos::new(0, 1, 1), "1"),
            }),
            comments: vec![],
        };
        assert_eq!(
            AstDump::collect(Arc::new(file), "main.tf"),
            Err(IndexError::UnexpectedRoot)
        );
    }

    #[test]
    fn test_raw_ast_omitted_from_json_when_cleared() {
        let file = hcl::parse("output \"o\" {}\n").unwrap();
        let mut dump = AstDump::collect(Arc::new(file), "main.tf").unwrap();
        dump.raw_ast = None;
        let value = serde_json::to_value(&dump).unwrap();
        assert!(value.get("rawAst").is_none());
        assert_eq!(value["outputs"][0]["name"], "o");
    }
}
