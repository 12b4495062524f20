//! Configuration parser on top of the tree-sitter HCL grammar
//!
//! tree-sitter recovers from syntax errors by confining the damage to `ERROR`
//! and `MISSING` nodes. The first of those in document order, outside string
//! and heredoc templates, is reported as the file's [`ParseError`]. Everything
//! else is lowered into the owned tree of [`super::ast`]:
//!
//! ```text
//! config_file
//! └── body                        ObjectList
//!     ├── block                   ObjectItem { keys: type + labels, val: ObjectType }
//!     │   ├── identifier          ObjectKey (IDENT)
//!     │   ├── string_lit          ObjectKey (STRING, quotes kept)
//!     │   └── body                ObjectList
//!     └── attribute               ObjectItem { keys: [name], assign, val }
//!         └── expression
//!             ├── tuple           ListType
//!             ├── object          ObjectType
//!             └── anything else   Literal, verbatim source text
//! ```
//!
//! Interpolations are never taken apart here: a quoted template, a heredoc
//! or a native expression becomes one literal whose text and start position
//! are handed to [`crate::hil`] later.

use super::ast::Comment;
use super::ast::CommentGroup;
use super::ast::File;
use super::ast::ListType;
use super::ast::LiteralType;
use super::ast::Node;
use super::ast::ObjectItem;
use super::ast::ObjectKey;
use super::ast::ObjectList;
use super::ast::ObjectType;
use super::error::ParseError;
use super::error::ParseResult;
use super::token::Pos;
use super::token::Token;
use super::token::TokenKind;
use tree_sitter::Node as SyntaxNode;
use tree_sitter::Parser;

/// Deepest nesting of blocks, objects and lists accepted in one file.
pub const MAX_NESTING: usize = 100;

/// Parse a configuration source buffer into a [`File`].
pub fn parse(source: &str) -> ParseResult<File> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_hcl::LANGUAGE.into())
        .map_err(|err| ParseError::new(Pos::default(), format!("cannot load grammar: {err}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new(Pos::default(), "parser returned no tree"))?;

    let lowering = Lowering { source };
    let root = tree.root_node();
    if let Some(err) = lowering.first_error(root) {
        return Err(err);
    }
    Ok(File {
        node: lowering.root(root)?,
        comments: lowering.comment_groups(root),
    })
}

struct Lowering<'s> {
    source: &'s str,
}

impl Lowering<'_> {
    fn pos(&self, node: SyntaxNode<'_>) -> Pos {
        Pos::from_point(self.source, node.start_byte(), node.start_position())
    }

    fn text(&self, node: SyntaxNode<'_>) -> String {
        node.utf8_text(self.source.as_bytes())
            .unwrap_or_default()
            .to_string()
    }

    fn token(&self, node: SyntaxNode<'_>, kind: TokenKind) -> Token {
        Token::new(kind, self.pos(node), self.text(node))
    }

    fn malformed(&self, node: SyntaxNode<'_>) -> ParseError {
        ParseError::new(self.pos(node), format!("malformed {}", node.kind()))
    }

    /// First syntax error outside string and heredoc templates. The contents
    /// of a closed template belong to the interpolation parser, so damage
    /// inside one does not fail the file.
    fn first_error(&self, root: SyntaxNode<'_>) -> Option<ParseError> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !node.has_error() {
                continue;
            }
            if node.is_missing() {
                return Some(ParseError::new(
                    self.pos(node),
                    format!("expected {}", node.kind()),
                ));
            }
            if node.is_error() {
                let text = self.text(node);
                let found = text.lines().next().unwrap_or_default().trim();
                let message = if found.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected {found:?}")
                };
                return Some(ParseError::new(self.pos(node), message));
            }
            if matches!(node.kind(), "quoted_template" | "heredoc_template") {
                if !is_closed(node) {
                    return Some(ParseError::new(self.pos(node), "literal not terminated"));
                }
                continue;
            }
            stack.extend(children(node).into_iter().rev());
        }
        None
    }

    fn root(&self, root: SyntaxNode<'_>) -> ParseResult<Node> {
        match significant(root).as_slice() {
            [] => Ok(Node::ObjectList(ObjectList::default())),
            [body] if body.kind() == "body" => Ok(Node::ObjectList(self.body(*body, 0)?)),
            [object] if object.kind() == "object" => self.object(*object, 0),
            [other, ..] => Err(self.malformed(*other)),
        }
    }

    fn body(&self, body: SyntaxNode<'_>, depth: usize) -> ParseResult<ObjectList> {
        let mut items = Vec::new();
        for child in children(body) {
            match child.kind() {
                "attribute" => items.push(self.attribute(child, depth)?),
                "block" => items.push(self.block(child, depth)?),
                _ => {}
            }
        }
        Ok(ObjectList { items })
    }

    /// `name = value`, or `key = value` / `key: value` inside an object.
    fn attribute(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<ObjectItem> {
        let Some((key, assign, val)) = assignment(node) else {
            return Err(self.malformed(node));
        };
        let key = unwrap_value(key);
        let kind = match key.kind() {
            "quoted_template" | "string_lit" => TokenKind::String,
            _ => TokenKind::Ident,
        };
        Ok(ObjectItem {
            keys: vec![ObjectKey {
                token: self.token(key, kind),
            }],
            assign: Some(self.pos(assign)),
            val: self.value(val, depth)?,
            lead_comment: self.lead_comment(node),
        })
    }

    fn block(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<ObjectItem> {
        let depth = self.nest(node, depth)?;
        let mut keys = Vec::new();
        let mut lbrace = None;
        let mut rbrace = None;
        let mut list = ObjectList::default();
        for child in children(node) {
            match child.kind() {
                "identifier" if lbrace.is_none() => keys.push(ObjectKey {
                    token: self.token(child, TokenKind::Ident),
                }),
                "string_lit" if lbrace.is_none() => keys.push(ObjectKey {
                    token: self.token(child, TokenKind::String),
                }),
                "block_start" | "{" => lbrace = Some(self.pos(child)),
                "body" => list = self.body(child, depth)?,
                "block_end" | "}" => rbrace = Some(self.pos(child)),
                _ => {}
            }
        }
        let (Some(lbrace), Some(rbrace)) = (lbrace, rbrace) else {
            return Err(self.malformed(node));
        };
        Ok(ObjectItem {
            keys,
            assign: None,
            val: Node::ObjectType(ObjectType {
                lbrace,
                rbrace,
                list,
            }),
            lead_comment: self.lead_comment(node),
        })
    }

    fn value(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Node> {
        let node = unwrap_value(node);
        match node.kind() {
            "tuple" => self.tuple(node, depth),
            "object" => self.object(node, depth),
            kind => {
                let text = self.text(node);
                let kind = match kind {
                    "numeric_lit" if is_float(&text) => TokenKind::Float,
                    "numeric_lit" => TokenKind::Number,
                    "bool_lit" => TokenKind::Bool,
                    "null_lit" => TokenKind::Null,
                    "quoted_template" | "string_lit" => TokenKind::String,
                    "heredoc_template" => TokenKind::Heredoc,
                    _ => TokenKind::Expression,
                };
                Ok(Node::Literal(LiteralType {
                    token: Token::new(kind, self.pos(node), text),
                }))
            }
        }
    }

    fn tuple(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Node> {
        let depth = self.nest(node, depth)?;
        let mut lbrack = None;
        let mut rbrack = None;
        let mut list = Vec::new();
        for child in children(node) {
            match child.kind() {
                "tuple_start" | "[" => lbrack = Some(self.pos(child)),
                "tuple_end" | "]" => rbrack = Some(self.pos(child)),
                "comment" | "," => {}
                _ => list.push(self.value(child, depth)?),
            }
        }
        let (Some(lbrack), Some(rbrack)) = (lbrack, rbrack) else {
            return Err(self.malformed(node));
        };
        Ok(Node::ListType(ListType {
            lbrack,
            rbrack,
            list,
        }))
    }

    fn object(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Node> {
        let depth = self.nest(node, depth)?;
        let mut lbrace = None;
        let mut rbrace = None;
        let mut items = Vec::new();
        for child in children(node) {
            match child.kind() {
                "object_start" | "{" => lbrace = Some(self.pos(child)),
                "object_end" | "}" => rbrace = Some(self.pos(child)),
                "object_elem" => items.push(self.attribute(child, depth)?),
                _ => {}
            }
        }
        let (Some(lbrace), Some(rbrace)) = (lbrace, rbrace) else {
            return Err(self.malformed(node));
        };
        Ok(Node::ObjectType(ObjectType {
            lbrace,
            rbrace,
            list: ObjectList { items },
        }))
    }

    fn nest(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<usize> {
        if depth >= MAX_NESTING {
            return Err(ParseError::new(
                self.pos(node),
                "configuration nested too deeply",
            ));
        }
        Ok(depth + 1)
    }

    /// Comments directly above `node`, one per line with no gap, that do not
    /// trail code on their own line.
    fn lead_comment(&self, node: SyntaxNode<'_>) -> Option<CommentGroup> {
        // The first item of a body has its comments in front of the body.
        let anchor = match node.prev_sibling() {
            Some(_) => node,
            None => node.parent().filter(|parent| parent.kind() == "body")?,
        };

        let mut list = Vec::new();
        let mut next_row = node.start_position().row;
        let mut prev = anchor.prev_sibling();
        while let Some(sibling) = prev {
            if sibling.kind() != "comment" || last_row(sibling) + 1 != next_row {
                break;
            }
            let before = sibling.prev_sibling();
            if before.is_some_and(|before| {
                before.kind() != "comment"
                    && before.end_position().row == sibling.start_position().row
            }) {
                break;
            }
            list.push(self.comment(sibling));
            next_row = sibling.start_position().row;
            prev = before;
        }

        if list.is_empty() {
            return None;
        }
        list.reverse();
        Some(CommentGroup { list })
    }

    fn comment(&self, node: SyntaxNode<'_>) -> Comment {
        Comment {
            start: self.pos(node),
            text: self.text(node).trim_end().to_string(),
        }
    }

    /// Every comment in document order, split into groups of adjacent lines.
    fn comment_groups(&self, root: SyntaxNode<'_>) -> Vec<CommentGroup> {
        let mut groups: Vec<CommentGroup> = Vec::new();
        let mut last: Option<SyntaxNode<'_>> = None;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() != "comment" {
                stack.extend(children(node).into_iter().rev());
                continue;
            }
            let joins = last.is_some_and(|last| {
                node.prev_sibling().map(|prev| prev.id()) == Some(last.id())
                    && last_row(last) + 1 == node.start_position().row
            });
            match groups.last_mut() {
                Some(group) if joins => group.list.push(self.comment(node)),
                _ => groups.push(CommentGroup {
                    list: vec![self.comment(node)],
                }),
            }
            last = Some(node);
        }
        groups
    }
}

fn children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Children that carry syntax, comments excluded.
fn significant(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    children(node)
        .into_iter()
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Key, separator and value around the `=` (or `:`) of `node`.
fn assignment(node: SyntaxNode<'_>) -> Option<(SyntaxNode<'_>, SyntaxNode<'_>, SyntaxNode<'_>)> {
    let parts = significant(node);
    let at = parts
        .iter()
        .position(|part| matches!(part.kind(), "=" | ":"))?;
    let key = *parts.get(at.checked_sub(1)?)?;
    let assign = *parts.get(at)?;
    let val = *parts.get(at + 1)?;
    Some((key, assign, val))
}

/// Whether a template ends with its own, present, closing delimiter.
fn is_closed(template: SyntaxNode<'_>) -> bool {
    children(template).last().is_some_and(|last| {
        !last.is_missing()
            && !last.is_error()
            && matches!(last.kind(), "quoted_template_end" | "heredoc_identifier")
    })
}

/// Strip the single-child wrappers the grammar puts around every value.
fn unwrap_value(mut node: SyntaxNode<'_>) -> SyntaxNode<'_> {
    while matches!(
        node.kind(),
        "expression" | "literal_value" | "template_expr" | "collection_value"
    ) {
        match significant(node).as_slice() {
            [only] => node = *only,
            _ => break,
        }
    }
    node
}

/// Last row holding comment text; a trailing newline does not count.
fn last_row(comment: SyntaxNode<'_>) -> usize {
    let end = comment.end_position();
    if end.column == 0 && end.row > comment.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}

fn is_float(text: &str) -> bool {
    !text.starts_with("0x") && text.contains(['.', 'e', 'E'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root_items(file: &File) -> &[ObjectItem] {
        match &file.node {
            Node::ObjectList(list) => &list.items,
            other => panic!("unexpected root {other:?}"),
        }
    }

    fn key_texts(item: &ObjectItem) -> Vec<&str> {
        item.keys.iter().map(|k| k.token.text.as_str()).collect()
    }

    fn literal(node: &Node) -> &Token {
        match node {
            Node::Literal(literal) => &literal.token,
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_parse_blocks_and_attributes() {
        let src = r#"
variable "region" {
  default = "us-east-1"
}

resource "aws_instance" "web" {
  ami   = "${var.ami}"
  count = 2
  tags {
    Name = "web"
  }
}
"#;
        let file = parse(src).unwrap();
        let items = root_items(&file);
        assert_eq!(items.len(), 2);
        assert_eq!(key_texts(&items[0]), vec!["variable", "\"region\""]);
        assert_eq!(
            key_texts(&items[1]),
            vec!["resource", "\"aws_instance\"", "\"web\""]
        );
        assert_eq!(items[1].keys[0].token.kind, TokenKind::Ident);
        assert_eq!(items[1].keys[2].token.kind, TokenKind::String);
        assert_eq!(items[1].keys[2].token.pos, Pos::new(72, 6, 25));
        assert!(items[1].assign.is_none());

        let Node::ObjectType(body) = &items[1].val else {
            panic!("resource body should be an object");
        };
        assert_eq!(body.list.items.len(), 3);
        let ami = &body.list.items[0];
        assert_eq!(ami.assign, Some(Pos::new(88, 7, 9)));
        let token = literal(&ami.val);
        assert_eq!(token.text, "\"${var.ami}\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.pos, Pos::new(90, 7, 11));
        assert_eq!(literal(&body.list.items[1].val).kind, TokenKind::Number);
    }

    #[test]
    fn test_lists_and_objects() {
        let file = parse("zones = [\"a\", \"b\",]\nnested = [[1, 2], {x = 1}]").unwrap();
        let items = root_items(&file);
        let Node::ListType(zones) = &items[0].val else {
            panic!("expected list");
        };
        assert_eq!(zones.list.len(), 2);
        assert_eq!(zones.lbrack, Pos::new(8, 1, 9));
        let Node::ListType(nested) = &items[1].val else {
            panic!("expected list");
        };
        assert!(matches!(nested.list[0], Node::ListType(_)));
        let Node::ObjectType(object) = &nested.list[1] else {
            panic!("expected object");
        };
        assert_eq!(key_texts(&object.list.items[0]), vec!["x"]);
    }

    #[test]
    fn test_comma_separated_object_elements() {
        let file = parse("m = { a = 1, \"b\" = 2.5 }").unwrap();
        let Node::ObjectType(object) = &root_items(&file)[0].val else {
            panic!("expected object");
        };
        assert_eq!(object.list.items.len(), 2);
        assert_eq!(object.list.items[1].keys[0].token.kind, TokenKind::String);
        assert_eq!(literal(&object.list.items[1].val).kind, TokenKind::Float);
    }

    #[test]
    fn test_heredoc_and_native_expressions_are_verbatim_literals() {
        let src = "user_data = <<EOF\necho ${var.name}\nEOF\ncount = var.n\nenabled = true\n";
        let file = parse(src).unwrap();
        let items = root_items(&file);

        let heredoc = literal(&items[0].val);
        assert_eq!(heredoc.kind, TokenKind::Heredoc);
        assert!(heredoc.text.starts_with("<<EOF\necho ${var.name}"));
        assert_eq!(heredoc.pos, Pos::new(12, 1, 13));

        let count = literal(&items[1].val);
        assert_eq!(count.kind, TokenKind::Expression);
        assert_eq!(count.text, "var.n");

        assert_eq!(literal(&items[2].val).kind, TokenKind::Bool);
    }

    #[test]
    fn test_lead_comment_attaches_to_next_item() {
        let src = "# doc one\n# doc two\nvariable \"x\" {}\n";
        let file = parse(src).unwrap();
        let item = &root_items(&file)[0];
        let lead = item.lead_comment.as_ref().unwrap();
        assert_eq!(lead.lines(), vec!["# doc one", "# doc two"]);
        assert_eq!(file.comments.len(), 1);
    }

    #[test]
    fn test_lead_comment_inside_block_body() {
        let src = "resource \"t\" \"n\" {\n  // first\n  a = 1\n  # second\n  b = 2\n}\n";
        let file = parse(src).unwrap();
        let Node::ObjectType(body) = &root_items(&file)[0].val else {
            panic!("expected block body");
        };
        let docs: Vec<Vec<String>> = body
            .list
            .items
            .iter()
            .map(|item| item.lead_comment.as_ref().map(CommentGroup::lines).unwrap_or_default())
            .collect();
        assert_eq!(docs, vec![vec!["// first".to_string()], vec!["# second".to_string()]]);
    }

    #[test]
    fn test_block_comment_lead() {
        let src = "/*\n  Multi\n*/\noutput \"ip\" {}\n";
        let file = parse(src).unwrap();
        let lead = root_items(&file)[0].lead_comment.as_ref().unwrap();
        assert_eq!(lead.lines(), vec!["/*\n  Multi\n*/"]);
    }

    #[test]
    fn test_detached_comment_is_not_documentation() {
        let src = "# detached\n\nvariable \"x\" {}\n";
        let file = parse(src).unwrap();
        assert!(root_items(&file)[0].lead_comment.is_none());
        assert_eq!(file.comments.len(), 1);
    }

    #[test]
    fn test_trailing_comment_is_not_lead_of_next_item() {
        let src = "a = 1 # trailing\nb = 2\n";
        let file = parse(src).unwrap();
        let items = root_items(&file);
        assert!(items[1].lead_comment.is_none());
    }

    #[test]
    fn test_comment_inside_list_does_not_leak() {
        let src = "a = [\n  # element\n  \"x\",\n]\nvariable \"v\" {}\n";
        let file = parse(src).unwrap();
        assert!(root_items(&file)[1].lead_comment.is_none());
    }

    #[test]
    fn test_syntax_error_is_reported_at_its_line() {
        let err = parse("a = 1\nb = 2\n@@@\n").unwrap_err();
        assert_eq!(err.pos.line, 3);
    }

    #[test]
    fn test_broken_interpolation_is_left_to_the_literal() {
        let file = parse("a = \"${1 +}\"\nb = 2\n").unwrap();
        let items = root_items(&file);
        assert_eq!(literal(&items[0].val).text, "\"${1 +}\"");
        assert_eq!(literal(&items[1].val).text, "2");
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        assert!(parse("resource \"a\" \"b\" {\n  x = 1\n").is_err());
    }

    #[test]
    fn test_list_requires_commas() {
        assert!(parse("a = [1 2]").is_err());
    }

    #[test]
    fn test_deeply_nested_lists_are_rejected() {
        let depth = 2000;
        let src = format!("a = {}1{}\n", "[".repeat(depth), "]".repeat(depth));
        let err = parse(&src).unwrap_err();
        assert_eq!(err.message, "configuration nested too deeply");
        assert_eq!(err.pos.line, 1);
    }

    #[test]
    fn test_nesting_below_the_limit_is_accepted() {
        let depth = MAX_NESTING - 1;
        let src = format!("a = {}1{}\n", "[".repeat(depth), "]".repeat(depth));
        assert!(parse(&src).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let file = parse("").unwrap();
        assert!(root_items(&file).is_empty());
        let file = parse("# only a comment\n").unwrap();
        assert!(root_items(&file).is_empty());
        assert_eq!(file.comments.len(), 1);
    }
}
