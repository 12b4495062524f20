//! Configuration syntax tree and its walk primitive

use super::token::Pos;
use super::token::Token;
use serde::Serialize;

/// A parsed configuration file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct File {
    pub node: Node,
    /// Every comment group in the file, in document order.
    pub comments: Vec<CommentGroup>,
}

/// The closed set of value-bearing node shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    ObjectList(ObjectList),
    ObjectType(ObjectType),
    ListType(ListType),
    Literal(LiteralType),
}

impl Node {
    pub fn pos(&self) -> Pos {
        match self {
            Self::ObjectList(list) => list.pos(),
            Self::ObjectType(object) => object.lbrace,
            Self::ListType(list) => list.lbrack,
            Self::Literal(literal) => literal.token.pos,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectList {
    pub items: Vec<ObjectItem>,
}

impl ObjectList {
    pub fn pos(&self) -> Pos {
        self.items.first().map(ObjectItem::pos).unwrap_or_default()
    }
}

/// `keys = val` or `keys { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectItem {
    pub keys: Vec<ObjectKey>,
    /// Position of `=`; `None` for block syntax.
    pub assign: Option<Pos>,
    pub val: Node,
    pub lead_comment: Option<CommentGroup>,
}

impl ObjectItem {
    pub fn pos(&self) -> Pos {
        match self.keys.first() {
            Some(key) => key.token.pos,
            None => self.val.pos(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectKey {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralType {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListType {
    pub lbrack: Pos,
    pub rbrack: Pos,
    pub list: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectType {
    pub lbrace: Pos,
    pub rbrace: Pos,
    pub list: ObjectList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    /// Raw comment texts, markers included, skipping empty ones.
    pub fn lines(&self) -> Vec<String> {
        self.list
            .iter()
            .filter(|comment| !comment.text.is_empty())
            .map(|comment| comment.text.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub start: Pos,
    pub text: String,
}

/// Borrowed view of any node reachable by [`walk`].
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    ObjectList(&'a ObjectList),
    ObjectItem(&'a ObjectItem),
    ObjectKey(&'a ObjectKey),
    Literal(&'a LiteralType),
    ListType(&'a ListType),
    ObjectType(&'a ObjectType),
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::ObjectList(list) => Self::ObjectList(list),
            Node::ObjectType(object) => Self::ObjectType(object),
            Node::ListType(list) => Self::ListType(list),
            Node::Literal(literal) => Self::Literal(literal),
        }
    }
}

/// Depth-first, parent-first traversal. Returning `false` from `visit` skips
/// the children of that node.
pub fn walk<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(NodeRef<'a>) -> bool,
{
    walk_ref(NodeRef::from(node), visit);
}

fn walk_ref<'a, F>(node: NodeRef<'a>, visit: &mut F)
where
    F: FnMut(NodeRef<'a>) -> bool,
{
    if !visit(node) {
        return;
    }

    match node {
        NodeRef::ObjectList(list) => {
            for item in &list.items {
                walk_ref(NodeRef::ObjectItem(item), visit);
            }
        }
        NodeRef::ObjectItem(item) => {
            for key in &item.keys {
                walk_ref(NodeRef::ObjectKey(key), visit);
            }
            walk_ref(NodeRef::from(&item.val), visit);
        }
        NodeRef::ListType(list) => {
            for element in &list.list {
                walk_ref(NodeRef::from(element), visit);
            }
        }
        NodeRef::ObjectType(object) => {
            walk_ref(NodeRef::ObjectList(&object.list), visit);
        }
        NodeRef::ObjectKey(_) | NodeRef::Literal(_) => {}
    }
}
