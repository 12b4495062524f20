//! Interpolation syntax tree

use super::token::Pos;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

/// Interpolation syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A template: literal text interleaved with interpolated expressions.
    Output { parts: Vec<Node>, pos: Pos },
    Literal { value: LiteralValue, pos: Pos },
    /// A dotted variable name such as `var.region` or `aws_instance.web.id`.
    VariableAccess { name: String, pos: Pos },
    Call {
        func: String,
        args: Vec<Node>,
        pos: Pos,
    },
    Index {
        target: Box<Node>,
        key: Box<Node>,
        pos: Pos,
    },
    Arithmetic {
        op: ArithmeticOp,
        exprs: Vec<Node>,
        pos: Pos,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Node>,
        pos: Pos,
    },
    Conditional {
        cond: Box<Node>,
        true_expr: Box<Node>,
        false_expr: Box<Node>,
        pos: Pos,
    },
}

impl Node {
    pub const fn pos(&self) -> Pos {
        match self {
            Self::Output { pos, .. }
            | Self::Literal { pos, .. }
            | Self::VariableAccess { pos, .. }
            | Self::Call { pos, .. }
            | Self::Index { pos, .. }
            | Self::Arithmetic { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Conditional { pos, .. } => *pos,
        }
    }

    /// Visit this node and every descendant, parents before children and
    /// children in source order.
    pub fn walk<F: FnMut(&Node)>(&self, visit: &mut F) {
        visit(self);
        match self {
            Self::Output { parts: nodes, .. }
            | Self::Call { args: nodes, .. }
            | Self::Arithmetic { exprs: nodes, .. } => {
                for node in nodes {
                    node.walk(visit);
                }
            }
            Self::Index { target, key, .. } => {
                target.walk(visit);
                key.walk(visit);
            }
            Self::Unary { expr, .. } => expr.walk(visit),
            Self::Conditional {
                cond,
                true_expr,
                false_expr,
                ..
            } => {
                cond.walk(visit);
                true_expr.walk(visit);
                false_expr.walk(visit);
            }
            Self::Literal { .. } | Self::VariableAccess { .. } => {}
        }
    }
}
