//! Recursive-descent parser for interpolation templates
//!
//! Precedence, loosest first: `? :`, `||`, `&&`, `== !=`, `< <= > >=`,
//! `+ -`, `* / %`, unary `- !`, postfix `[ ]`.
//!
//! Every nested expression costs stack, so nesting is capped at
//! [`MAX_DEPTH`] and deeper input is a [`ParseError`] instead of an abort.

use super::ast::ArithmeticOp;
use super::ast::LiteralValue;
use super::ast::Node;
use super::ast::UnaryOp;
use super::error::ParseError;
use super::error::ParseResult;
use super::lexer::Cursor;
use super::token::Pos;
use super::token::Token;
use super::token::TokenKind;

/// Deepest nesting of sub-expressions (parentheses, brackets, call
/// arguments, quoted strings, unary operators) accepted in one template.
pub const MAX_DEPTH: usize = 64;

/// Parse `text` as a template whose first character sits at `start`.
///
/// Every position in the returned tree is absolute: a character on the same
/// line as `start` is offset by its column, later lines restart at column 1.
pub fn parse_with_position(text: &str, start: Pos) -> ParseResult<Node> {
    let mut parser = Parser {
        cursor: Cursor::new(text, start),
        peeked: None,
        depth: 0,
    };
    let parts = parser.template(TemplateEnd::Eof, start)?;
    Ok(Node::Output { parts, pos: start })
}

/// Parse `text` starting at line 1, column 1.
pub fn parse(text: &str) -> ParseResult<Node> {
    parse_with_position(text, Pos::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateEnd {
    Eof,
    Quote,
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    /// Expression-mode lookahead. Always empty while template text is read.
    peeked: Option<Token>,
    depth: usize,
}

impl Parser<'_> {
    fn template(&mut self, end: TemplateEnd, start: Pos) -> ParseResult<Vec<Node>> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut text_pos = self.cursor.pos();

        loop {
            let Some(ch) = self.cursor.peek() else {
                if end == TemplateEnd::Quote {
                    return Err(ParseError::new(start, "unterminated string literal"));
                }
                break;
            };

            if ch == '"' && end == TemplateEnd::Quote {
                self.cursor.bump();
                break;
            }

            if text.is_empty() {
                text_pos = self.cursor.pos();
            }

            if ch == '\\' && end == TemplateEnd::Quote {
                self.cursor.bump();
                match self.cursor.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(escaped @ ('"' | '\\')) => text.push(escaped),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => {
                        return Err(ParseError::new(start, "unterminated string literal"));
                    }
                }
            } else if self.cursor.starts_with("$${") {
                self.cursor.bump();
                self.cursor.bump();
                self.cursor.bump();
                text.push_str("${");
            } else if self.cursor.starts_with("${") {
                if !text.is_empty() {
                    parts.push(string_literal(std::mem::take(&mut text), text_pos));
                }
                self.cursor.bump();
                self.cursor.bump();
                parts.push(self.expression()?);
                self.expect(TokenKind::CloseBrace)?;
            } else {
                self.cursor.bump();
                text.push(ch);
            }
        }

        if !text.is_empty() {
            parts.push(string_literal(text, text_pos));
        }
        Ok(parts)
    }

    fn peek(&mut self) -> ParseResult<Token> {
        if let Some(token) = &self.peeked {
            return Ok(token.clone());
        }
        let token = self.cursor.next_token()?;
        self.peeked = Some(token.clone());
        Ok(token)
    }

    fn next(&mut self) -> ParseResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.cursor.next_token(),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.peek()?.kind == kind {
            self.peeked = None;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.next()?;
        if token.kind == kind {
            return Ok(token);
        }
        if kind == TokenKind::CloseBrace && token.kind == TokenKind::Eof {
            return Err(ParseError::new(
                token.pos,
                "unterminated interpolation sequence",
            ));
        }
        Err(ParseError::new(
            token.pos,
            format!("expected {}, got {token}", kind.describe()),
        ))
    }

    fn expression(&mut self) -> ParseResult<Node> {
        self.nested(Self::conditional)
    }

    fn nested<F>(&mut self, parse: F) -> ParseResult<Node>
    where
        F: FnOnce(&mut Self) -> ParseResult<Node>,
    {
        if self.depth >= MAX_DEPTH {
            let pos = self.peek()?.pos;
            return Err(ParseError::new(pos, "expression nested too deeply"));
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn conditional(&mut self) -> ParseResult<Node> {
        let cond = self.binary(0)?;
        if !self.eat(TokenKind::Question)? {
            return Ok(cond);
        }
        let true_expr = self.expression()?;
        self.expect(TokenKind::Colon)?;
        let false_expr = self.expression()?;
        let pos = cond.pos();
        Ok(Node::Conditional {
            cond: Box::new(cond),
            true_expr: Box::new(true_expr),
            false_expr: Box::new(false_expr),
            pos,
        })
    }

    fn binary(&mut self, level: usize) -> ParseResult<Node> {
        if level == BINARY_LEVELS {
            return self.unary();
        }

        let mut left = self.binary(level + 1)?;
        while let Some(op) = binary_op(level, self.peek()?.kind) {
            self.peeked = None;
            let right = self.binary(level + 1)?;
            let pos = left.pos();
            left = Node::Arithmetic {
                op,
                exprs: vec![left, right],
                pos,
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Node> {
        let token = self.peek()?;
        let op = match token.kind {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.postfix(),
        };
        self.peeked = None;
        let expr = self.nested(Self::unary)?;
        Ok(Node::Unary {
            op,
            expr: Box::new(expr),
            pos: token.pos,
        })
    }

    fn postfix(&mut self) -> ParseResult<Node> {
        let mut target = self.primary()?;
        while self.eat(TokenKind::LBracket)? {
            let key = self.expression()?;
            self.expect(TokenKind::RBracket)?;
            let pos = target.pos();
            target = Node::Index {
                target: Box::new(target),
                key: Box::new(key),
                pos,
            };
        }
        Ok(target)
    }

    fn primary(&mut self) -> ParseResult<Node> {
        let token = self.next()?;
        let pos = token.pos;
        match token.kind {
            TokenKind::LParen => {
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Integer => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::new(pos, "invalid number"))?;
                Ok(Node::Literal {
                    value: LiteralValue::Int(value),
                    pos,
                })
            }
            TokenKind::Float => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(pos, "invalid number"))?;
                Ok(Node::Literal {
                    value: LiteralValue::Float(value),
                    pos,
                })
            }
            TokenKind::Bool => Ok(Node::Literal {
                value: LiteralValue::Bool(token.text == "true"),
                pos,
            }),
            TokenKind::OQuote => {
                let mut parts = self.template(TemplateEnd::Quote, pos)?;
                match parts.len() {
                    0 => Ok(string_literal(String::new(), pos)),
                    1 if matches!(parts[0], Node::Literal { .. }) => Ok(parts.remove(0)),
                    _ => Ok(Node::Output { parts, pos }),
                }
            }
            TokenKind::Ident => {
                if self.peek()?.kind != TokenKind::LParen {
                    return Ok(Node::VariableAccess {
                        name: token.text,
                        pos,
                    });
                }
                self.peeked = None;
                let mut args = Vec::new();
                if !self.eat(TokenKind::RParen)? {
                    loop {
                        args.push(self.expression()?);
                        if !self.eat(TokenKind::Comma)? {
                            self.expect(TokenKind::RParen)?;
                            break;
                        }
                    }
                }
                Ok(Node::Call {
                    func: token.text,
                    args,
                    pos,
                })
            }
            TokenKind::Eof => Err(ParseError::new(pos, "unexpected end of template")),
            _ => Err(ParseError::new(
                pos,
                format!("unexpected {token} while parsing expression"),
            )),
        }
    }
}

const BINARY_LEVELS: usize = 6;

fn binary_op(level: usize, kind: TokenKind) -> Option<ArithmeticOp> {
    let op = match (level, kind) {
        (0, TokenKind::Or) => ArithmeticOp::Or,
        (1, TokenKind::And) => ArithmeticOp::And,
        (2, TokenKind::Equal) => ArithmeticOp::Equal,
        (2, TokenKind::NotEqual) => ArithmeticOp::NotEqual,
        (3, TokenKind::Less) => ArithmeticOp::Less,
        (3, TokenKind::LessEqual) => ArithmeticOp::LessOrEqual,
        (3, TokenKind::Greater) => ArithmeticOp::Greater,
        (3, TokenKind::GreaterEqual) => ArithmeticOp::GreaterOrEqual,
        (4, TokenKind::Plus) => ArithmeticOp::Add,
        (4, TokenKind::Minus) => ArithmeticOp::Sub,
        (5, TokenKind::Star) => ArithmeticOp::Mul,
        (5, TokenKind::Slash) => ArithmeticOp::Div,
        (5, TokenKind::Percent) => ArithmeticOp::Mod,
        _ => return None,
    };
    Some(op)
}

fn string_literal(text: String, pos: Pos) -> Node {
    Node::Literal {
        value: LiteralValue::String(text),
        pos,
    }
}
