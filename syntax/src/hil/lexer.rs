//! Character cursor shared by template mode and expression mode
//!
//! Template text is consumed character by character by the parser; inside
//! `${ ... }` the cursor is asked for whole tokens instead.

use super::error::ParseError;
use super::error::ParseResult;
use super::token::Pos;
use super::token::Token;
use super::token::TokenKind;

pub struct Cursor<'a> {
    src: &'a str,
    offset: usize,
    pos: Pos,
}

impl<'a> Cursor<'a> {
    pub const fn new(src: &'a str, start: Pos) -> Self {
        Self {
            src,
            offset: 0,
            pos: start,
        }
    }

    pub const fn pos(&self) -> Pos {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.offset..].chars().nth(n)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.offset..].starts_with(prefix)
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    /// Scan one expression-mode token.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.bump_while(char::is_whitespace);

        let pos = self.pos;
        let start = self.offset;
        let Some(ch) = self.bump() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
                text: String::new(),
            });
        };

        let kind = match ch {
            '}' => TokenKind::CloseBrace,
            '"' => TokenKind::OQuote,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' if self.peek() == Some('=') => {
                self.bump();
                TokenKind::Equal
            }
            '!' if self.peek() == Some('=') => {
                self.bump();
                TokenKind::NotEqual
            }
            '!' => TokenKind::Bang,
            '<' if self.peek() == Some('=') => {
                self.bump();
                TokenKind::LessEqual
            }
            '<' => TokenKind::Less,
            '>' if self.peek() == Some('=') => {
                self.bump();
                TokenKind::GreaterEqual
            }
            '>' => TokenKind::Greater,
            '&' if self.peek() == Some('&') => {
                self.bump();
                TokenKind::And
            }
            '|' if self.peek() == Some('|') => {
                self.bump();
                TokenKind::Or
            }
            c if c.is_ascii_digit() => {
                self.bump_while(|c| c.is_ascii_digit());
                if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                {
                    self.bump();
                    self.bump_while(|c| c.is_ascii_digit());
                    TokenKind::Float
                } else {
                    TokenKind::Integer
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                self.bump_while(|c| {
                    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '*')
                });
                match &self.src[start..self.offset] {
                    "true" | "false" => TokenKind::Bool,
                    _ => TokenKind::Ident,
                }
            }
            c => {
                return Err(ParseError::new(pos, format!("invalid character {c:?}")));
            }
        };

        Ok(Token {
            kind,
            pos,
            text: self.src[start..self.offset].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(src: &str) -> Vec<(TokenKind, String)> {
        let mut cursor = Cursor::new(src, Pos::default());
        let mut out = Vec::new();
        loop {
            let token = cursor.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push((token.kind, token.text));
        }
    }

    #[test]
    fn test_dotted_identifier_is_one_token() {
        assert_eq!(
            tokens("aws_instance.web.*.id"),
            vec![(TokenKind::Ident, "aws_instance.web.*.id".to_string())]
        );
    }

    #[test]
    fn test_operators() {
        let kinds: Vec<TokenKind> = tokens("a == b != c <= d >= e && f || !g ? 1 : 2.5")
            .into_iter()
            .map(|(kind, _)| kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Equal,
                TokenKind::Ident,
                TokenKind::NotEqual,
                TokenKind::Ident,
                TokenKind::LessEqual,
                TokenKind::Ident,
                TokenKind::GreaterEqual,
                TokenKind::Ident,
                TokenKind::And,
                TokenKind::Ident,
                TokenKind::Or,
                TokenKind::Bang,
                TokenKind::Ident,
                TokenKind::Question,
                TokenKind::Integer,
                TokenKind::Colon,
                TokenKind::Float,
            ]
        );
    }

    #[test]
    fn test_positions_follow_start() {
        let mut cursor = Cursor::new("  x\n y", Pos::new(4, 10));
        assert_eq!(cursor.next_token().unwrap().pos, Pos::new(4, 12));
        assert_eq!(cursor.next_token().unwrap().pos, Pos::new(5, 2));
    }

    #[test]
    fn test_invalid_character() {
        let mut cursor = Cursor::new("@", Pos::default());
        let err = cursor.next_token().unwrap_err();
        assert_eq!(err.message, "invalid character '@'");
    }
}
