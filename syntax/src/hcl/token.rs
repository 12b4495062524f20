//! Positions and token text lifted out of the configuration syntax tree

use serde::Serialize;
use tree_sitter::Point;

/// Position inside a configuration source buffer.
///
/// `line` and `column` are 1-based, `column` counts characters. `offset` is
/// the 0-based byte offset into the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Pos {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Convert a tree-sitter start point, whose row and column are 0-based
    /// and whose column counts bytes, at byte `offset` of `source`.
    pub fn from_point(source: &str, offset: usize, point: Point) -> Self {
        let line_start = offset.saturating_sub(point.column);
        let column = source
            .get(line_start..offset)
            .map_or(point.column, |prefix| prefix.chars().count());
        Self::new(offset, point.row + 1, column + 1)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Ident,
    Number,
    Float,
    Bool,
    Null,
    String,
    Heredoc,
    /// Any other expression, kept as its verbatim source text.
    Expression,
}

impl TokenKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ident => "IDENT",
            Self::Number => "NUMBER",
            Self::Float => "FLOAT",
            Self::Bool => "BOOL",
            Self::Null => "NULL",
            Self::String => "STRING",
            Self::Heredoc => "HEREDOC",
            Self::Expression => "EXPRESSION",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A key or value span of the tree. `text` is the raw source slice, so string
/// tokens keep their quotes and escape sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos, text: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            text: text.into(),
        }
    }

    /// Token text with surrounding double quotes removed.
    pub fn unquoted(&self) -> &str {
        self.text.trim_matches('"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unquoted_trims_all_surrounding_quotes() {
        let token = Token::new(TokenKind::String, Pos::new(0, 1, 1), "\"web\"");
        assert_eq!(token.unquoted(), "web");

        let ident = Token::new(TokenKind::Ident, Pos::new(0, 1, 1), "resource");
        assert_eq!(ident.unquoted(), "resource");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TokenKind::Heredoc.to_string(), "HEREDOC");
        assert_eq!(format!("{}", TokenKind::Ident), "IDENT");
    }

    #[test]
    fn test_point_is_shifted_to_one_based_characters() {
        let source = "a = 1\nbé = \"x\"";
        // `"x"` sits at byte 12; the row prefix `bé = ` is 6 bytes, 5 chars.
        let pos = Pos::from_point(source, 12, Point { row: 1, column: 6 });
        assert_eq!(pos, Pos::new(12, 2, 6));
    }
}
