//! Positions and tokens of the interpolation language

/// Position inside interpolation text: 1-based line and column, no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tokens of expression mode (inside `${ ... }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Ident,
    Integer,
    Float,
    Bool,
    /// Opening `"` of a quoted string; the string body is read as a template.
    OQuote,
    CloseBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Bang,
}

impl TokenKind {
    /// Quoted source spelling, for error messages.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Eof => "end of template",
            Self::Ident => "identifier",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::OQuote => "\"\\\"\"",
            Self::CloseBrace => "\"}\"",
            Self::LParen => "\"(\"",
            Self::RParen => "\")\"",
            Self::LBracket => "\"[\"",
            Self::RBracket => "\"]\"",
            Self::Comma => "\",\"",
            Self::Question => "\"?\"",
            Self::Colon => "\":\"",
            Self::Plus => "\"+\"",
            Self::Minus => "\"-\"",
            Self::Star => "\"*\"",
            Self::Slash => "\"/\"",
            Self::Percent => "\"%\"",
            Self::Equal => "\"==\"",
            Self::NotEqual => "\"!=\"",
            Self::Less => "\"<\"",
            Self::LessEqual => "\"<=\"",
            Self::Greater => "\">\"",
            Self::GreaterEqual => "\">=\"",
            Self::And => "\"&&\"",
            Self::Or => "\"||\"",
            Self::Bang => "\"!\"",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
    pub text: String,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str(self.kind.describe()),
            _ => write!(f, "{:?}", self.text),
        }
    }
}
