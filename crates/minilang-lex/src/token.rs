//! Token model.
//!
//! A token is a lexical atom: its kind, the exact source substring it was
//! scanned from, and the 1-based line/column of its first character.

use std::fmt;

use minilang_util::Span;

/// The terminal categories of MiniLang++.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Reserved words
    /// "int"
    Int,
    /// "float"
    Float,
    /// "bool"
    Bool,
    /// "if"
    If,
    /// "else"
    Else,
    /// "while"
    While,
    /// "return"
    Return,
    /// "true"
    True,
    /// "false"
    False,

    // Multi-character operators
    /// "=="
    EqEq,
    /// "!="
    NotEq,
    /// "<="
    LtEq,
    /// ">="
    GtEq,
    /// "&&"
    AndAnd,
    /// "||"
    OrOr,

    // Single-character operators
    /// "=" (assignment)
    Eq,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "!"
    Not,

    // Delimiters
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,
    /// ","
    Comma,
    /// ";"
    Semicolon,

    // Literals
    /// Integer literal: one or more digits
    IntLit,
    /// Float literal: digits, a dot, digits
    FloatLit,

    /// Identifier: letter or underscore followed by alphanumerics/underscores
    Ident,
}

impl TokenKind {
    /// True for the type keywords `int`, `float`, `bool` - the anchor set
    /// for panic-mode recovery and the first token of every function.
    pub fn is_type_keyword(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float | TokenKind::Bool)
    }

    /// The terminal category name as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Bool => "BOOL",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::EqEq => "EQ",
            TokenKind::NotEq => "NEQ",
            TokenKind::LtEq => "LE",
            TokenKind::GtEq => "GE",
            TokenKind::AndAnd => "AND",
            TokenKind::OrOr => "OR",
            TokenKind::Eq => "ASSIGN",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MUL",
            TokenKind::Slash => "DIV",
            TokenKind::Not => "NOT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMI",
            TokenKind::IntLit => "INT_LIT",
            TokenKind::FloatLit => "FLOAT_LIT",
            TokenKind::Ident => "ID",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the reserved-word kind for an identifier-shaped lexeme.
///
/// Scanning always consumes the full identifier first, so a keyword is only
/// recognized at an identifier boundary (`intx` stays an `ID`).
pub(crate) fn keyword_kind(ident: &str) -> Option<TokenKind> {
    match ident {
        "int" => Some(TokenKind::Int),
        "float" => Some(TokenKind::Float),
        "bool" => Some(TokenKind::Bool),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "return" => Some(TokenKind::Return),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}

/// A lexical token. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Terminal category.
    pub kind: TokenKind,
    /// The matched source substring.
    pub lexeme: String,
    /// Line of the first character (1-based).
    pub line: u32,
    /// Column of the first character (1-based).
    pub column: u32,
}

impl Token {
    /// The source location of this token's first character.
    pub fn span(&self) -> Span {
        Span::point(self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, {:?}, line={}, col={})",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::EqEq.name(), "EQ");
        assert_eq!(TokenKind::Eq.name(), "ASSIGN");
        assert_eq!(TokenKind::Semicolon.name(), "SEMI");
        assert_eq!(TokenKind::Ident.name(), "ID");
        assert_eq!(TokenKind::IntLit.name(), "INT_LIT");
    }

    #[test]
    fn test_type_keywords() {
        assert!(TokenKind::Int.is_type_keyword());
        assert!(TokenKind::Float.is_type_keyword());
        assert!(TokenKind::Bool.is_type_keyword());
        assert!(!TokenKind::If.is_type_keyword());
        assert!(!TokenKind::Ident.is_type_keyword());
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_kind("while"), Some(TokenKind::While));
        assert_eq!(keyword_kind("true"), Some(TokenKind::True));
        assert_eq!(keyword_kind("whilex"), None);
        assert_eq!(keyword_kind("Int"), None);
    }

    #[test]
    fn test_token_display() {
        let token = Token {
            kind: TokenKind::Ident,
            lexeme: "x".to_string(),
            line: 2,
            column: 7,
        };
        assert_eq!(token.to_string(), "Token(ID, \"x\", line=2, col=7)");
    }
}
