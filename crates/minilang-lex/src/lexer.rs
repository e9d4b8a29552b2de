//! Core scanner.
//!
//! Direct-coded maximal-munch scanning: each step dispatches on the current
//! character and consumes the longest lexeme that matches. Rule priority
//! follows the token specification - reserved words over identifiers,
//! multi-character operators over single-character ones, float literals over
//! int literals - which the dispatch encodes by always scanning the longer
//! form first.

use minilang_util::{Diagnostic, Handler, Phase, Span};

use crate::cursor::Cursor;
use crate::token::{keyword_kind, Token, TokenKind};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lexer for MiniLang++ source text.
///
/// Produces one token per call to [`Lexer::next_token`]; lexical errors are
/// reported to the handler and scanning continues past the offending
/// character.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    handler: &'a Handler,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// Invalid characters are reported and skipped; they never surface as
    /// tokens, so the caller only ever sees well-formed kinds.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_blank();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return None;
            }

            let token = match self.cursor.current_char() {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                ',' => self.single(TokenKind::Comma),
                ';' => self.single(TokenKind::Semicolon),
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                '=' => self.one_or_two('=', TokenKind::EqEq, TokenKind::Eq),
                '!' => self.one_or_two('=', TokenKind::NotEq, TokenKind::Not),
                '<' => self.one_or_two('=', TokenKind::LtEq, TokenKind::Lt),
                '>' => self.one_or_two('=', TokenKind::GtEq, TokenKind::Gt),
                '&' => match self.pair_only('&', TokenKind::AndAnd) {
                    Some(token) => token,
                    None => continue,
                },
                '|' => match self.pair_only('|', TokenKind::OrOr) {
                    Some(token) => token,
                    None => continue,
                },
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ident_start(c) => self.lex_identifier(),
                c => {
                    self.report_invalid(c);
                    self.cursor.advance();
                    continue;
                },
            };

            return Some(token);
        }
    }

    /// Byte position of the next character to be scanned.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Skip horizontal whitespace and newlines. Line accounting happens in
    /// the cursor. Any other control character falls through to the
    /// mismatch rule.
    fn skip_blank(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\n') {
            self.cursor.advance();
        }
    }

    /// Consume one character and produce a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind)
    }

    /// Consume the current character, then `second` if present, choosing
    /// between the two-character and one-character kinds.
    fn one_or_two(&mut self, second: char, long: TokenKind, short: TokenKind) -> Token {
        self.cursor.advance();
        if self.cursor.match_char(second) {
            self.make_token(long)
        } else {
            self.make_token(short)
        }
    }

    /// Operators that only exist doubled (`&&`, `||`). A lone first
    /// character matches no rule and is reported as an invalid token.
    fn pair_only(&mut self, second: char, kind: TokenKind) -> Option<Token> {
        let first = self.cursor.current_char();
        self.cursor.advance();
        if self.cursor.match_char(second) {
            Some(self.make_token(kind))
        } else {
            self.report_invalid(first);
            None
        }
    }

    /// Lex an int or float literal. A dot only starts a fraction when a
    /// digit follows, so `5.` lexes as `INT_LIT` then an invalid `.`.
    fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            self.make_token(TokenKind::FloatLit)
        } else {
            self.make_token(TokenKind::IntLit)
        }
    }

    /// Lex an identifier or reserved word.
    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(self.token_start);
        let kind = keyword_kind(lexeme).unwrap_or(TokenKind::Ident);
        self.make_token(kind)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            lexeme: self.cursor.slice_from(self.token_start).to_string(),
            line: self.token_start_line,
            column: self.token_start_column,
        }
    }

    fn report_invalid(&self, c: char) {
        self.handler.emit(Diagnostic::error(
            Phase::Lexer,
            format!("Invalid token {:?}", c),
            Span::new(
                self.token_start,
                self.token_start + c.len_utf8(),
                self.token_start_line,
                self.token_start_column,
            ),
        ));
    }
}

/// Tokenize an entire source text.
///
/// Deterministic and total: lexical errors go to the handler and scanning
/// continues, so the same input always yields the same token stream.
pub fn tokenize(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();

    loop {
        let before = lexer.position();
        match lexer.next_token() {
            Some(token) => tokens.push(token),
            None => break,
        }
        // Every successful scan consumes at least one character. Guard
        // against a zero-width match anyway so a scanner bug cannot hang
        // the compiler.
        if lexer.position() == before {
            handler.emit(Diagnostic::error(
                Phase::Lexer,
                format!("Lexer stuck at position {}", before),
                Span::point(lexer.cursor.line(), lexer.cursor.column()),
            ));
            lexer.cursor.advance();
        }
    }

    tokens
}
