//! Edge-case tests for the lexer.

use proptest::prelude::*;

use crate::{tokenize, TokenKind};
use minilang_util::Handler;

#[test]
fn consecutive_invalid_characters() {
    let handler = Handler::new();
    let tokens = tokenize("@#$ int", &handler);
    assert_eq!(handler.error_count(), 3);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Int);
}

#[test]
fn invalid_character_on_later_line() {
    let handler = Handler::new();
    tokenize("int x;\nint ?y;", &handler);
    let diag = &handler.diagnostics()[0];
    assert!(diag.message.contains("Invalid token '?'"));
    assert_eq!(diag.span.line, 2);
    assert_eq!(diag.span.column, 5);
}

#[test]
fn number_glued_to_identifier() {
    // "5x" is INT_LIT then ID: the int rule stops at the first non-digit.
    let handler = Handler::new();
    let tokens = tokenize("5x", &handler);
    assert!(!handler.has_errors());
    assert_eq!(tokens[0].kind, TokenKind::IntLit);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
}

#[test]
fn float_with_second_dot() {
    // "1.2.3" lexes as FLOAT_LIT "1.2", invalid '.', INT_LIT "3".
    let handler = Handler::new();
    let tokens = tokenize("1.2.3", &handler);
    assert_eq!(tokens[0].kind, TokenKind::FloatLit);
    assert_eq!(tokens[0].lexeme, "1.2");
    assert_eq!(tokens[1].kind, TokenKind::IntLit);
    assert!(handler.messages()[0].contains("Invalid token '.'"));
}

#[test]
fn carriage_return_is_a_mismatch() {
    // Only spaces, tabs, and newlines are skippable; '\r' hits the
    // mismatch rule like any other stray character.
    let handler = Handler::new();
    let tokens = tokenize("int\r\nx", &handler);
    assert!(handler.messages()[0].contains("Invalid token '\\r'"));
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[1].column, 1);
}

#[test]
fn program_with_everything() {
    let source = "bool f(int a, float b) { while (a >= 0 && !false) { a = a - 1; } return a != 0 || b <= 2.0; }";
    let handler = Handler::new();
    let tokens = tokenize(source, &handler);
    assert!(!handler.has_errors());
    // Lexeme concatenation reconstructs the source modulo whitespace.
    let joined: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(joined, stripped);
}

proptest! {
    /// Every token's line/column points at the token's first character.
    #[test]
    fn token_positions_index_the_source(source in "[a-z0-9+*(){};=<>! \n]{0,60}") {
        let handler = Handler::new();
        let tokens = tokenize(&source, &handler);
        let lines: Vec<&str> = source.split('\n').collect();
        for token in &tokens {
            let line = lines[(token.line - 1) as usize];
            let col = (token.column - 1) as usize;
            prop_assert_eq!(&line[col..col + token.lexeme.len()], token.lexeme.as_str());
        }
    }

    /// Tokenization is deterministic.
    #[test]
    fn tokenize_is_deterministic(source in "\\PC{0,40}") {
        let h1 = Handler::new();
        let h2 = Handler::new();
        prop_assert_eq!(tokenize(&source, &h1), tokenize(&source, &h2));
        prop_assert_eq!(h1.messages(), h2.messages());
    }
}
