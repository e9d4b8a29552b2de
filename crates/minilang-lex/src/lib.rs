//! minilang-lex - Lexical Analyzer
//!
//! The lexer transforms MiniLang++ source text into a stream of [`Token`]s
//! using maximal-munch scanning: at every position the longest matching rule
//! wins, with keywords taking priority over identifiers and multi-character
//! operators over their single-character prefixes.
//!
//! Lexical errors are never fatal. An unrecognized character produces an
//! `Invalid token` diagnostic and scanning resumes at the next character, so
//! the parser always receives whatever token stream could be salvaged.
//!
//! ```
//! use minilang_lex::{tokenize, TokenKind};
//! use minilang_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("int x = 5;", &handler);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(tokens[0].kind, TokenKind::Int);
//! assert_eq!(tokens[1].lexeme, "x");
//! ```

pub mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

#[cfg(test)]
mod edge_cases;
