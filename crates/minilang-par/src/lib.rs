//! minilang-par - Parser (Syntactic Analyzer)
//!
//! A recursive-descent parser with one-token lookahead. Expressions are
//! parsed by precedence climbing; statements and declarations by one
//! function per grammar production.
//!
//! # Grammar
//!
//! ```ebnf
//! program     = { function } ;
//! function    = type ID "(" [ params ] ")" block ;
//! params      = param { "," param } ;
//! param       = type ID ;
//! block       = "{" { statement } "}" ;
//! statement   = vardecl | assignment | ifstmt | whilestmt
//!             | returnstmt | callstmt | block ;
//! vardecl     = type ID [ "=" expr ] ";" ;
//! assignment  = ID "=" expr ";" ;
//! callstmt    = ID "(" [ args ] ")" ";" ;
//! ifstmt      = "if" "(" expr ")" block [ "else" block ] ;
//! whilestmt   = "while" "(" expr ")" block ;
//! returnstmt  = "return" [ expr ] ";" ;
//! ```
//!
//! Operator precedence (lowest to highest, all left-associative):
//! `||`, `&&`, `== !=`, `< <= > >=`, `+ -`, `* /`. Unary `-` and `!` bind
//! tighter than every binary operator and are right-associative.
//!
//! # Error recovery
//!
//! The parser runs in panic mode per function: `expect` records a
//! diagnostic and returns the [`ParseAbort`] sentinel, which unwinds the
//! current function through `?`. The top-level loop catches it and
//! synchronizes to the next type keyword (`int`/`float`/`bool`), the anchor
//! set for the next function definition.

pub mod ast;
mod expr;
mod stmt;

use thiserror::Error;

use minilang_lex::{Token, TokenKind};
use minilang_util::{Diagnostic, Handler, Phase, Span, Symbol};

pub use ast::*;

/// Sentinel raised by `expect`/`unexpected` paths to abandon the current
/// function. Caught by the top-level parse loop, never surfaced to callers.
#[derive(Debug, Error)]
#[error("syntax error, abandoning current function")]
pub struct ParseAbort;

/// Result type used by every parsing production.
pub type ParseResult<T> = Result<T, ParseAbort>;

const TYPE_KEYWORDS: [TokenKind; 3] = [TokenKind::Int, TokenKind::Float, TokenKind::Bool];

/// Recursive-descent parser over a token stream.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given tokens.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
        }
    }

    /// Parse a complete program.
    ///
    /// Never fails: each function that cannot be parsed is reported and
    /// skipped, and parsing resumes at the next type keyword.
    pub fn parse(&mut self) -> Program {
        let mut functions = Vec::new();

        while self.current().is_some() {
            match self.parse_function() {
                Ok(func) => functions.push(func),
                Err(ParseAbort) => self.synchronize(),
            }
        }

        Program { functions }
    }

    /// Skip tokens until the next likely function start (a type keyword) or
    /// end of input.
    fn synchronize(&mut self) {
        while let Some(token) = self.current() {
            if token.kind.is_type_keyword() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Parse one function definition.
    fn parse_function(&mut self) -> ParseResult<FunctionDef> {
        let type_tok = self.expect_one_of(&TYPE_KEYWORDS)?;
        let return_type = Self::type_of(type_tok.kind);
        let name_tok = self.expect(TokenKind::Ident)?;
        let name = Symbol::intern(&name_tok.lexeme);

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(FunctionDef {
            return_type,
            name,
            params,
            body,
            span: type_tok.span(),
        })
    }

    /// Parse a comma-separated parameter list. May be empty.
    fn parse_params(&mut self) -> ParseResult<Vec<VariableDecl>> {
        let mut params = Vec::new();

        if self.current().is_some_and(|t| t.kind.is_type_keyword()) {
            loop {
                let type_tok = self.expect_one_of(&TYPE_KEYWORDS)?;
                let name_tok = self.expect(TokenKind::Ident)?;

                params.push(VariableDecl {
                    var_type: Self::type_of(type_tok.kind),
                    name: Symbol::intern(&name_tok.lexeme),
                    initializer: None,
                    span: type_tok.span(),
                });

                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        Ok(params)
    }

    fn type_of(kind: TokenKind) -> Ty {
        match kind {
            TokenKind::Int => Ty::Int,
            TokenKind::Float => Ty::Float,
            // Callers only hand over type keywords.
            _ => Ty::Bool,
        }
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// The current token, or `None` at end of input.
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Peek `n` tokens ahead. `lookahead(1)` distinguishes `ID (` (call)
    /// from a bare `ID` (assignment target).
    fn lookahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// True if the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    /// Consume and return the current token if it has the given kind.
    fn match_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            let token = self.tokens[self.pos].clone();
            self.advance();
            Some(token)
        } else {
            None
        }
    }

    /// Consume a token of one of the given kinds, or record an
    /// `Expected ... but found ...` diagnostic and abort the current
    /// function.
    fn expect_one_of(&mut self, kinds: &[TokenKind]) -> ParseResult<Token> {
        for &kind in kinds {
            if let Some(token) = self.match_kind(kind) {
                return Ok(token);
            }
        }

        let expected = kinds
            .iter()
            .map(|k| k.name().to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        let (found, span) = match self.current() {
            Some(token) => (token.kind.name(), token.span()),
            None => ("EOF", Span::DUMMY),
        };
        self.error(format!("Expected {} but found {}", expected, found), span);
        Err(ParseAbort)
    }

    /// Consume a token of exactly the given kind.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        self.expect_one_of(&[kind])
    }

    fn error(&self, message: String, span: Span) {
        self.handler
            .emit(Diagnostic::error(Phase::Parser, message, span));
    }
}

/// Parse a token stream into a [`Program`], reporting syntax errors to the
/// handler.
pub fn parse(tokens: Vec<Token>, handler: &Handler) -> Program {
    Parser::new(tokens, handler).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minilang_lex::tokenize;

    fn parse_source(source: &str) -> (Program, Handler) {
        let handler = Handler::new();
        let tokens = tokenize(source, &handler);
        let program = parse(tokens, &handler);
        (program, handler)
    }

    // =========================================================================
    // FUNCTIONS AND DECLARATIONS
    // =========================================================================

    #[test]
    fn test_function_and_vardecl() {
        let (program, handler) = parse_source("int main() { int x = 5; return x; }");
        assert!(!handler.has_errors());
        assert_eq!(program.functions.len(), 1);

        let func = &program.functions[0];
        assert_eq!(func.return_type, Ty::Int);
        assert_eq!(func.name.as_str(), "main");
        assert!(func.params.is_empty());
        assert!(matches!(func.body.statements[0], Stmt::VarDecl(_)));
        assert!(matches!(func.body.statements[1], Stmt::Return(_)));
    }

    #[test]
    fn test_parameters() {
        let (program, handler) = parse_source("float mix(int a, float b, bool c) { return b; }");
        assert!(!handler.has_errors());

        let params = &program.functions[0].params;
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].var_type, Ty::Int);
        assert_eq!(params[1].var_type, Ty::Float);
        assert_eq!(params[2].var_type, Ty::Bool);
        assert_eq!(params[2].name.as_str(), "c");
        assert!(params.iter().all(|p| p.initializer.is_none()));
    }

    #[test]
    fn test_multiple_functions() {
        let (program, handler) =
            parse_source("int foo() { return 1; } bool bar() { return true; }");
        assert!(!handler.has_errors());
        assert_eq!(program.functions.len(), 2);
        assert_eq!(program.functions[1].return_type, Ty::Bool);
    }

    #[test]
    fn test_vardecl_without_initializer() {
        let (program, handler) = parse_source("int main() { int x; }");
        assert!(!handler.has_errors());
        match &program.functions[0].body.statements[0] {
            Stmt::VarDecl(decl) => assert!(decl.initializer.is_none()),
            other => panic!("expected vardecl, got {:?}", other),
        }
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    #[test]
    fn test_if_else_and_while() {
        let (program, handler) = parse_source(
            "int f() { if (1 == 1) { return 1; } else { return 0; } while (false) { x = 1; } }",
        );
        assert!(!handler.has_errors());

        let stmts = &program.functions[0].body.statements;
        assert!(matches!(&stmts[0], Stmt::If(i) if i.else_block.is_some()));
        assert!(matches!(stmts[1], Stmt::While(_)));
    }

    #[test]
    fn test_if_without_else() {
        let (program, handler) = parse_source("int f() { if (true) { return 1; } return 0; }");
        assert!(!handler.has_errors());
        assert!(
            matches!(&program.functions[0].body.statements[0], Stmt::If(i) if i.else_block.is_none())
        );
    }

    #[test]
    fn test_call_statement_disambiguation() {
        let (program, handler) = parse_source("int f() { foo(1, 2); x = 3; }");
        assert!(!handler.has_errors());

        let stmts = &program.functions[0].body.statements;
        match &stmts[0] {
            Stmt::Call(call) => {
                assert_eq!(call.name.as_str(), "foo");
                assert_eq!(call.args.len(), 2);
            },
            other => panic!("expected call statement, got {:?}", other),
        }
        assert!(matches!(stmts[1], Stmt::Assign(_)));
    }

    #[test]
    fn test_bare_return() {
        let (program, handler) = parse_source("int f() { return; }");
        assert!(!handler.has_errors());
        assert!(
            matches!(&program.functions[0].body.statements[0], Stmt::Return(r) if r.value.is_none())
        );
    }

    #[test]
    fn test_nested_block_statement() {
        let (program, handler) = parse_source("int f() { { int x = 1; } }");
        assert!(!handler.has_errors());
        assert!(matches!(
            program.functions[0].body.statements[0],
            Stmt::Block(_)
        ));
    }

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================

    #[test]
    fn test_expected_diagnostic() {
        let (_, handler) = parse_source("int main( { }");
        assert!(handler.has_errors());
        let messages = handler.phase_messages(Phase::Parser);
        assert!(messages[0].contains("Expected"), "got {:?}", messages);
        assert!(messages[0].contains("but found"));
    }

    #[test]
    fn test_synchronize_to_next_function() {
        // The first function is broken; the second still parses.
        let (program, handler) = parse_source("int broken( { } int ok() { return 1; }");
        assert!(handler.has_errors());
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].name.as_str(), "ok");
    }

    #[test]
    fn test_unexpected_statement_token() {
        let (_, handler) = parse_source("int f() { ; }");
        let messages = handler.phase_messages(Phase::Parser);
        assert!(messages.iter().any(|m| m.contains("Unexpected token SEMI")));
    }

    #[test]
    fn test_eof_in_function() {
        let (program, handler) = parse_source("int main() { int x = 5;");
        assert!(handler.has_errors());
        assert!(handler
            .phase_messages(Phase::Parser)
            .iter()
            .any(|m| m.contains("but found EOF")));
        assert!(program.functions.is_empty());
    }

    #[test]
    fn test_parse_continues_after_lex_error() {
        // The lexer drops the '$' and reports it; the parser copes with the
        // remaining stream.
        let (program, handler) = parse_source("int main() { int x = 5; } $");
        assert_eq!(handler.phase_messages(Phase::Parser).len(), 0);
        assert_eq!(handler.phase_messages(Phase::Lexer).len(), 1);
        assert_eq!(program.functions.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let (program, handler) = parse_source("");
        assert!(!handler.has_errors());
        assert!(program.functions.is_empty());
    }
}
