//! Statement parsing.

use minilang_lex::TokenKind;
use minilang_util::Symbol;

use crate::ast::*;
use crate::{ParseAbort, ParseResult, Parser, TYPE_KEYWORDS};

impl<'a> Parser<'a> {
    /// Parse a brace-delimited block.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while self
            .current()
            .is_some_and(|t| t.kind != TokenKind::RBrace)
        {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;

        Ok(Block {
            statements,
            span: open.span(),
        })
    }

    /// Parse a single statement, dispatching on the current token.
    ///
    /// An identifier needs one token of lookahead: `ID (` starts a call
    /// statement, anything else is an assignment target.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let Some(token) = self.current() else {
            // Unreachable from parse_block, which stops at RBRACE or EOF.
            self.error(
                "Unexpected token EOF".to_string(),
                minilang_util::Span::DUMMY,
            );
            return Err(ParseAbort);
        };

        match token.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::Bool => {
                Ok(Stmt::VarDecl(self.parse_vardecl()?))
            },
            TokenKind::Ident => {
                if self.lookahead(1).is_some_and(|t| t.kind == TokenKind::LParen) {
                    let call = self.parse_call()?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Stmt::Call(call))
                } else {
                    Ok(Stmt::Assign(self.parse_assignment()?))
                }
            },
            TokenKind::If => Ok(Stmt::If(self.parse_if()?)),
            TokenKind::While => Ok(Stmt::While(self.parse_while()?)),
            TokenKind::Return => Ok(Stmt::Return(self.parse_return()?)),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            kind => {
                let span = token.span();
                self.error(format!("Unexpected token {}", kind.name()), span);
                Err(ParseAbort)
            },
        }
    }

    /// `type ID ('=' expr)? ';'`
    fn parse_vardecl(&mut self) -> ParseResult<VariableDecl> {
        let type_tok = self.expect_one_of(&TYPE_KEYWORDS)?;
        let name_tok = self.expect(TokenKind::Ident)?;

        let initializer = if self.match_kind(TokenKind::Eq).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(VariableDecl {
            var_type: Self::type_of(type_tok.kind),
            name: Symbol::intern(&name_tok.lexeme),
            initializer,
            span: type_tok.span(),
        })
    }

    /// `ID '=' expr ';'`
    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        let name_tok = self.expect(TokenKind::Ident)?;
        let target = Identifier {
            name: Symbol::intern(&name_tok.lexeme),
            span: name_tok.span(),
        };

        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Assignment {
            target,
            value,
            span: name_tok.span(),
        })
    }

    /// `'if' '(' expr ')' block ('else' block)?`
    fn parse_if(&mut self) -> ParseResult<If> {
        let if_tok = self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block()?;

        let else_block = if self.match_kind(TokenKind::Else).is_some() {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(If {
            condition,
            then_block,
            else_block,
            span: if_tok.span(),
        })
    }

    /// `'while' '(' expr ')' block`
    fn parse_while(&mut self) -> ParseResult<While> {
        let while_tok = self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(While {
            condition,
            body,
            span: while_tok.span(),
        })
    }

    /// `'return' expr? ';'`
    fn parse_return(&mut self) -> ParseResult<Return> {
        let ret_tok = self.expect(TokenKind::Return)?;

        let value = if self
            .current()
            .is_some_and(|t| t.kind != TokenKind::Semicolon)
        {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(Return {
            value,
            span: ret_tok.span(),
        })
    }
}
