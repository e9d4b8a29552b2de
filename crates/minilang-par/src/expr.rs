//! Expression parsing by precedence climbing.
//!
//! Every binary operator gets a pair of binding powers; left-associativity
//! falls out of `right_bp = left_bp + 1`. Unary operators are handled in the
//! prefix position with recursion, which makes them right-associative.
//!
//! | Level | Operators | Associativity |
//! |-------|---------------------|---------------|
//! | 1 | `\|\|` | Left |
//! | 2 | `&&` | Left |
//! | 3 | `==`, `!=` | Left |
//! | 4 | `<`, `<=`, `>`, `>=` | Left |
//! | 5 | `+`, `-` | Left |
//! | 6 | `*`, `/` | Left |

use minilang_lex::{Token, TokenKind};
use minilang_util::Symbol;

use crate::ast::*;
use crate::{ParseAbort, ParseResult, Parser};

/// Binding power levels. Higher numbers bind tighter.
mod bp {
    pub const MIN: u8 = 0;
    pub const LOGICAL_OR: u8 = 1;
    pub const LOGICAL_AND: u8 = 3;
    pub const EQUALITY: u8 = 5;
    pub const RELATIONAL: u8 = 7;
    pub const ADDITIVE: u8 = 9;
    pub const MULTIPLICATIVE: u8 = 11;
}

/// Binding powers and operator for an infix token, or `None` if the token
/// does not continue an expression.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, BinOp)> {
    let (left_bp, op) = match kind {
        TokenKind::OrOr => (bp::LOGICAL_OR, BinOp::Or),
        TokenKind::AndAnd => (bp::LOGICAL_AND, BinOp::And),
        TokenKind::EqEq => (bp::EQUALITY, BinOp::Eq),
        TokenKind::NotEq => (bp::EQUALITY, BinOp::Ne),
        TokenKind::Lt => (bp::RELATIONAL, BinOp::Lt),
        TokenKind::LtEq => (bp::RELATIONAL, BinOp::Le),
        TokenKind::Gt => (bp::RELATIONAL, BinOp::Gt),
        TokenKind::GtEq => (bp::RELATIONAL, BinOp::Ge),
        TokenKind::Plus => (bp::ADDITIVE, BinOp::Add),
        TokenKind::Minus => (bp::ADDITIVE, BinOp::Sub),
        TokenKind::Star => (bp::MULTIPLICATIVE, BinOp::Mul),
        TokenKind::Slash => (bp::MULTIPLICATIVE, BinOp::Div),
        _ => return None,
    };
    Some((left_bp, left_bp + 1, op))
}

impl<'a> Parser<'a> {
    /// Parse a complete expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Precedence-climbing core: parse an expression consuming only
    /// operators whose left binding power is at least `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_factor()?;

        while let Some((left_bp, right_bp, op)) =
            self.current().and_then(|t| infix_binding_power(t.kind))
        {
            if left_bp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.parse_expr_bp(right_bp)?;
            let span = lhs.span();
            lhs = Expr::Binary(BinaryOp {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
                span,
            });
        }

        Ok(lhs)
    }

    /// Parse a factor: a parenthesized expression, a unary operation, an
    /// identifier or call, or a literal.
    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.current() else {
            self.error(
                "Unexpected token EOF in expression".to_string(),
                minilang_util::Span::DUMMY,
            );
            return Err(ParseAbort);
        };
        let token = token.clone();

        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            },
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_factor()?;
                Ok(Expr::Unary(UnaryOp {
                    op: UnOp::Neg,
                    operand: Box::new(operand),
                    span: token.span(),
                }))
            },
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_factor()?;
                Ok(Expr::Unary(UnaryOp {
                    op: UnOp::Not,
                    operand: Box::new(operand),
                    span: token.span(),
                }))
            },
            TokenKind::Ident => {
                if self.lookahead(1).is_some_and(|t| t.kind == TokenKind::LParen) {
                    Ok(Expr::Call(self.parse_call()?))
                } else {
                    self.advance();
                    Ok(Expr::Identifier(Identifier {
                        name: Symbol::intern(&token.lexeme),
                        span: token.span(),
                    }))
                }
            },
            TokenKind::IntLit | TokenKind::FloatLit | TokenKind::True | TokenKind::False => {
                self.parse_literal(&token)
            },
            kind => {
                self.error(
                    format!("Unexpected token {} in expression", kind.name()),
                    token.span(),
                );
                Err(ParseAbort)
            },
        }
    }

    /// `ID '(' args? ')'`
    pub(crate) fn parse_call(&mut self) -> ParseResult<CallExpr> {
        let name_tok = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if self
            .current()
            .is_some_and(|t| t.kind != TokenKind::RParen)
        {
            loop {
                args.push(self.parse_expr()?);
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(CallExpr {
            name: Symbol::intern(&name_tok.lexeme),
            args,
            span: name_tok.span(),
        })
    }

    /// Parse a literal token into a typed literal node.
    fn parse_literal(&mut self, token: &Token) -> ParseResult<Expr> {
        let (value, ty) = match token.kind {
            TokenKind::IntLit => match token.lexeme.parse::<i64>() {
                Ok(value) => (LitValue::Int(value), Ty::Int),
                Err(_) => {
                    self.error(
                        format!("Invalid token {:?}: integer literal out of range", token.lexeme),
                        token.span(),
                    );
                    return Err(ParseAbort);
                },
            },
            TokenKind::FloatLit => match token.lexeme.parse::<f64>() {
                Ok(value) => (LitValue::Float(value), Ty::Float),
                Err(_) => {
                    self.error(
                        format!("Invalid token {:?}: malformed float literal", token.lexeme),
                        token.span(),
                    );
                    return Err(ParseAbort);
                },
            },
            TokenKind::True => (LitValue::Bool(true), Ty::Bool),
            // Only literal kinds are dispatched here.
            _ => (LitValue::Bool(false), Ty::Bool),
        };
        self.advance();

        Ok(Expr::Literal(Literal {
            value,
            ty,
            span: token.span(),
        }))
    }
}
