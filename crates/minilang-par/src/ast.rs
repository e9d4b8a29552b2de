//! AST node definitions.
//!
//! The AST is the typed node tree shared by the parser, the semantic
//! analyzer, and the TAC generator. It is built bottom-up during parsing and
//! never mutated afterwards; the later phases are read-only walks.
//!
//! Statements and expressions are tagged sums, so every walk is an
//! exhaustive `match`. Each node carries the [`Span`] of its leading token
//! for diagnostics.

use std::fmt;

use minilang_util::{Span, Symbol};

/// A primitive type. MiniLang++ has no user-defined types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Bool,
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Bool => write!(f, "bool"),
        }
    }
}

/// AST root: an ordered sequence of function definitions.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub functions: Vec<FunctionDef>,
}

/// Function definition.
///
/// Example: `int add(int a, int b) { return a + b; }`
#[derive(Clone, Debug)]
pub struct FunctionDef {
    /// Declared return type.
    pub return_type: Ty,
    /// Function name.
    pub name: Symbol,
    /// Parameters, in declaration order. Parameters never carry an
    /// initializer.
    pub params: Vec<VariableDecl>,
    /// Function body.
    pub body: Block,
    /// Location of the return-type keyword.
    pub span: Span,
}

/// Variable declaration, with an optional initializer.
///
/// Example: `int x = 5;`
#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub var_type: Ty,
    pub name: Symbol,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// Brace-delimited statement sequence. Opens a fresh lexical scope.
#[derive(Clone, Debug)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement.
#[derive(Clone, Debug)]
pub enum Stmt {
    /// `int x = 5;`
    VarDecl(VariableDecl),
    /// `x = 5;`
    Assign(Assignment),
    /// `if (cond) { ... } else { ... }`
    If(If),
    /// `while (cond) { ... }`
    While(While),
    /// `return x;` or `return;`
    Return(Return),
    /// `foo(1, 2);` - a call in statement position, result discarded
    Call(CallExpr),
    /// Bare nested block
    Block(Block),
}

/// Assignment to a previously declared variable.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// Conditional statement. `else` binds to the nearest preceding `if`.
#[derive(Clone, Debug)]
pub struct If {
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// While loop.
#[derive(Clone, Debug)]
pub struct While {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// Return statement with optional value.
#[derive(Clone, Debug)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Expression.
#[derive(Clone, Debug)]
pub enum Expr {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Literal(Literal),
    Identifier(Identifier),
    Call(CallExpr),
}

impl Expr {
    /// Location of the expression's leading token.
    pub fn span(&self) -> Span {
        match self {
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Call(e) => e.span,
        }
    }
}

/// Binary operation.
#[derive(Clone, Debug)]
pub struct BinaryOp {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Binary operators, grouped by the typing rule they follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    /// `+ - * /`: operands share a numeric type, result has that type.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    /// `== != < <= > >=`: operands share any type, result is bool.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    /// `&& ||`: bool operands, bool result.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(s)
    }
}

/// Unary operation. `-` and `!` are right-associative.
#[derive(Clone, Debug)]
pub struct UnaryOp {
    pub op: UnOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    /// Numeric negation (`-x`)
    Neg,
    /// Logical not (`!x`)
    Not,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
        }
    }
}

/// Literal expression with its value and type tag.
#[derive(Clone, Debug)]
pub struct Literal {
    pub value: LitValue,
    pub ty: Ty,
    pub span: Span,
}

/// Literal value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LitValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Identifier reference.
#[derive(Clone, Copy, Debug)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

/// Function call, in expression or statement position.
#[derive(Clone, Debug)]
pub struct CallExpr {
    pub name: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ty_display() {
        assert_eq!(Ty::Int.to_string(), "int");
        assert_eq!(Ty::Float.to_string(), "float");
        assert_eq!(Ty::Bool.to_string(), "bool");
    }

    #[test]
    fn test_binop_display() {
        assert_eq!(BinOp::Add.to_string(), "+");
        assert_eq!(BinOp::Ne.to_string(), "!=");
        assert_eq!(BinOp::And.to_string(), "&&");
    }

    #[test]
    fn test_binop_groups() {
        assert!(BinOp::Div.is_arithmetic());
        assert!(BinOp::Le.is_comparison());
        assert!(BinOp::Or.is_logical());
        assert!(!BinOp::Eq.is_arithmetic());
        assert!(!BinOp::Add.is_logical());
    }

    #[test]
    fn test_expr_span() {
        let span = Span::point(3, 4);
        let expr = Expr::Identifier(Identifier {
            name: Symbol::intern("x"),
            span,
        });
        assert_eq!(expr.span(), span);
    }
}
