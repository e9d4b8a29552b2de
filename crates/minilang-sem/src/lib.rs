//! minilang-sem - Semantic Analyzer
//!
//! A two-pass, read-only walk over the AST:
//!
//! 1. **Signature registration.** Every function signature is added to the
//!    global scope first, so functions are visible everywhere and need no
//!    forward declarations.
//! 2. **Body analysis.** Each function body is checked in a fresh scope
//!    parented to the global scope, with parameters bound first and each
//!    nested block opening its own scope.
//!
//! Errors are collected, never thrown: the walk always continues, and every
//! scope push is paired with a pop on the single exit path of the function
//! that pushed it.
//!
//! Expression checking returns `Option<Ty>`, where `None` means "type
//! unknown because an error was already reported". Unknown is silently
//! compatible with everything, so one bad sub-expression produces exactly
//! one diagnostic instead of a cascade.

mod symbol_table;

use minilang_par::{
    Assignment, BinaryOp, Block, CallExpr, Expr, FunctionDef, If, Program, Return, Stmt, Ty, UnOp,
    VariableDecl, While,
};
use minilang_util::{Diagnostic, Handler, Phase, Span};

pub use symbol_table::{
    Binding, BindingKind, ParamSig, Redeclaration, SymbolTable, SymbolTableStack, TableId,
};

/// Render an `Option<Ty>` for diagnostics.
fn type_name(ty: Option<Ty>) -> String {
    match ty {
        Some(ty) => ty.to_string(),
        None => "unknown".to_string(),
    }
}

/// Scope-aware semantic analyzer: name resolution, type checking, and
/// symbol-table construction.
pub struct SemanticAnalyzer<'a> {
    handler: &'a Handler,
    tables: SymbolTableStack,
    /// Declared return type of the function currently being analyzed.
    current_return_type: Option<Ty>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            tables: SymbolTableStack::new(),
            current_return_type: None,
        }
    }

    /// Analyze a whole program. Diagnostics go to the handler; the symbol
    /// tables remain available afterwards via [`SemanticAnalyzer::tables`].
    pub fn analyze(&mut self, program: &Program) {
        let global = self.tables.push_scope("global");

        // Pass 1: register all function signatures.
        for func in &program.functions {
            if self.tables.table(global).get_local(func.name).is_some() {
                self.error(format!("Function redeclaration: {}", func.name), func.span);
                continue;
            }
            let params = func
                .params
                .iter()
                .map(|p| ParamSig {
                    ty: p.var_type,
                    name: p.name,
                })
                .collect();
            if let Err(err) = self.tables.add(Binding {
                name: func.name,
                ty: func.return_type,
                kind: BindingKind::Function { params },
            }) {
                self.error(err.to_string(), func.span);
            }
        }

        // Pass 2: analyze each function body.
        for func in &program.functions {
            self.analyze_function(func);
        }

        self.tables.pop_scope();
    }

    /// The symbol tables built during analysis.
    pub fn tables(&self) -> &SymbolTableStack {
        &self.tables
    }

    /// Consume the analyzer and keep the symbol tables.
    pub fn into_tables(self) -> SymbolTableStack {
        self.tables
    }

    fn analyze_function(&mut self, func: &FunctionDef) {
        self.tables.push_scope(format!("function {}", func.name));

        for param in &func.params {
            if let Err(err) = self.tables.add(Binding {
                name: param.name,
                ty: param.var_type,
                kind: BindingKind::Parameter,
            }) {
                self.error(err.to_string(), param.span);
            }
        }

        self.current_return_type = Some(func.return_type);
        self.analyze_block(&func.body);
        self.tables.pop_scope();
    }

    fn analyze_block(&mut self, block: &Block) {
        self.tables.push_scope("block");
        for stmt in &block.statements {
            self.analyze_stmt(stmt);
        }
        self.tables.pop_scope();
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.analyze_vardecl(decl),
            Stmt::Assign(assign) => self.analyze_assignment(assign),
            Stmt::If(ifstmt) => self.analyze_if(ifstmt),
            Stmt::While(whilestmt) => self.analyze_while(whilestmt),
            Stmt::Return(ret) => self.analyze_return(ret),
            Stmt::Call(call) => {
                // Statement position: the call is checked, the result type
                // is discarded.
                self.analyze_call(call);
            },
            Stmt::Block(block) => self.analyze_block(block),
        }
    }

    fn analyze_vardecl(&mut self, decl: &VariableDecl) {
        if let Err(err) = self.tables.add(Binding {
            name: decl.name,
            ty: decl.var_type,
            kind: BindingKind::Variable,
        }) {
            self.error(err.to_string(), decl.span);
        }

        if let Some(init) = &decl.initializer {
            if let Some(init_ty) = self.analyze_expr(init) {
                if init_ty != decl.var_type {
                    self.error(
                        format!(
                            "Type mismatch in initialization of {}: {} = {}",
                            decl.name, decl.var_type, init_ty
                        ),
                        decl.span,
                    );
                }
            }
        }
    }

    fn analyze_assignment(&mut self, assign: &Assignment) {
        let target_ty = match self.tables.lookup(assign.target.name) {
            Some(binding) => binding.ty,
            None => {
                self.error(
                    format!("Undeclared variable: {}", assign.target.name),
                    assign.span,
                );
                return;
            },
        };

        if let Some(value_ty) = self.analyze_expr(&assign.value) {
            if value_ty != target_ty {
                self.error(
                    format!(
                        "Type mismatch in assignment to {}: {} = {}",
                        assign.target.name, target_ty, value_ty
                    ),
                    assign.span,
                );
            }
        }
    }

    fn analyze_if(&mut self, ifstmt: &If) {
        if let Some(cond_ty) = self.analyze_expr(&ifstmt.condition) {
            if cond_ty != Ty::Bool {
                self.error(
                    format!("Condition in if must be bool, got {}", cond_ty),
                    ifstmt.span,
                );
            }
        }
        self.analyze_block(&ifstmt.then_block);
        if let Some(else_block) = &ifstmt.else_block {
            self.analyze_block(else_block);
        }
    }

    fn analyze_while(&mut self, whilestmt: &While) {
        if let Some(cond_ty) = self.analyze_expr(&whilestmt.condition) {
            if cond_ty != Ty::Bool {
                self.error(
                    format!("Condition in while must be bool, got {}", cond_ty),
                    whilestmt.span,
                );
            }
        }
        self.analyze_block(&whilestmt.body);
    }

    fn analyze_return(&mut self, ret: &Return) {
        match &ret.value {
            Some(value) => {
                if let (Some(value_ty), Some(expected)) =
                    (self.analyze_expr(value), self.current_return_type)
                {
                    if value_ty != expected {
                        self.error(
                            format!("Return type mismatch: expected {}, got {}", expected, value_ty),
                            ret.span,
                        );
                    }
                }
            },
            None => {
                // The type grammar has no void, so a bare `return;` always
                // diagnoses. The check is kept in this shape so extending
                // the type set later does not change the walk.
                if let Some(expected) = self.current_return_type {
                    self.error(
                        format!(
                            "Return statement missing value for function returning {}",
                            expected
                        ),
                        ret.span,
                    );
                }
            },
        }
    }

    /// Check a call and return the callee's return type, or `None` if the
    /// callee is unknown.
    fn analyze_call(&mut self, call: &CallExpr) -> Option<Ty> {
        let (return_ty, params) = match self.tables.lookup(call.name) {
            Some(binding) => match &binding.kind {
                BindingKind::Function { params } => (binding.ty, params.clone()),
                _ => {
                    self.error(format!("Undeclared function: {}", call.name), call.span);
                    return None;
                },
            },
            None => {
                self.error(format!("Undeclared function: {}", call.name), call.span);
                return None;
            },
        };

        if params.len() != call.args.len() {
            self.error(
                format!(
                    "Function {} expects {} args, got {}",
                    call.name,
                    params.len(),
                    call.args.len()
                ),
                call.span,
            );
        }

        for (sig, arg) in params.iter().zip(&call.args) {
            if let Some(arg_ty) = self.analyze_expr(arg) {
                if arg_ty != sig.ty {
                    self.error(
                        format!(
                            "Function {} argument type mismatch: expected {}, got {}",
                            call.name, sig.ty, arg_ty
                        ),
                        arg.span(),
                    );
                }
            }
        }

        Some(return_ty)
    }

    /// Infer an expression's type. `None` means a prior error already made
    /// the type unknown; no further diagnostics are chained onto it.
    fn analyze_expr(&mut self, expr: &Expr) -> Option<Ty> {
        match expr {
            Expr::Literal(lit) => Some(lit.ty),
            Expr::Identifier(id) => match self.tables.lookup(id.name) {
                Some(binding) => Some(binding.ty),
                None => {
                    self.error(format!("Undeclared identifier: {}", id.name), id.span);
                    None
                },
            },
            Expr::Binary(bin) => {
                let left = self.analyze_expr(&bin.left);
                let right = self.analyze_expr(&bin.right);
                self.check_binary(bin, left, right)
            },
            Expr::Unary(un) => {
                let operand = self.analyze_expr(&un.operand);
                match (un.op, operand) {
                    (_, None) => None,
                    (UnOp::Neg, Some(ty)) if matches!(ty, Ty::Int | Ty::Float) => Some(ty),
                    (UnOp::Not, Some(Ty::Bool)) => Some(Ty::Bool),
                    (op, Some(ty)) => {
                        self.error(format!("Unary op {} type error: got {}", op, ty), un.span);
                        None
                    },
                }
            },
            Expr::Call(call) => self.analyze_call(call),
        }
    }

    fn check_binary(&mut self, bin: &BinaryOp, left: Option<Ty>, right: Option<Ty>) -> Option<Ty> {
        let op = bin.op;

        if op.is_arithmetic() {
            match (left, right) {
                (Some(l), Some(r)) => {
                    if l == r && matches!(l, Ty::Int | Ty::Float) {
                        Some(l)
                    } else {
                        self.error(
                            format!("Type error in binary op {}: {} {} {}", op, l, op, r),
                            bin.span,
                        );
                        None
                    }
                },
                _ => None,
            }
        } else if op.is_comparison() {
            if let (Some(l), Some(r)) = (left, right) {
                if l != r {
                    self.error(
                        format!("Type error in comparison: {} {} {}", l, op, r),
                        bin.span,
                    );
                }
            }
            Some(Ty::Bool)
        } else {
            let non_bool = |ty: Option<Ty>| matches!(ty, Some(t) if t != Ty::Bool);
            if non_bool(left) || non_bool(right) {
                self.error(
                    format!(
                        "Logical op {} requires bool operands, got {}, {}",
                        op,
                        type_name(left),
                        type_name(right)
                    ),
                    bin.span,
                );
            }
            Some(Ty::Bool)
        }
    }

    fn error(&self, message: String, span: Span) {
        self.handler
            .emit(Diagnostic::error(Phase::Semantic, message, span));
    }
}

/// Analyze a program, reporting diagnostics to the handler and returning
/// the symbol tables that were built.
pub fn analyze(program: &Program, handler: &Handler) -> SymbolTableStack {
    let mut analyzer = SemanticAnalyzer::new(handler);
    analyzer.analyze(program);
    analyzer.into_tables()
}
