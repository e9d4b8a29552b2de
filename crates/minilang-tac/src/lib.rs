//! minilang-tac - Three-Address Code Generator
//!
//! Lowers the AST to a linear sequence of [`Instr`]s. Expression lowering
//! returns a string "place" (temporary, variable name, or literal in
//! canonical form); statement lowering emits instructions and introduces
//! labels for control flow.
//!
//! Temporaries (`t1, t2, ...`) and labels (`L1, L2, ...`) are numbered by
//! counters owned by the generator, so numbering is globally unique within
//! one compilation and byte-for-byte deterministic across runs.
//!
//! Generation is best-effort: it runs on whatever AST the parser produced,
//! even when earlier phases reported errors.

mod instr;

use minilang_par::{
    Assignment, BinOp, Block, CallExpr, Expr, FunctionDef, If, LitValue, Literal, Program, Return,
    Stmt, VariableDecl, While,
};

pub use instr::Instr;

/// Canonical place text for a literal: lowercase for booleans, decimal
/// digits for ints, decimal-point form for floats.
fn literal_place(lit: &Literal) -> String {
    match lit.value {
        LitValue::Int(v) => v.to_string(),
        LitValue::Bool(v) => v.to_string(),
        LitValue::Float(v) => float_place(v),
    }
}

/// Decimal-point form: `2.0` rather than `2`.
fn float_place(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// True if the place is a non-negative integer literal - the only operand
/// shape the folder accepts.
fn is_all_digits(place: &str) -> bool {
    !place.is_empty() && place.bytes().all(|b| b.is_ascii_digit())
}

/// Fold integer-literal arithmetic. Returns the folded place, or `None`
/// when the operator is not arithmetic, an operand is not an all-digit
/// literal, or the checked arithmetic fails (overflow, division by zero).
fn fold_arithmetic(op: BinOp, lhs: &str, rhs: &str) -> Option<String> {
    if !is_all_digits(lhs) || !is_all_digits(rhs) {
        return None;
    }
    let a: i64 = lhs.parse().ok()?;
    let b: i64 = rhs.parse().ok()?;

    let value = match op {
        BinOp::Add => a.checked_add(b)?,
        BinOp::Sub => a.checked_sub(b)?,
        BinOp::Mul => a.checked_mul(b)?,
        BinOp::Div => a.checked_div(b)?,
        _ => return None,
    };
    Some(value.to_string())
}

/// TAC generator. Counters are fields so nothing leaks across runs; one
/// generator corresponds to one compilation.
#[derive(Default)]
pub struct TacGenerator {
    instructions: Vec<Instr>,
    temp_count: u32,
    label_count: u32,
}

impl TacGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a whole program and return the instruction sequence.
    pub fn generate(mut self, program: &Program) -> Vec<Instr> {
        for func in &program.functions {
            self.gen_function(func);
        }
        self.instructions
    }

    fn new_temp(&mut self) -> String {
        self.temp_count += 1;
        format!("t{}", self.temp_count)
    }

    fn new_label(&mut self) -> String {
        self.label_count += 1;
        format!("L{}", self.label_count)
    }

    fn emit(&mut self, instr: Instr) {
        self.instructions.push(instr);
    }

    /// Per function: an entry label named after the function, then the
    /// body. No end-of-function marker; `return` appears only where the
    /// source has one.
    fn gen_function(&mut self, func: &FunctionDef) {
        self.emit(Instr::Label(func.name.as_str().to_string()));
        self.gen_block(&func.body);
    }

    fn gen_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.gen_stmt(stmt);
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.gen_vardecl(decl),
            Stmt::Assign(assign) => self.gen_assignment(assign),
            Stmt::If(ifstmt) => self.gen_if(ifstmt),
            Stmt::While(whilestmt) => self.gen_while(whilestmt),
            Stmt::Return(ret) => self.gen_return(ret),
            Stmt::Call(call) => {
                self.gen_call(call);
            },
            Stmt::Block(block) => self.gen_block(block),
        }
    }

    /// A declaration without initializer emits nothing.
    fn gen_vardecl(&mut self, decl: &VariableDecl) {
        if let Some(init) = &decl.initializer {
            let place = self.gen_expr(init);
            self.emit(Instr::Copy {
                dest: decl.name.as_str().to_string(),
                src: place,
            });
        }
    }

    fn gen_assignment(&mut self, assign: &Assignment) {
        let place = self.gen_expr(&assign.value);
        self.emit(Instr::Copy {
            dest: assign.target.name.as_str().to_string(),
            src: place,
        });
    }

    /// Without else:
    ///
    /// ```text
    ///     ifz cond Lelse
    ///     <then>
    /// Lelse:
    /// ```
    ///
    /// With else (the end label is allocated after the else label, so the
    /// else label always numbers lower):
    ///
    /// ```text
    ///     ifz cond Lelse
    ///     <then>
    ///     goto Lend
    /// Lelse:
    ///     <else>
    /// Lend:
    /// ```
    fn gen_if(&mut self, ifstmt: &If) {
        let cond_place = self.gen_expr(&ifstmt.condition);
        let else_label = self.new_label();
        let end_label = ifstmt.else_block.as_ref().map(|_| self.new_label());

        self.emit(Instr::IfZ {
            cond: cond_place,
            label: else_label.clone(),
        });
        self.gen_block(&ifstmt.then_block);

        match (&ifstmt.else_block, end_label) {
            (Some(else_block), Some(end_label)) => {
                self.emit(Instr::Goto(end_label.clone()));
                self.emit(Instr::Label(else_label));
                self.gen_block(else_block);
                self.emit(Instr::Label(end_label));
            },
            _ => {
                self.emit(Instr::Label(else_label));
            },
        }
    }

    /// ```text
    /// Lstart:
    ///     ifz cond Lend
    ///     <body>
    ///     goto Lstart
    /// Lend:
    /// ```
    fn gen_while(&mut self, whilestmt: &While) {
        let start_label = self.new_label();
        let end_label = self.new_label();

        self.emit(Instr::Label(start_label.clone()));
        let cond_place = self.gen_expr(&whilestmt.condition);
        self.emit(Instr::IfZ {
            cond: cond_place,
            label: end_label.clone(),
        });
        self.gen_block(&whilestmt.body);
        self.emit(Instr::Goto(start_label));
        self.emit(Instr::Label(end_label));
    }

    fn gen_return(&mut self, ret: &Return) {
        match &ret.value {
            Some(value) => {
                let place = self.gen_expr(value);
                self.emit(Instr::Return(Some(place)));
            },
            None => self.emit(Instr::Return(None)),
        }
    }

    /// Arguments are lowered left to right, one `param` per argument in
    /// order, then the call with its argument count.
    fn gen_call(&mut self, call: &CallExpr) -> String {
        let arg_places: Vec<String> = call.args.iter().map(|arg| self.gen_expr(arg)).collect();
        let argc = arg_places.len();
        for place in arg_places {
            self.emit(Instr::Param(place));
        }

        let dest = self.new_temp();
        self.emit(Instr::Call {
            dest: dest.clone(),
            func: call.name.as_str().to_string(),
            argc,
        });
        dest
    }

    /// Lower an expression, returning its place. Literals and identifiers
    /// emit nothing; folded arithmetic emits nothing either.
    fn gen_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal_place(lit),
            Expr::Identifier(id) => id.name.as_str().to_string(),
            Expr::Binary(bin) => {
                let lhs = self.gen_expr(&bin.left);
                let rhs = self.gen_expr(&bin.right);

                if let Some(folded) = fold_arithmetic(bin.op, &lhs, &rhs) {
                    return folded;
                }

                let dest = self.new_temp();
                self.emit(Instr::Binary {
                    dest: dest.clone(),
                    op: bin.op,
                    lhs,
                    rhs,
                });
                dest
            },
            Expr::Unary(un) => {
                let operand = self.gen_expr(&un.operand);
                let dest = self.new_temp();
                self.emit(Instr::Unary {
                    dest: dest.clone(),
                    op: un.op,
                    operand,
                });
                dest
            },
            Expr::Call(call) => self.gen_call(call),
        }
    }
}

/// Lower a program to TAC.
pub fn generate(program: &Program) -> Vec<Instr> {
    TacGenerator::new().generate(program)
}
