//! TAC instruction model.
//!
//! Three-address code: a linear IR where each instruction references at most
//! three operands and control flow is expressed via labels and jumps.
//! Operands are string "places" - a temporary (`t1`), a variable name, or a
//! literal in canonical form.
//!
//! `Display` produces the textual format, one instruction per line:
//!
//! ```text
//! main:
//! t1 = x + y
//! ifz t1 L1
//! goto L2
//! param x
//! t2 = foo call 1
//! return t2
//! ```

use std::fmt;

use minilang_par::{BinOp, UnOp};

/// A single three-address instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// `name:` - a jump target, or a function entry when `name` is the
    /// function's own name.
    Label(String),
    /// `goto L`
    Goto(String),
    /// `ifz x L` - jump to `L` when `x` is zero/false.
    IfZ { cond: String, label: String },
    /// `ifnz x L` - jump to `L` when `x` is non-zero/true. Part of the
    /// instruction format; the generator itself only emits `ifz`.
    IfNZ { cond: String, label: String },
    /// `r = a`
    Copy { dest: String, src: String },
    /// `r = a OP b`
    Binary {
        dest: String,
        op: BinOp,
        lhs: String,
        rhs: String,
    },
    /// `r = OP a`
    Unary {
        dest: String,
        op: UnOp,
        operand: String,
    },
    /// `r = name call argc`
    Call {
        dest: String,
        func: String,
        argc: usize,
    },
    /// `param x`
    Param(String),
    /// `return x` or `return`
    Return(Option<String>),
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Label(name) => write!(f, "{}:", name),
            Instr::Goto(label) => write!(f, "goto {}", label),
            Instr::IfZ { cond, label } => write!(f, "ifz {} {}", cond, label),
            Instr::IfNZ { cond, label } => write!(f, "ifnz {} {}", cond, label),
            Instr::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Instr::Binary { dest, op, lhs, rhs } => {
                write!(f, "{} = {} {} {}", dest, lhs, op, rhs)
            },
            Instr::Unary { dest, op, operand } => write!(f, "{} = {} {}", dest, op, operand),
            Instr::Call { dest, func, argc } => write!(f, "{} = {} call {}", dest, func, argc),
            Instr::Param(place) => write!(f, "param {}", place),
            Instr::Return(Some(place)) => write!(f, "return {}", place),
            Instr::Return(None) => write!(f, "return"),
        }
    }
}
