//! minilang-util - Foundation types shared by every compiler phase.
//!
//! This crate provides the small set of utilities the rest of the pipeline is
//! built on:
//!
//! - [`Span`] - source location tracking (byte range plus line/column)
//! - [`Diagnostic`] / [`Handler`] - the shared diagnostics sink every phase
//!   reports into
//! - [`Symbol`] - interned strings for identifiers and function names
//! - [`IndexVec`] / [`Idx`] - vectors with typed indices, used for the
//!   scope arena
//!
//! Everything here is deliberately phase-agnostic: the lexer, parser,
//! semantic analyzer, and TAC generator all depend on this crate and on
//! nothing else of each other's internals.

pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level, Phase};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;

// Re-export the hash map used throughout the compiler.
pub use rustc_hash::FxHashMap;
