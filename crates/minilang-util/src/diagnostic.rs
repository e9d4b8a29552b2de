//! Diagnostic - error reporting infrastructure.
//!
//! Every phase reports problems into a shared [`Handler`] instead of failing
//! fast: lexical errors never stop scanning, syntax errors abandon at most
//! the current function, and semantic errors never abort the walk at all.
//! The driver renders whatever accumulated at the end of the run.
//!
//! A rendered diagnostic always carries a phase tag, the reason, and (when a
//! token was available) the line/column of the offending source:
//!
//! ```text
//! error[lexer]: Invalid token '$' at line 1, column 5
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error: the run is considered failed, but compilation continues.
    Error,
    /// A warning: informational only.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// The pipeline phase a diagnostic originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Parser,
    Semantic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexer => write!(f, "lexer"),
            Phase::Parser => write!(f, "parser"),
            Phase::Semantic => write!(f, "semantic"),
        }
    }
}

/// A single diagnostic message with severity, phase, and location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Phase that produced the diagnostic.
    pub phase: Phase,
    /// Reason text, starting with one of the fixed reason tags
    /// (`Invalid token`, `Expected ... but found ...`, `Type mismatch ...`).
    pub message: String,
    /// Source location of the offending token, or [`Span::DUMMY`] when none
    /// was available (e.g. unexpected end of input).
    pub span: Span,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            phase,
            message: message.into(),
            span,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            phase,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.phase, self.message)?;
        if !self.span.is_dummy() {
            write!(f, " at line {}, column {}", self.span.line, self.span.column)?;
        }
        Ok(())
    }
}

/// Handler - the shared diagnostics sink.
///
/// The handler is passed by shared reference into every phase; emission goes
/// through interior mutability so the lexer, parser, and analyzer can all
/// hold it at once. The compiler is single-threaded, so a `RefCell` is
/// sufficient.
///
/// # Examples
///
/// ```
/// use minilang_util::{Diagnostic, Handler, Phase, Span};
///
/// let handler = Handler::new();
/// handler.emit(Diagnostic::error(Phase::Lexer, "Invalid token '$'", Span::point(1, 5)));
///
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// All diagnostics recorded so far, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Rendered messages for every diagnostic, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    /// Rendered messages for one phase only.
    pub fn phase_messages(&self, phase: Phase) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.phase == phase)
            .map(|d| d.to_string())
            .collect()
    }

    /// Discard all recorded diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
