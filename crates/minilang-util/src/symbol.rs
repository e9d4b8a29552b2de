//! Symbol - string interning for identifiers.
//!
//! A [`Symbol`] is a compact 4-byte handle into a global string table.
//! Identifier and function names appear many times across the AST, the
//! symbol tables, and the generated TAC; interning makes comparing and
//! copying them O(1) and keeps AST nodes `Copy`-friendly.
//!
//! Interned strings are leaked to get a `'static` lifetime. The table only
//! grows, which is acceptable for a batch compiler: total unique strings are
//! bounded by the source text.

use std::fmt;
use std::sync::{OnceLock, RwLock};

use rustc_hash::FxHashMap;

/// An interned string identifier.
///
/// # Examples
///
/// ```
/// use minilang_util::Symbol;
///
/// let a = Symbol::intern("main");
/// let b = Symbol::intern("main");
/// let c = Symbol::intern("foo");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.as_str(), "main");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

struct Interner {
    names: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Interner {
    fn new() -> Self {
        Self {
            names: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    fn intern(&mut self, string: &str) -> u32 {
        if let Some(&index) = self.names.get(string) {
            return index;
        }
        let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = self.strings.len() as u32;
        self.strings.push(interned);
        self.names.insert(interned, index);
        index
    }
}

static STRING_TABLE: OnceLock<RwLock<Interner>> = OnceLock::new();

fn table() -> &'static RwLock<Interner> {
    STRING_TABLE.get_or_init(|| RwLock::new(Interner::new()))
}

impl Symbol {
    /// Intern a string, returning its symbol.
    ///
    /// Interning the same string twice returns the same symbol.
    pub fn intern(string: &str) -> Symbol {
        // Fast path: already interned.
        {
            let guard = table().read().unwrap_or_else(|e| e.into_inner());
            if let Some(&index) = guard.names.get(string) {
                return Symbol { index };
            }
        }
        let mut guard = table().write().unwrap_or_else(|e| e.into_inner());
        Symbol {
            index: guard.intern(string),
        }
    }

    /// The string this symbol was interned from.
    pub fn as_str(self) -> &'static str {
        let guard = table().read().unwrap_or_else(|e| e.into_inner());
        guard.strings[self.index as usize]
    }

    /// Raw table index, for debugging.
    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
