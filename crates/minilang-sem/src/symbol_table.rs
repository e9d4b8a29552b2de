//! Scoped symbol tables.
//!
//! Scopes form a tree with upward parent links. Tables are arena-allocated
//! in an `IndexVec` and refer to their parent by [`TableId`], which keeps
//! lifetimes trivial; the live-scope stack is a plain `Vec<TableId>` whose
//! top is the innermost scope.
//!
//! Invariants:
//! - names are unique within one table ([`SymbolTable::add`] rejects
//!   duplicates),
//! - a table pushed onto a non-empty stack is parented to the previous top,
//! - inner scopes shadow outer ones on lookup.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use minilang_par::Ty;
use minilang_util::{define_idx, IndexVec, Symbol};

define_idx!(
    /// Index of a [`SymbolTable`] in the scope arena.
    TableId
);

/// A parameter signature: declared type and name, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamSig {
    pub ty: Ty,
    pub name: Symbol,
}

/// What a name is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Variable,
    Parameter,
    /// A function, carrying its parameter signatures.
    Function { params: Vec<ParamSig> },
}

impl BindingKind {
    pub fn is_function(&self) -> bool {
        matches!(self, BindingKind::Function { .. })
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Variable => write!(f, "variable"),
            BindingKind::Parameter => write!(f, "parameter"),
            BindingKind::Function { .. } => write!(f, "function"),
        }
    }
}

/// A binding of a name to its declared type and kind. For functions, `ty`
/// is the return type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub name: Symbol,
    pub ty: Ty,
    pub kind: BindingKind,
}

/// Error returned when a name is declared twice in the same scope.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Redeclaration of {name} in scope {scope}")]
pub struct Redeclaration {
    pub name: String,
    pub scope: String,
}

/// One lexical scope: a unique name-to-binding map plus a parent link.
#[derive(Debug)]
pub struct SymbolTable {
    /// Human-readable scope name (`global`, `function main`, `block`).
    pub scope_name: String,
    /// Parent scope in the arena, `None` for the global scope.
    pub parent: Option<TableId>,
    entries: IndexMap<Symbol, Binding>,
}

impl SymbolTable {
    fn new(scope_name: String, parent: Option<TableId>) -> Self {
        Self {
            scope_name,
            parent,
            entries: IndexMap::new(),
        }
    }

    /// Insert a binding. Fails if the name already exists in this table.
    pub fn add(&mut self, binding: Binding) -> Result<(), Redeclaration> {
        if self.entries.contains_key(&binding.name) {
            return Err(Redeclaration {
                name: binding.name.as_str().to_string(),
                scope: self.scope_name.clone(),
            });
        }
        self.entries.insert(binding.name, binding);
        Ok(())
    }

    /// Look up a name in this table only, without following parent links.
    pub fn get_local(&self, name: Symbol) -> Option<&Binding> {
        self.entries.get(&name)
    }

    /// Bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.entries.values()
    }

    /// Number of bindings in this table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The scope arena plus the stack of live scopes.
///
/// The stack is non-empty for the whole of semantic analysis: the analyzer
/// pushes the global scope first and pops it last, and pairs every interior
/// push with a pop on every exit path.
#[derive(Default)]
pub struct SymbolTableStack {
    tables: IndexVec<TableId, SymbolTable>,
    stack: Vec<TableId>,
}

impl SymbolTableStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new table parented to the current top and push it.
    pub fn push_scope(&mut self, scope_name: impl Into<String>) -> TableId {
        let parent = self.stack.last().copied();
        let id = self
            .tables
            .push(SymbolTable::new(scope_name.into(), parent));
        self.stack.push(id);
        id
    }

    /// Pop the innermost scope. The table itself stays in the arena so it
    /// can still be inspected after analysis.
    pub fn pop_scope(&mut self) -> Option<TableId> {
        self.stack.pop()
    }

    /// Id of the innermost live scope.
    pub fn current(&self) -> Option<TableId> {
        self.stack.last().copied()
    }

    /// Number of live scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Access a table by id.
    pub fn table(&self, id: TableId) -> &SymbolTable {
        &self.tables[id]
    }

    /// All tables ever allocated, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolTable> {
        self.tables.iter()
    }

    /// Insert a binding into the innermost scope.
    ///
    /// The stack is non-empty during analysis; calling this on an empty
    /// stack is a bug in the caller.
    pub fn add(&mut self, binding: Binding) -> Result<(), Redeclaration> {
        let top = self.stack[self.stack.len() - 1];
        self.tables[top].add(binding)
    }

    /// Look up a name from the innermost scope outwards.
    ///
    /// Equivalent to [`SymbolTableStack::lookup_in`] on the top table when
    /// parent links are maintained correctly; iterating the stack keeps the
    /// two paths mutually checkable.
    pub fn lookup(&self, name: Symbol) -> Option<&Binding> {
        for &id in self.stack.iter().rev() {
            if let Some(binding) = self.tables[id].get_local(name) {
                return Some(binding);
            }
        }
        None
    }

    /// Look up a name starting at `table` and walking the parent chain to
    /// the root.
    pub fn lookup_in(&self, table: TableId, name: Symbol) -> Option<&Binding> {
        let mut current = Some(table);
        while let Some(id) = current {
            let table = &self.tables[id];
            if let Some(binding) = table.get_local(name) {
                return Some(binding);
            }
            current = table.parent;
        }
        None
    }
}

impl fmt::Display for SymbolTableStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in self.tables.iter() {
            writeln!(f, "Scope: {}", table.scope_name)?;
            for binding in table.bindings() {
                writeln!(f, "  {}: {} {}", binding.name, binding.ty, binding.kind)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: Ty) -> Binding {
        Binding {
            name: Symbol::intern(name),
            ty,
            kind: BindingKind::Variable,
        }
    }

    #[test]
    fn test_add_and_local_lookup() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("x", Ty::Int)).expect("first add");

        let binding = tables.lookup(Symbol::intern("x")).expect("found");
        assert_eq!(binding.ty, Ty::Int);
        assert_eq!(binding.kind, BindingKind::Variable);
    }

    #[test]
    fn test_redeclaration_rejected() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("x", Ty::Int)).expect("first add");

        let err = tables.add(var("x", Ty::Float)).expect_err("duplicate");
        assert_eq!(err.to_string(), "Redeclaration of x in scope global");
    }

    #[test]
    fn test_parent_is_previous_top() {
        let mut tables = SymbolTableStack::new();
        let global = tables.push_scope("global");
        let func = tables.push_scope("function main");
        let block = tables.push_scope("block");

        assert_eq!(tables.table(func).parent, Some(global));
        assert_eq!(tables.table(block).parent, Some(func));
        assert_eq!(tables.table(global).parent, None);
    }

    #[test]
    fn test_lookup_walks_outwards() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("outer", Ty::Float)).expect("add");
        tables.push_scope("block");

        let binding = tables.lookup(Symbol::intern("outer")).expect("found");
        assert_eq!(binding.ty, Ty::Float);
        assert!(tables.lookup(Symbol::intern("missing")).is_none());
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("x", Ty::Int)).expect("add outer");
        tables.push_scope("block");
        tables.add(var("x", Ty::Bool)).expect("shadowing add");

        assert_eq!(tables.lookup(Symbol::intern("x")).map(|b| b.ty), Some(Ty::Bool));

        tables.pop_scope();
        assert_eq!(tables.lookup(Symbol::intern("x")).map(|b| b.ty), Some(Ty::Int));
    }

    #[test]
    fn test_stack_and_parent_chain_lookup_agree() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("a", Ty::Int)).expect("add");
        tables.push_scope("function f");
        tables.add(var("b", Ty::Float)).expect("add");
        let top = tables.current().expect("top");

        for name in ["a", "b"] {
            let sym = Symbol::intern(name);
            assert_eq!(
                tables.lookup(sym).map(|b| b.ty),
                tables.lookup_in(top, sym).map(|b| b.ty),
            );
        }
    }

    #[test]
    fn test_pop_keeps_table_in_arena() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        let block = tables.push_scope("block");
        tables.add(var("x", Ty::Int)).expect("add");
        tables.pop_scope();

        assert_eq!(tables.depth(), 1);
        assert_eq!(tables.table(block).len(), 1);
    }

    #[test]
    fn test_display_renders_scopes() {
        let mut tables = SymbolTableStack::new();
        tables.push_scope("global");
        tables.add(var("x", Ty::Int)).expect("add");

        let rendered = tables.to_string();
        assert!(rendered.contains("Scope: global"));
        assert!(rendered.contains("x: int variable"));
    }
}
