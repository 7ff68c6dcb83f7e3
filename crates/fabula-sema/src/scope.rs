//! Symbols and scopes (spec §4.3, design note §9 "Symbol tables as
//! owned scope trees").
//!
//! The teacher's `snow_typeck::env::TypeEnv` is a flat `Vec` of
//! `FxHashMap`s pushed/popped as a stack. The spec's data model calls
//! for scope-kind tagging (Global/Function/Block/Class) and a parent
//! *pointer* per scope rather than an implicit stack position, so each
//! `Scope` here owns its table and holds an `Rc` to its parent -- the
//! stack becomes a chain of owned nodes instead of array positions, but
//! lookup still walks outward exactly like `TypeEnv::lookup`.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use fabula_common::Locus;

use crate::types::SemanticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
    Type,
    Class,
    Enum,
    DiscriminatedUnion,
    Interface,
    Variant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: SemanticType,
    pub mutable: bool,
    pub locus: Locus,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: SemanticType, mutable: bool, locus: Locus) -> Self {
        Symbol { name: name.into(), kind, ty, mutable, locus }
    }
}

struct ScopeData {
    kind: ScopeKind,
    parent: Option<Scope>,
    symbols: FxHashMap<String, Rc<Symbol>>,
}

/// A lexical scope. Cheap to clone (an `Rc` bump) since every walker
/// that descends into a nested scope needs to hold onto both the child
/// and, through `parent`, every ancestor.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<ScopeData>>);

impl Scope {
    /// The outermost scope of a semantic context. Has no parent.
    pub fn global() -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            kind: ScopeKind::Global,
            parent: None,
            symbols: FxHashMap::default(),
        })))
    }

    /// Open a new scope nested under `self`.
    pub fn child(&self, kind: ScopeKind) -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            kind,
            parent: Some(self.clone()),
            symbols: FxHashMap::default(),
        })))
    }

    pub fn kind(&self) -> ScopeKind {
        self.0.borrow().kind
    }

    pub fn parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    /// Bind `symbol` in this scope's own table, shadowing any binding
    /// of the same name in an enclosing scope.
    pub fn define(&self, symbol: Symbol) {
        self.0.borrow_mut().symbols.insert(symbol.name.clone(), Rc::new(symbol));
    }

    /// Look up `name`, searching this scope and then each ancestor in
    /// turn.
    pub fn lookup(&self, name: &str) -> Option<Rc<Symbol>> {
        if let Some(symbol) = self.0.borrow().symbols.get(name) {
            return Some(symbol.clone());
        }
        self.parent().and_then(|p| p.lookup(name))
    }

    /// Look up `name` in this scope's own table only, ignoring
    /// ancestors -- used to detect re-declaration within one scope.
    pub fn lookup_local(&self, name: &str) -> Option<Rc<Symbol>> {
        self.0.borrow().symbols.get(name).cloned()
    }

    /// Walk up to and return the nearest enclosing scope of `kind`, if
    /// any -- used to find the enclosing class scope from within a
    /// method body, for instance.
    pub fn enclosing(&self, kind: ScopeKind) -> Option<Scope> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        self.parent().and_then(|p| p.enclosing(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_common::Locus;

    fn sym(name: &str, ty: SemanticType) -> Symbol {
        Symbol::new(name, SymbolKind::Variable, ty, true, Locus::start())
    }

    #[test]
    fn lookup_in_current_scope() {
        let global = Scope::global();
        global.define(sym("x", SemanticType::numerus()));
        assert!(global.lookup("x").is_some());
        assert!(global.lookup("y").is_none());
    }

    #[test]
    fn lookup_in_outer_scope() {
        let global = Scope::global();
        global.define(sym("x", SemanticType::numerus()));
        let inner = global.child(ScopeKind::Block);
        assert!(inner.lookup("x").is_some());
    }

    #[test]
    fn shadowing() {
        let global = Scope::global();
        global.define(sym("x", SemanticType::numerus()));
        let inner = global.child(ScopeKind::Block);
        inner.define(sym("x", SemanticType::textus()));

        assert_eq!(inner.lookup("x").unwrap().ty, SemanticType::textus());
        assert_eq!(global.lookup("x").unwrap().ty, SemanticType::numerus());
    }

    #[test]
    fn scope_cleanup_is_automatic() {
        let global = Scope::global();
        let inner = global.child(ScopeKind::Block);
        inner.define(sym("y", SemanticType::bivalens()));
        assert!(inner.lookup("y").is_some());
        // Dropping `inner` drops its table; `global` never saw `y`.
        drop(inner);
        assert!(global.lookup("y").is_none());
    }

    #[test]
    fn enclosing_finds_nearest_class_scope() {
        let global = Scope::global();
        let class_scope = global.child(ScopeKind::Class);
        let method_scope = class_scope.child(ScopeKind::Function);
        let block_scope = method_scope.child(ScopeKind::Block);
        assert!(block_scope.enclosing(ScopeKind::Class).is_some());
        assert!(block_scope.enclosing(ScopeKind::Global).is_some());
    }
}
