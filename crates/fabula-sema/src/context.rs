//! The semantic context: the registries, scope tree, diagnostics list,
//! and per-expression type map that `analyze` produces (spec §4.3,
//! §5 "Resource model").

use rustc_hash::FxHashMap;

use fabula_parser::Expr;

use crate::scope::Scope;
use crate::types::SemanticType;

/// A non-fatal semantic diagnostic. Reuses `fabula_common::Diagnostic`
/// directly rather than a parallel wrapper enum -- its own doc comment
/// already describes this exact role ("each entry in the semantic
/// analyzer's non-aborting diagnostic list").
pub type SemaDiagnostic = fabula_common::Diagnostic;

/// Output of [`crate::analyze`]: the registries built in phase 1, the
/// diagnostics and expression types produced in phase 2.
pub struct SemaContext {
    pub global: Scope,
    pub classes: FxHashMap<String, SemanticType>,
    pub enums: FxHashMap<String, SemanticType>,
    pub unions: FxHashMap<String, SemanticType>,
    pub interfaces: FxHashMap<String, SemanticType>,
    pub type_aliases: FxHashMap<String, SemanticType>,
    pub diagnostics: Vec<SemaDiagnostic>,
    /// Keyed by the `Expr` node's address: the spec's "stable
    /// identifier assigned when the IR is built" is realized here as a
    /// pointer into the caller-owned, never-mutated `Module` tree
    /// (design note §9 permits storing the type on the node itself or
    /// keying by an assigned identity -- the tree is walked exactly
    /// once and never moved during analysis, so the address is stable
    /// for the lifetime of the context).
    types: FxHashMap<usize, SemanticType>,
}

fn expr_key(expr: &Expr) -> usize {
    expr as *const Expr as usize
}

impl SemaContext {
    pub fn new() -> Self {
        SemaContext {
            global: Scope::global(),
            classes: FxHashMap::default(),
            enums: FxHashMap::default(),
            unions: FxHashMap::default(),
            interfaces: FxHashMap::default(),
            type_aliases: FxHashMap::default(),
            diagnostics: Vec::new(),
            types: FxHashMap::default(),
        }
    }

    pub fn record_type(&mut self, expr: &Expr, ty: SemanticType) {
        self.types.insert(expr_key(expr), ty);
    }

    pub fn type_of(&self, expr: &Expr) -> Option<&SemanticType> {
        self.types.get(&expr_key(expr))
    }

    pub fn error(&mut self, locus: fabula_common::Locus, message: impl Into<String>) {
        self.diagnostics.push(SemaDiagnostic::error(locus, message));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == fabula_common::Severity::Error)
    }
}

impl Default for SemaContext {
    fn default() -> Self {
        Self::new()
    }
}
