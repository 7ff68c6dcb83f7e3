//! Two-phase semantic analyzer for the Fabula surface language
//! (spec §4.3).
//!
//! `analyze` walks a parsed [`Module`] and produces a [`SemaContext`]:
//! populated registries for classes/enums/unions/interfaces/type
//! aliases, a global scope, a non-aborting diagnostics list, and a
//! type recorded for every expression node.

mod body;
mod context;
mod declare;
mod resolve;
mod scope;
mod types;

use fabula_parser::Module;

pub use context::{SemaContext, SemaDiagnostic};
pub use resolve::resolve_type;
pub use scope::{Scope, ScopeKind, Symbol, SymbolKind};
pub use types::{ClassShape, SemanticType};

pub fn analyze(module: &Module) -> SemaContext {
    let mut ctx = SemaContext::new();
    declare::collect(module, &mut ctx);
    body::analyze_module(module, &mut ctx);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_lexer::{lex, prepare};

    fn analyze_source(source: &str) -> SemaContext {
        let tokens = prepare(lex(source, "test.fab").unwrap());
        let module = fabula_parser::parse(tokens, "test.fab").unwrap();
        analyze(&module)
    }

    #[test]
    fn typed_var_decl_uses_annotation() {
        let ctx = analyze_source("varia numerus x = 1");
        let symbol = ctx.global.lookup("x").unwrap();
        assert_eq!(symbol.ty, SemanticType::numerus());
    }

    #[test]
    fn untyped_var_decl_infers_from_initializer() {
        let ctx = analyze_source("varia x = \"hi\"");
        let symbol = ctx.global.lookup("x").unwrap();
        assert_eq!(symbol.ty, SemanticType::textus());
    }

    #[test]
    fn undefined_identifier_is_a_diagnostic() {
        let ctx = analyze_source("varia x = foo");
        assert!(ctx.diagnostics.iter().any(|d| d.message.contains("undefined identifier 'foo'")));
    }

    #[test]
    fn class_field_access_resolves() {
        let ctx = analyze_source(
            "genus Persona { textus nomen }\nfunctio saluta(Persona p) { scribe p.nomen }",
        );
        assert!(ctx.classes.contains_key("Persona"));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn discriminated_union_variant_is_a_global_symbol() {
        let ctx = analyze_source("discretio Res { Bene { textus msg } Male { numerus code } }");
        assert!(ctx.global.lookup("Bene").is_some());
        assert!(ctx.global.lookup("Male").is_some());
    }

    #[test]
    fn for_loop_binding_takes_element_type() {
        let ctx = analyze_source("varia xs = [1, 2, 3]\nitera x in xs { scribe x }");
        assert!(!ctx.has_errors());
    }

    #[test]
    fn arithmetic_mixes_to_fractus() {
        let ctx = analyze_source("varia x = 1 + 2.0");
        let symbol = ctx.global.lookup("x").unwrap();
        assert_eq!(symbol.ty, SemanticType::fractus());
    }

    #[test]
    fn string_concat_stays_textus() {
        let ctx = analyze_source("varia x = \"a\" + \"b\"");
        assert_eq!(ctx.global.lookup("x").unwrap().ty, SemanticType::textus());
    }

    #[test]
    fn comparison_yields_bivalens() {
        let ctx = analyze_source("varia x = 1 < 2");
        assert_eq!(ctx.global.lookup("x").unwrap().ty, SemanticType::bivalens());
    }

    #[test]
    fn nihil_and_nonnihil_null_tests_yield_bivalens() {
        let ctx = analyze_source("varia y = 1\nvaria x = nihil y\nvaria z = nonnihil y");
        assert_eq!(ctx.global.lookup("x").unwrap().ty, SemanticType::bivalens());
        assert_eq!(ctx.global.lookup("z").unwrap().ty, SemanticType::bivalens());
    }
}
