//! Canonical round-trip emitter: re-serializes a parsed [`Module`] back
//! into Fabula surface syntax.
//!
//! `emit_canonical` is the library entry point used by `fabulac emit -t
//! fab` and by the lowering emitter's tests (which check their input
//! against a known-canonical rendering before lowering it).

pub mod ir;
pub mod printer;
mod walker;

use fabula_parser::Module;
use printer::FormatConfig;

/// Render `module` as canonical Fabula source text.
pub fn emit_canonical(module: &Module) -> String {
    printer::print(&walker::walk_module(module), &FormatConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_lexer::{lex, prepare};
    use fabula_parser::parse;

    fn reparse(src: &str) -> Module {
        let tokens = lex(src, "<test>").expect("lex");
        parse(prepare(tokens), "<test>").expect("parse")
    }

    fn emit_source(src: &str) -> String {
        emit_canonical(&reparse(src))
    }

    #[test]
    fn var_decl_round_trips() {
        let src = "varia numerus x = 1";
        let out = emit_source(src);
        assert_eq!(reparse(&out), reparse(src));
    }

    #[test]
    fn if_else_chain_round_trips() {
        let src = "si x { reddit 1 } sin y { reddit 2 } secus { reddit 3 }";
        let out = emit_source(src);
        assert_eq!(reparse(&out), reparse(src));
    }

    #[test]
    fn binary_precedence_is_parenthesized_on_reemit() {
        let src = "varia numerus x = (1 + 2) * 3";
        let out = emit_source(src);
        assert!(out.contains('('), "compound operands should be parenthesized: {out}");
        assert_eq!(reparse(&out), reparse(src));
    }

    #[test]
    fn whole_number_float_keeps_decimal_point() {
        let src = "varia fractus x = 1.0";
        let out = emit_source(src);
        assert!(out.contains("1.0"), "expected a forced decimal point, got: {out}");
        assert_eq!(reparse(&out), reparse(src));
    }

    #[test]
    fn class_with_private_field_round_trips() {
        let src = "genus Punctum { privata numerus x privata numerus y }";
        let out = emit_source(src);
        assert_eq!(reparse(&out), reparse(src));
    }

    #[test]
    fn emitting_twice_is_idempotent() {
        let src = "genus Punctum { privata numerus x functio sum() -> numerus { reddit ego.x } }";
        let once = emit_source(src);
        let module = reparse(&once);
        let twice = emit_canonical(&module);
        assert_eq!(once, twice);
    }
}
