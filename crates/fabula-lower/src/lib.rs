//! Lowering emitter: translates a parsed, analyzed [`Module`] into
//! Python source text (spec §4.5).
//!
//! Reuses the canonical emitter's document algebra (`fabula_fmt::ir`,
//! `fabula_fmt::printer`) for the same reason `fabula-fmt` itself does:
//! the printer's flat-vs-broken decision is target-agnostic. Only the
//! walk in [`walker`] differs -- it renders Python syntax instead of
//! Fabula's own.

mod builtins;
mod requirements;
mod walker;

use fabula_fmt::printer::{print, FormatConfig};
use fabula_parser::Module;
use fabula_sema::SemaContext;

/// Python favors four-space indentation (PEP 8); the canonical
/// emitter's tab-per-level default is specific to its own contract.
fn python_config() -> FormatConfig {
    FormatConfig { indent_unit: "    ".to_string(), max_width: 88 }
}

/// Render `module` as lowered Python source text, consulting `ctx` (the
/// output of `fabula_sema::analyze(module)`) to tell a genuine
/// user-defined method override apart from a recognized domain name it
/// would otherwise shadow (spec §4.5 points 5-6).
pub fn emit_lowered(module: &Module, ctx: &SemaContext) -> String {
    print(&walker::lower_module(module, ctx), &python_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_lexer::{lex, prepare};
    use fabula_parser::parse;

    fn lower_source(src: &str) -> String {
        let tokens = lex(src, "<test>").expect("lex");
        let module = parse(prepare(tokens), "<test>").expect("parse");
        let ctx = fabula_sema::analyze(&module);
        emit_lowered(&module, &ctx)
    }

    #[test]
    fn minimal_entry_point_lowers() {
        let out = lower_source("incipit {\n\tscribe \"hello\"\n}");
        assert!(out.contains("if __name__ == \"__main__\":"));
        assert!(out.contains("print(\"hello\")"));
    }

    #[test]
    fn discriminated_union_lowers_to_dataclass_variants() {
        let out = lower_source(
            "discretio Forma {\n\tCirculus { numerus radius }\n\tRectangulum { numerus latus numerus altum }\n}",
        );
        assert!(out.contains("@dataclass"));
        assert!(out.contains("class Circulus:"));
        assert!(out.contains("class Rectangulum:"));
        assert!(out.contains("Forma = Circulus | Rectangulum"));
    }

    #[test]
    fn match_lowers_to_case_patterns() {
        let out = lower_source(
            r#"
            discretio Forma {
                Circulus { numerus radius }
            }

            functio area(Forma f) -> numerus {
                discerne f {
                    casu Circulus pro radius {
                        reddit radius
                    }
                }
            }
            "#,
        );
        assert!(out.contains("match f:"));
        assert!(out.contains("case Circulus(radius):"));
    }

    #[test]
    fn builtin_append_rewrites_to_method_call() {
        let out = lower_source(
            "incipit {\n\tvaria Copia<numerus> xs = []\n\txs.appende(1)\n}",
        );
        assert!(out.contains("xs.append(1)"));
    }

    #[test]
    fn user_method_named_like_builtin_is_not_rewritten() {
        let out = lower_source(
            r#"
            genus Lista {
                functio appende(numerus x) -> vacuum {
                    tacet
                }
            }

            incipit {
                varia Lista l = novum Lista()
                l.appende(1)
            }
            "#,
        );
        assert!(out.contains("l.appende(1)"), "user-defined method should keep its own name:\n{out}");
    }

    #[test]
    fn null_coalesce_lowers_to_ternary_fallback() {
        let out = lower_source("varia numerus x = nihil vel 5");
        assert!(out.contains("if"));
        assert!(out.contains("is not None else"));
    }

    #[test]
    fn keyword_named_field_is_escaped() {
        // `in` is a legal Fabula field name (any identifier-or-keyword
        // token qualifies) but collides with Python's own `in`.
        let out = lower_source("genus Registrum { numerus in }");
        assert!(out.contains("in_"), "field named after a Python keyword should be escaped:\n{out}");
    }

    #[test]
    fn class_with_interface_lowers_to_protocol_and_dataclass() {
        let out = lower_source(
            r#"
            pactum Forma {
                functio area() -> numerus
            }

            genus Punctum pactum Forma {
                privata numerus x

                functio area() -> numerus {
                    reddit ego.x
                }
            }
            "#,
        );
        assert!(out.contains("class Forma(Protocol):"));
        assert!(out.contains("class Punctum(Forma):"));
        assert!(out.contains("def area(self) -> int:"));
    }

    #[test]
    fn enum_decl_lowers_with_mixed_values() {
        let out = lower_source("ordo Color { Rubrum, Viridis = 5, Caeruleus }");
        assert!(out.contains("from enum import Enum, auto"));
        assert!(out.contains("class Color(Enum):"));
        assert!(out.contains("Rubrum = auto()"));
        assert!(out.contains("Viridis = 5"));
    }

    #[test]
    fn entry_point_async_emits_asyncio_runner() {
        let out = lower_source("incipiet {\n\tscribe \"hi\"\n}");
        assert!(out.contains("import asyncio"));
        assert!(out.contains("async def main():"));
        assert!(out.contains("asyncio.run(main())"));
    }

    #[test]
    fn test_suite_lowers_to_unittest_case() {
        let out = lower_source(
            r#"
            probandum "arithmetic" {
                proba "adds" {
                    confirma 1 + 1 == 2
                }
            }
            "#,
        );
        assert!(out.contains("import unittest"));
        assert!(out.contains("unittest.TestCase"));
        assert!(out.contains("def test_adds(self):"));
    }

    #[test]
    fn template_lowers_to_format_call() {
        let out = lower_source(r#"varia textus s = scriptum("valor: §", 1)"#);
        assert!(out.contains(".format(1)"));
    }

    #[test]
    fn constructor_with_init_block_lowers_to_keyword_args() {
        let out = lower_source(
            r#"
            genus Punctum {
                numerus x
                numerus y
            }

            incipit {
                varia Punctum p = novum Punctum() { x: 1, y: 2 }
            }
            "#,
        );
        assert!(out.contains("Punctum(x=1, y=2)"));
    }

    #[test]
    fn convert_with_fallback_emits_helper_and_call() {
        let out = lower_source(r#"varia numerus n = "abc" numeratum vel 0"#);
        assert!(out.contains("def _fallback_numerus(value, fallback):"));
        assert!(out.contains("_fallback_numerus(\"abc\", 0)"));
    }

    #[test]
    fn import_path_lowers_to_dotted_module() {
        let out = lower_source(r#"§ importa ex "forma/circulus" Circulus"#);
        assert!(out.contains("from forma.circulus import Circulus"));
    }
}
