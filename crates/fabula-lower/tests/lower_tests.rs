use fabula_fmt::emit_canonical;
use fabula_lexer::{lex, prepare};
use fabula_lower::emit_lowered;
use fabula_parser::{parse, Module};

fn parse_ok(source: &str) -> Module {
    let tokens = prepare(lex(source, "test").expect("lex failed"));
    parse(tokens, "test").expect("parse failed")
}

/// Checks the source is already canonical before lowering it -- a
/// sanity check that the fixture itself parses and reprints cleanly,
/// so a failure in the assertions below is about lowering, not about a
/// malformed fixture.
fn lower(source: &str) -> String {
    let module = parse_ok(source);
    let canonical = emit_canonical(&module);
    assert_eq!(parse_ok(&canonical), module, "fixture is not canonical:\n{canonical}");
    let ctx = fabula_sema::analyze(&module);
    emit_lowered(&module, &ctx)
}

#[test]
fn class_with_private_field_and_method_lowers() {
    let out = lower(
        r#"
        genus Punctum {
            privata numerus x
            privata numerus y

            functio magnitudo() -> numerus {
                reddit ego.x
            }
        }
        "#,
    );
    assert!(out.contains("@dataclass"));
    assert!(out.contains("class Punctum:"));
    assert!(out.contains("x: int"));
    assert!(out.contains("def magnitudo(self) -> int:"));
    assert!(out.contains("return self.x"));
}

#[test]
fn if_elif_else_chain_lowers() {
    let out = lower(
        r#"
        functio signum(numerus n) -> numerus {
            si n > 0 {
                reddit 1
            } sin n < 0 {
                reddit -1
            } secus {
                reddit 0
            }
        }
        "#,
    );
    assert!(out.contains("if n > 0:"));
    assert!(out.contains("elif n < 0:"));
    assert!(out.contains("else:"));
}

#[test]
fn for_loop_with_range_lowers_to_python_range() {
    let out = lower("incipit {\n\titera i in 0..10 {\n\t\tscribe i\n\t}\n}");
    assert!(out.contains("for i in range(0, 10):"));
    assert!(out.contains("print(i)"));
}

#[test]
fn guard_clauses_lower_to_sequential_ifs() {
    let out = lower(
        r#"
        functio clasifica(numerus n) -> numerus {
            custodi {
                si n > 0 {
                    reddit 1
                }
                si n < 0 {
                    reddit -1
                }
            }
            reddit 0
        }
        "#,
    );
    assert!(out.contains("if n > 0:"));
    assert!(out.contains("if n < 0:"));
    assert!(out.contains("return 0"));
}

#[test]
fn try_catch_finally_lowers() {
    let out = lower(
        r#"
        incipit {
            tempta {
                scribe "a"
            } cape err {
                scribe "b"
            } denique {
                scribe "c"
            }
        }
        "#,
    );
    assert!(out.contains("try:"));
    assert!(out.contains("except Exception as err:"));
    assert!(out.contains("finally:"));
}

#[test]
fn do_while_lowers_to_infinite_loop_with_trailing_break() {
    let out = lower("incipit {\n\tvaria numerus n = 0\n\tfac {\n\t\tn += 1\n\t} dum n < 3\n}");
    assert!(out.contains("while True:"));
    assert!(out.contains("if not (n < 3):"));
    assert!(out.contains("break"));
}

#[test]
fn optional_param_gets_nullable_type_hint_and_default() {
    let out = lower("functio saluta(textus? nomen) -> vacuum {\n\ttacet\n}");
    assert!(out.contains("nomen: str | None = None"));
}

#[test]
fn generic_list_type_lowers_to_python_list() {
    let out = lower("varia Copia<numerus> xs = []");
    assert!(out.contains("xs: list[int] = []"));
}

#[test]
fn switch_with_default_lowers_to_match_wildcard() {
    let out = lower(
        r#"
        functio clasifica(numerus n) -> numerus {
            elige n {
                casu 1 { reddit 100 }
                secus { reddit -1 }
            }
        }
        "#,
    );
    assert!(out.contains("match n:"));
    assert!(out.contains("case 1:"));
    assert!(out.contains("case _:"));
}

#[test]
fn nihil_and_nonnihil_lower_to_none_predicates() {
    let out = lower("functio f(textus? nomen) -> vacuum {\n\tsi nihil nomen ergo reddit\n\tsi nonnihil nomen ergo reddit\n}");
    assert!(out.contains("if nomen is None:"));
    assert!(out.contains("if nomen is not None:"));
}
