use fabula_fmt::emit_canonical;
use fabula_lexer::{lex, prepare};
use fabula_parser::{parse, Module};

fn parse_ok(source: &str) -> Module {
    let tokens = prepare(lex(source, "test").expect("lex failed"));
    parse(tokens, "test").expect("parse failed")
}

fn round_trips(source: &str) {
    let module = parse_ok(source);
    let rendered = emit_canonical(&module);
    let reparsed = parse_ok(&rendered);
    assert_eq!(module, reparsed, "round-trip mismatch for {source:?}, rendered as:\n{rendered}");
}

#[test]
fn entry_point_with_calls_round_trips() {
    round_trips(
        r#"
        incipit {
            scribe "hello"
            reddit
        }
        "#,
    );
}

#[test]
fn function_with_generics_and_params_round_trips() {
    round_trips(
        "functio identitas<T>(T valor) -> T {\n\treddit valor\n}",
    );
}

#[test]
fn match_with_variant_bindings_round_trips() {
    round_trips(
        r#"
        discretio Forma {
            Circulus { numerus radius }
            Rectangulum { numerus latus numerus altum }
        }

        functio area(Forma f) -> numerus {
            discerne f {
                casu Circulus pro radius {
                    reddit radius
                }
                casu Rectangulum ut r {
                    reddit 0
                }
            }
        }
        "#,
    );
}

#[test]
fn class_with_interfaces_and_methods_round_trips() {
    round_trips(
        r#"
        pactum Forma {
            functio area() -> numerus
        }

        genus Punctum pactum Forma {
            privata numerus x
            protecta numerus y

            functio area() -> numerus {
                reddit ego.x
            }
        }
        "#,
    );
}

#[test]
fn keyword_named_field_round_trips() {
    // `de` is a keyword (the `itera x de xs` form) but names accept
    // any identifier-or-keyword token, so it's also a legal field name.
    round_trips("genus Registrum { numerus de }");
}

#[test]
fn try_catch_finally_round_trips() {
    round_trips(
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
}

#[test]
fn nested_if_else_chain_round_trips() {
    round_trips(
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
}

#[test]
fn switch_with_default_round_trips() {
    round_trips(
        r#"
        functio clasifica(numerus n) -> numerus {
            elige n {
                casu 1 { reddit 100 }
                secus { reddit -1 }
            }
        }
        "#,
    );
}

#[test]
fn guard_clauses_round_trip() {
    round_trips(
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
}

#[test]
fn for_loop_and_range_round_trip() {
    round_trips("incipit {\n\titera i in 0..10 {\n\t\tscribe i\n\t}\n}");
}

#[test]
fn string_with_escapes_round_trips() {
    round_trips(r#"varia textus s = "line\nbreak \"quoted\"""#);
}

#[test]
fn conversion_with_fallback_round_trips() {
    round_trips(r#"varia numerus n = "abc" numeratum vel 0"#);
}

#[test]
fn private_and_extern_decorators_round_trip() {
    round_trips("@privata varia numerus x = 1\n\n@externa functio sistema() -> numerus");
}

#[test]
fn enum_decl_round_trips() {
    round_trips("ordo Color { Rubrum, Viridis = 5, Caeruleus }");
}

#[test]
fn type_alias_round_trips() {
    round_trips("idem Id = numerus");
}

#[test]
fn import_round_trips() {
    round_trips(r#"§ importa ex "forma" Circulus ut Rotundum, Quadratum"#);
}

#[test]
fn total_import_round_trips() {
    round_trips(r#"§ importa ex "forma" * ut formae"#);
}

#[test]
fn lambda_expr_and_block_forms_round_trip() {
    round_trips(
        r#"
        incipit {
            varia f = clausura(numerus x): x
            varia g = clausura(numerus x) {
                reddit x
            }
        }
        "#,
    );
}

#[test]
fn type_assert_round_trips() {
    round_trips(
        r#"
        functio identitas(numerus x) -> numerus {
            varia numerus y = x qua numerus
            reddit y
        }
        "#,
    );
}

#[test]
fn construct_cast_round_trips() {
    round_trips("functio foo(numerus x) -> numerus {\n\treddit x novum\n}");
}

#[test]
fn new_with_init_block_round_trips() {
    round_trips(
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
}

#[test]
fn nullable_and_union_types_round_trip() {
    round_trips("functio examina(numerus? x) -> numerus | textus {\n\treddit 1\n}");
}

#[test]
fn nihil_and_nonnihil_prefixes_round_trip() {
    round_trips("functio examina(numerus? x) -> bivalens {\n\treddit nihil x\n}");
    round_trips("functio examina(numerus? x) -> bivalens {\n\treddit nonnihil x\n}");
}

#[test]
fn nihil_prefix_keeps_a_space_before_its_operand() {
    let module = parse_ok("functio examina(numerus? x) -> bivalens {\n\treddit nihil x\n}");
    let rendered = emit_canonical(&module);
    assert!(rendered.contains("nihil x"), "expected a space between nihil and its operand:\n{rendered}");
}
