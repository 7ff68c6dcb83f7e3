use fabula_lexer::{lex, prepare};
use fabula_parser::{parse, CaseBody, Expr, ForSpecies, LiteralValue, Module, Pattern, Stmt, VarKind};

fn parse_ok(source: &str) -> Module {
    let tokens = prepare(lex(source, "test").expect("lex failed"));
    parse(tokens, "test").expect("parse failed")
}

fn parse_err(source: &str) -> String {
    let tokens = prepare(lex(source, "test").expect("lex failed"));
    parse(tokens, "test").unwrap_err().message
}

#[test]
fn var_decl_without_type() {
    let module = parse_ok("varia x = 1");
    match &module.statements[0] {
        Stmt::VarDecl { name, kind, ty, init, .. } => {
            assert_eq!(name, "x");
            assert_eq!(*kind, VarKind::Mutable);
            assert!(ty.is_none());
            assert!(matches!(init, Some(Expr::Literal { value: LiteralValue::Int(1), .. })));
        }
        other => panic!("expected VarDecl, got {other:?}"),
    }
}

#[test]
fn var_decl_with_leading_type() {
    let module = parse_ok("fixum numerus count = 0");
    match &module.statements[0] {
        Stmt::VarDecl { name, kind, ty, .. } => {
            assert_eq!(name, "count");
            assert_eq!(*kind, VarKind::Const);
            assert!(ty.is_some());
        }
        other => panic!("expected VarDecl, got {other:?}"),
    }
}

#[test]
fn function_decl_with_params_and_return_type() {
    let module = parse_ok(
        r#"
        functio add(numerus a, numerus b) -> numerus {
            reddit a + b
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::FunctionDecl { name, params, ret, body, .. } => {
            assert_eq!(name, "add");
            assert_eq!(params.len(), 2);
            assert!(ret.is_some());
            assert_eq!(body.as_ref().unwrap().len(), 1);
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn extern_abstract_function_has_no_body() {
    let module = parse_ok("@externa functio puta() -> numerus");
    match &module.statements[0] {
        Stmt::FunctionDecl { body, is_extern, .. } => {
            assert!(body.is_none());
            assert!(*is_extern);
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn class_decl_with_fields_and_methods() {
    let module = parse_ok(
        r#"
        genus Point pactum Comparabilis {
            numerus x = 0
            privata numerus y = 0
            functio dist() -> numerus {
                reddit ego.x
            }
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::ClassDecl { name, fields, methods, interfaces, .. } => {
            assert_eq!(name, "Point");
            assert_eq!(fields.len(), 2);
            assert_eq!(methods.len(), 1);
            assert_eq!(interfaces, &vec!["Comparabilis".to_string()]);
        }
        other => panic!("expected ClassDecl, got {other:?}"),
    }
}

#[test]
fn enum_decl_with_explicit_values() {
    let module = parse_ok(
        r#"
        ordo Color {
            Rubrum = 0,
            Viride = 1,
            Caeruleum = 2,
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::EnumDecl { name, members, .. } => {
            assert_eq!(name, "Color");
            assert_eq!(members.len(), 3);
        }
        other => panic!("expected EnumDecl, got {other:?}"),
    }
}

#[test]
fn union_decl_with_variant_fields() {
    let module = parse_ok(
        r#"
        discretio Forma {
            Circulus { numerus radius }
            Quadratum { numerus latus }
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::UnionDecl { name, variants, .. } => {
            assert_eq!(name, "Forma");
            assert_eq!(variants.len(), 2);
            assert_eq!(variants[0].fields.len(), 1);
        }
        other => panic!("expected UnionDecl, got {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    let module = parse_ok(
        r#"
        si a {
            scribe 1
        } sin b {
            scribe 2
        } secus {
            scribe 3
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::If { else_branch, .. } => {
            let elif = else_branch.as_ref().unwrap();
            assert!(matches!(elif.as_ref(), Stmt::If { .. }));
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn if_with_ergo_shorthand_body() {
    let module = parse_ok("si a ergo reddit 1");
    match &module.statements[0] {
        Stmt::If { then_branch, .. } => {
            assert!(matches!(then_branch.as_ref(), Stmt::Return { .. }));
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn for_in_and_de_species() {
    let module = parse_ok("itera x in xs ergo scribe x");
    match &module.statements[0] {
        Stmt::For { species, .. } => assert_eq!(*species, ForSpecies::In),
        other => panic!("expected For, got {other:?}"),
    }

    let module = parse_ok("itera x de xs ergo scribe x");
    match &module.statements[0] {
        Stmt::For { species, .. } => assert_eq!(*species, ForSpecies::De),
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn switch_with_default() {
    let module = parse_ok(
        r#"
        elige n {
            casu 1 {
                scribe "one"
            }
            secus {
                scribe "other"
            }
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::Switch { cases, default, .. } => {
            assert_eq!(cases.len(), 1);
            assert!(default.is_some());
        }
        other => panic!("expected Switch, got {other:?}"),
    }
}

#[test]
fn switch_case_return_shorthand() {
    let module = parse_ok(
        r#"
        elige n {
            casu 1 reddit "one"
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::Switch { cases, .. } => {
            assert!(matches!(cases[0].body, CaseBody::Return { .. }));
        }
        other => panic!("expected Switch, got {other:?}"),
    }
}

#[test]
fn match_with_variant_patterns() {
    let module = parse_ok(
        r#"
        discerne shape {
            casu Circulus pro radius {
                scribe radius
            }
            casu _ {
                scribe "unknown"
            }
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::Match { scrutinees, cases, .. } => {
            assert_eq!(scrutinees.len(), 1);
            assert_eq!(cases.len(), 2);
            match &cases[0].patterns[0] {
                Pattern::Variant { name, bindings, .. } => {
                    assert_eq!(name, "Circulus");
                    assert_eq!(bindings, &vec!["radius".to_string()]);
                }
                other => panic!("expected Variant pattern, got {other:?}"),
            }
            assert!(matches!(cases[1].patterns[0], Pattern::Wildcard { .. }));
        }
        other => panic!("expected Match, got {other:?}"),
    }
}

#[test]
fn guard_clauses() {
    let module = parse_ok(
        r#"
        custodi {
            si a {
                reddit 1
            }
            si b {
                reddit 2
            }
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::Guard { clauses, .. } => assert_eq!(clauses.len(), 2),
        other => panic!("expected Guard, got {other:?}"),
    }
}

#[test]
fn try_catch_finally() {
    let module = parse_ok(
        r#"
        tempta {
            reddit risky()
        } cape err {
            scribe err
        } denique {
            scribe "done"
        }
        "#,
    );
    match &module.statements[0] {
        Stmt::Try { catch, finally, .. } => {
            assert_eq!(catch.as_ref().unwrap().param.as_deref(), Some("err"));
            assert!(finally.is_some());
        }
        other => panic!("expected Try, got {other:?}"),
    }
}

#[test]
fn return_stops_before_closing_brace() {
    let module = parse_ok("functio f() { reddit }");
    match &module.statements[0] {
        Stmt::FunctionDecl { body, .. } => {
            let body = body.as_ref().unwrap();
            assert!(matches!(body[0], Stmt::Return { value: None, .. }));
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn return_stops_before_next_statement_keyword() {
    let module = parse_ok("functio f() { reddit\n scribe 1 }");
    match &module.statements[0] {
        Stmt::FunctionDecl { body, .. } => {
            let body = body.as_ref().unwrap();
            assert!(matches!(body[0], Stmt::Return { value: None, .. }));
            assert!(matches!(body[1], Stmt::Print { .. }));
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn print_severities() {
    let module = parse_ok("scribe 1\nmussat 2\ncavet 3");
    assert!(matches!(module.statements[0], Stmt::Print { .. }));
    assert!(matches!(module.statements[1], Stmt::Print { .. }));
    assert!(matches!(module.statements[2], Stmt::Print { .. }));
}

#[test]
fn assert_with_optional_message() {
    let module = parse_ok(r#"confirma x > 0, "must be positive""#);
    match &module.statements[0] {
        Stmt::Assert { message, .. } => assert!(message.is_some()),
        other => panic!("expected Assert, got {other:?}"),
    }
}

#[test]
fn import_total_star_form() {
    let module = parse_ok(r#"§ importa ex "mod/util" *"#);
    match &module.statements[0] {
        Stmt::Import { path, total, .. } => {
            assert_eq!(path, "mod/util");
            assert!(total);
        }
        other => panic!("expected Import, got {other:?}"),
    }
}

#[test]
fn import_named_list_with_alias() {
    let module = parse_ok(r#"§ importa ex "mod/util" Foo, Bar ut Baz"#);
    match &module.statements[0] {
        Stmt::Import { names, .. } => {
            assert_eq!(names.len(), 2);
            assert_eq!(names[1].alias.as_deref(), Some("Baz"));
        }
        other => panic!("expected Import, got {other:?}"),
    }
}

#[test]
fn import_legacy_form() {
    let module = parse_ok(r#"§ ex "mod/util" importa Foo"#);
    match &module.statements[0] {
        Stmt::Import { path, names, .. } => {
            assert_eq!(path, "mod/util");
            assert_eq!(names.len(), 1);
        }
        other => panic!("expected Import, got {other:?}"),
    }
}

#[test]
fn entry_point_and_test_blocks() {
    let module = parse_ok(
        r#"
        probandum "suite" {
            proba "case" {
                confirma verum
            }
        }
        incipit {
            scribe "hello"
        }
        "#,
    );
    assert!(matches!(module.statements[0], Stmt::TestSuite { .. }));
    assert!(matches!(module.statements[1], Stmt::EntryPoint { is_async: false, .. }));
}

#[test]
fn member_name_may_be_a_keyword() {
    let module = parse_ok("scribe x.casu");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Member { property, .. }, .. } => {
            assert!(!property.is_computed());
        }
        other => panic!("expected Print(Member), got {other:?}"),
    }
}

#[test]
fn non_null_member_and_index_assertions() {
    let module = parse_ok("scribe x!.y\nscribe x![0]");
    assert!(matches!(module.statements[0], Stmt::Print { value: Expr::Member { non_null: true, .. }, .. }));
    assert!(matches!(module.statements[1], Stmt::Print { value: Expr::Member { non_null: true, .. }, .. }));
}

#[test]
fn operator_precedence_additive_vs_multiplicative() {
    let module = parse_ok("scribe 1 + 2 * 3");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Binary { op, right, .. }, .. } => {
            assert_eq!(op, "+");
            assert!(matches!(right.as_ref(), Expr::Binary { op, .. } if op == "*"));
        }
        other => panic!("expected Print(Binary), got {other:?}"),
    }
}

#[test]
fn equal_precedence_is_left_associative() {
    let module = parse_ok("scribe 1 - 2 - 3");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Binary { op, left, .. }, .. } => {
            assert_eq!(op, "-");
            assert!(matches!(left.as_ref(), Expr::Binary { op, .. } if op == "-"));
        }
        other => panic!("expected Print(Binary), got {other:?}"),
    }
}

#[test]
fn word_form_logical_operators() {
    let module = parse_ok("scribe a et b aut c");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Binary { op, .. }, .. } => assert_eq!(op, "aut"),
        other => panic!("expected Print(Binary), got {other:?}"),
    }
}

#[test]
fn ternary_sic_secus() {
    let module = parse_ok("scribe a sic 1 secus 2");
    assert!(matches!(module.statements[0], Stmt::Print { value: Expr::Ternary { .. }, .. }));
}

#[test]
fn range_is_non_inclusive() {
    let module = parse_ok("scribe 1..5");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Range { inclusive, .. }, .. } => assert!(!inclusive),
        other => panic!("expected Print(Range), got {other:?}"),
    }
}

#[test]
fn postfix_type_assert_and_construct_cast() {
    let module = parse_ok("scribe x qua Numerus\nscribe x innatum Numerus\nscribe Point novum");
    assert!(matches!(module.statements[0], Stmt::Print { value: Expr::TypeAssert { .. }, .. }));
    assert!(matches!(module.statements[1], Stmt::Print { value: Expr::TypeAssert { .. }, .. }));
    assert!(matches!(module.statements[2], Stmt::Print { value: Expr::TypeAssert { .. }, .. }));
}

#[test]
fn primitive_conversion_with_fallback() {
    let module = parse_ok(r#"scribe s numeratum vel 0"#);
    match &module.statements[0] {
        Stmt::Print { value: Expr::Convert { fallback, .. }, .. } => assert!(fallback.is_some()),
        other => panic!("expected Print(Convert), got {other:?}"),
    }
}

#[test]
fn unary_minus_vs_binary_minus() {
    let module = parse_ok("scribe -a - b");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Binary { left, .. }, .. } => {
            assert!(matches!(left.as_ref(), Expr::Unary { op, .. } if op == "-"));
        }
        other => panic!("expected Print(Binary), got {other:?}"),
    }
}

#[test]
fn nihil_and_nonnihil_as_null_test_prefixes() {
    let module = parse_ok("scribe nihil x\nscribe nonnihil y");
    match &module.statements[0] {
        Stmt::Print { value: Expr::Unary { op, operand, .. }, .. } => {
            assert_eq!(op, "nihil");
            assert!(matches!(operand.as_ref(), Expr::Identifier { name, .. } if name == "x"));
        }
        other => panic!("expected Print(Unary), got {other:?}"),
    }
    match &module.statements[1] {
        Stmt::Print { value: Expr::Unary { op, operand, .. }, .. } => {
            assert_eq!(op, "nonnihil");
            assert!(matches!(operand.as_ref(), Expr::Identifier { name, .. } if name == "y"));
        }
        other => panic!("expected Print(Unary), got {other:?}"),
    }
}

#[test]
fn bare_nihil_stays_the_null_literal() {
    let module = parse_ok("varia x = nihil vel 5");
    match &module.statements[0] {
        Stmt::VarDecl { init: Some(Expr::Binary { op, left, .. }), .. } => {
            assert_eq!(op, "vel");
            assert!(matches!(left.as_ref(), Expr::Literal { value: LiteralValue::Null, .. }));
        }
        other => panic!("expected VarDecl(Binary(Literal(Null), vel, ..)), got {other:?}"),
    }
}

#[test]
fn await_expression() {
    let module = parse_ok("asynca functio f() { reddit cede work() }");
    match &module.statements[0] {
        Stmt::FunctionDecl { body, is_async, .. } => {
            assert!(is_async);
            match &body.as_ref().unwrap()[0] {
                Stmt::Return { value: Some(Expr::Await { .. }), .. } => {}
                other => panic!("expected Return(Await), got {other:?}"),
            }
        }
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn variant_construct_with_type_hint() {
    let module = parse_ok(r#"scribe finge Circulus { radius: 2 } qua Forma"#);
    match &module.statements[0] {
        Stmt::Print { value: Expr::VariantConstruct { variant, type_hint, .. }, .. } => {
            assert_eq!(variant, "Circulus");
            assert!(type_hint.is_some());
        }
        other => panic!("expected Print(VariantConstruct), got {other:?}"),
    }
}

#[test]
fn template_string_with_args() {
    let module = parse_ok(r#"scribe scriptum("hi § !", name)"#);
    match &module.statements[0] {
        Stmt::Print { value: Expr::Template { args, .. }, .. } => assert_eq!(args.len(), 1),
        other => panic!("expected Print(Template), got {other:?}"),
    }
}

#[test]
fn object_literal_shorthand_and_computed_keys() {
    let module = parse_ok("scribe { x, [key]: 1 }");
    match &module.statements[0] {
        Stmt::Print { value: Expr::ObjectLiteral { properties, .. }, .. } => {
            assert!(properties[0].shorthand);
            assert!(properties[1].key.is_computed());
        }
        other => panic!("expected Print(ObjectLiteral), got {other:?}"),
    }
}

#[test]
fn lambda_expr_and_block_bodies() {
    let module = parse_ok("scribe clausura(x): x + 1\nscribe clausura() { reddit 1 }");
    assert!(matches!(module.statements[0], Stmt::Print { value: Expr::Lambda { .. }, .. }));
    assert!(matches!(module.statements[1], Stmt::Print { value: Expr::Lambda { .. }, .. }));
}

#[test]
fn nullable_and_generic_leading_types() {
    let module = parse_ok("varia Numerus? a\nvaria Tabula<Textus> b");
    assert!(matches!(module.statements[0], Stmt::VarDecl { .. }));
    assert!(matches!(module.statements[1], Stmt::VarDecl { .. }));
}

#[test]
fn function_type_as_return_annotation() {
    let module = parse_ok("functio compose() -> (Numerus, Numerus) -> Numerus { reddit nihil }");
    match &module.statements[0] {
        Stmt::FunctionDecl { ret, .. } => assert!(ret.is_some()),
        other => panic!("expected FunctionDecl, got {other:?}"),
    }
}

#[test]
fn annotation_decorators_set_visibility_and_extern() {
    let module = parse_ok("@privata varia x = 1");
    match &module.statements[0] {
        Stmt::VarDecl { visibility, .. } => {
            assert_eq!(*visibility, fabula_parser::Visibility::Private);
        }
        other => panic!("expected VarDecl, got {other:?}"),
    }
}

#[test]
fn unknown_annotation_is_an_error() {
    let msg = parse_err("@nonexistent varia x = 1");
    assert!(msg.contains("nonexistent"));
}

#[test]
fn malformed_statement_is_a_single_positioned_error() {
    let msg = parse_err("varia = 1");
    assert!(!msg.is_empty());
}
