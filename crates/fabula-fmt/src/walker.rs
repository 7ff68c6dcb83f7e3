//! Typed-IR walker producing canonical surface-language [`FormatIR`]
//! (spec §4.4).
//!
//! Grounded on the teacher's `snow_fmt::walker`, but traversing
//! `fabula_parser::{Module, Stmt, Expr, Type}` directly instead of a
//! rowan `SyntaxNode` -- there is no CST here (see `SPEC_FULL.md`
//! "Why no rowan/CST"). Parentheses are inserted around every compound
//! sub-expression (`Binary`/`Unary`/`Ternary`/`Assign`/`Range`) wherever
//! it is embedded inside another expression, rather than computed from
//! minimal-precedence analysis -- the contract only requires that
//! re-parsing the canonical text reproduce the same tree, not that the
//! parenthesization be minimal.

use fabula_parser::{
    CaseBody, Expr, FieldDecl, ForSpecies, GuardClause, ImportName, InterfaceMethod, LambdaBody,
    LiteralValue, MatchCase, Module, ObjectProperty, Param, Pattern, PrimitiveTarget,
    PropertyKey, PrintSeverity, Stmt, SwitchCase, Type, TypeAssertKind, VarKind, VariantDecl,
    Visibility,
};

use crate::ir::{concat, hardline, indent, join, text, FormatIR};

pub fn walk_module(module: &Module) -> FormatIR {
    join(concat(vec![hardline(), hardline()]), module.statements.iter().map(fmt_stmt).collect())
}

// ── Statements ───────────────────────────────────────────────────────

fn decorator_lines(visibility: Visibility, is_extern: bool) -> FormatIR {
    let mut parts = Vec::new();
    if visibility == Visibility::Private {
        parts.push(text("@privata"));
        parts.push(hardline());
    }
    if is_extern {
        parts.push(text("@externa"));
        parts.push(hardline());
    }
    concat(parts)
}

fn fmt_block_braces(statements: &[Stmt]) -> FormatIR {
    if statements.is_empty() {
        return text("{}");
    }
    let body = join(hardline(), statements.iter().map(fmt_stmt).collect());
    concat(vec![text("{"), indent(concat(vec![hardline(), body])), hardline(), text("}")])
}

/// A control-flow body: a brace block as-is, or (for any other
/// statement shape) the statement printed bare -- `ergo` is optional
/// sugar the parser consumes either way, so the shorter bare form is
/// canonical here.
fn fmt_body(stmt: &Stmt) -> FormatIR {
    match stmt {
        Stmt::Block { statements, .. } => fmt_block_braces(statements),
        other => fmt_stmt(other),
    }
}

fn fmt_case_body(body: &CaseBody) -> FormatIR {
    match body {
        CaseBody::Block { statements } => fmt_block_braces(statements),
        CaseBody::Return { expr } => concat(vec![text("reddit "), fmt_expr(expr)]),
    }
}

fn kind_keyword(kind: VarKind) -> &'static str {
    match kind {
        VarKind::Mutable => "varia",
        VarKind::Const => "fixum",
        VarKind::Frozen => "figendum",
        VarKind::Rebindable => "variandum",
    }
}

fn fmt_field(field: &FieldDecl) -> FormatIR {
    let vis = match field.visibility {
        Visibility::Private => "privata ",
        Visibility::Protected => "protecta ",
        Visibility::Public => "",
    };
    let mut parts = vec![text(vis), fmt_type(&field.ty), text(" "), text(field.name.clone())];
    if let Some(default) = &field.default {
        parts.push(text(" = "));
        parts.push(wrap(default));
    }
    concat(parts)
}

fn fmt_generics(generics: &[String]) -> FormatIR {
    if generics.is_empty() {
        FormatIR::Empty
    } else {
        concat(vec![text("<"), join(text(", "), generics.iter().map(|g| text(g.clone())).collect()), text(">")])
    }
}

fn fmt_param(param: &Param) -> FormatIR {
    let mut parts = Vec::new();
    if param.rest {
        parts.push(text("ceteri "));
    }
    if param.optional {
        parts.push(text("si "));
    }
    if let Some(ownership) = &param.ownership {
        parts.push(text(ownership.clone()));
        parts.push(text(" "));
    }
    if let Some(ty) = &param.ty {
        parts.push(fmt_type(ty));
        parts.push(text(" "));
    }
    parts.push(text(param.name.clone()));
    if let Some(default) = &param.default {
        parts.push(text(" = "));
        parts.push(wrap(default));
    }
    concat(parts)
}

fn fmt_function_signature(
    name: &str,
    params: &[Param],
    ret: &Option<Type>,
    generics: &[String],
    is_async: bool,
    is_abstract: bool,
) -> FormatIR {
    let mut parts = Vec::new();
    if is_abstract {
        parts.push(text("abstractus "));
    }
    if is_async {
        parts.push(text("asynca "));
    }
    parts.push(text("functio "));
    parts.push(text(name.to_string()));
    parts.push(fmt_generics(generics));
    parts.push(text("("));
    parts.push(join(text(", "), params.iter().map(fmt_param).collect()));
    parts.push(text(")"));
    if let Some(ret) = ret {
        parts.push(text(" -> "));
        parts.push(fmt_type(ret));
    }
    concat(parts)
}

fn fmt_function_body(body: &Option<Vec<Stmt>>) -> FormatIR {
    match body {
        Some(stmts) => concat(vec![text(" "), fmt_block_braces(stmts)]),
        None => FormatIR::Empty,
    }
}

/// A method inside a class body: visibility is a bare leading keyword
/// (`privata`/`protecta`), never the `@`-annotation form top-level
/// declarations use.
fn fmt_class_method(stmt: &Stmt) -> FormatIR {
    match stmt {
        Stmt::FunctionDecl { name, params, ret, body, is_async, generics, visibility, is_abstract, .. } => {
            let vis = match visibility {
                Visibility::Private => "privata ",
                Visibility::Protected => "protecta ",
                Visibility::Public => "",
            };
            concat(vec![
                text(vis),
                fmt_function_signature(name, params, ret, generics, *is_async, *is_abstract),
                fmt_function_body(body),
            ])
        }
        other => fmt_stmt(other),
    }
}

fn fmt_if(keyword: &'static str, cond: &Expr, then_branch: &Stmt, else_branch: &Option<Box<Stmt>>) -> FormatIR {
    let mut parts = vec![text(keyword), text(" "), fmt_expr(cond), text(" "), fmt_body(then_branch)];
    if let Some(else_stmt) = else_branch {
        match else_stmt.as_ref() {
            Stmt::If { cond, then_branch, else_branch, .. } => {
                parts.push(text(" "));
                parts.push(fmt_if("sin", cond, then_branch, else_branch));
            }
            other => {
                parts.push(text(" secus "));
                parts.push(fmt_body(other));
            }
        }
    }
    concat(parts)
}

fn fmt_import_name(name: &ImportName) -> FormatIR {
    match &name.alias {
        Some(alias) => concat(vec![text(name.name.clone()), text(" ut "), text(alias.clone())]),
        None => text(name.name.clone()),
    }
}

fn fmt_pattern(pattern: &Pattern) -> FormatIR {
    match pattern {
        Pattern::Wildcard { .. } => text("_"),
        Pattern::Variant { name, alias: Some(alias), .. } => {
            concat(vec![text(name.clone()), text(" ut "), text(alias.clone())])
        }
        Pattern::Variant { name, bindings, .. } if bindings.is_empty() => text(name.clone()),
        Pattern::Variant { name, bindings, .. } => concat(vec![
            text(name.clone()),
            text(" pro "),
            join(text(", "), bindings.iter().map(|b| text(b.clone())).collect()),
        ]),
    }
}

fn fmt_match_case(case: &MatchCase) -> FormatIR {
    concat(vec![
        text("casu "),
        join(text(", "), case.patterns.iter().map(fmt_pattern).collect()),
        text(" "),
        fmt_block_braces(&case.body),
    ])
}

fn fmt_switch_case(case: &SwitchCase) -> FormatIR {
    concat(vec![text("casu "), fmt_expr(&case.pattern), text(" "), fmt_case_body(&case.body)])
}

fn fmt_guard_clause(clause: &GuardClause) -> FormatIR {
    concat(vec![text("si "), fmt_expr(&clause.cond), text(" "), fmt_block_braces(&clause.body)])
}

fn fmt_variant_decl(variant: &VariantDecl) -> FormatIR {
    let fields = if variant.fields.is_empty() {
        text("{}")
    } else {
        let body = join(hardline(), variant.fields.iter().map(fmt_field).collect());
        concat(vec![text("{"), indent(concat(vec![hardline(), body])), hardline(), text("}")])
    };
    concat(vec![text(variant.name.clone()), text(" "), fields])
}

fn fmt_interface_method(method: &InterfaceMethod) -> FormatIR {
    let mut parts =
        vec![text("functio "), text(method.name.clone()), text("("), join(text(", "), method.params.iter().map(fmt_param).collect()), text(")")];
    if let Some(ret) = &method.ret {
        parts.push(text(" -> "));
        parts.push(fmt_type(ret));
    }
    concat(parts)
}

pub(crate) fn fmt_stmt(stmt: &Stmt) -> FormatIR {
    match stmt {
        Stmt::Block { statements, .. } => fmt_block_braces(statements),
        Stmt::Expr { expr, .. } => fmt_expr(expr),
        Stmt::Empty { .. } => text("tacet"),

        Stmt::VarDecl { name, kind, ty, init, visibility, is_extern, .. } => {
            let mut parts = vec![decorator_lines(*visibility, *is_extern), text(kind_keyword(*kind)), text(" ")];
            if let Some(ty) = ty {
                parts.push(fmt_type(ty));
                parts.push(text(" "));
            }
            parts.push(text(name.clone()));
            if let Some(init) = init {
                parts.push(text(" = "));
                parts.push(wrap(init));
            }
            concat(parts)
        }

        Stmt::FunctionDecl { name, params, ret, body, is_async, generics, visibility, is_extern, is_abstract, .. } => {
            concat(vec![
                decorator_lines(*visibility, *is_extern),
                fmt_function_signature(name, params, ret, generics, *is_async, *is_abstract),
                fmt_function_body(body),
            ])
        }

        Stmt::ClassDecl { name, generics, fields, methods, interfaces, is_abstract, visibility, .. } => {
            let mut members = Vec::new();
            for f in fields {
                members.push(fmt_field(f));
            }
            for m in methods {
                members.push(fmt_class_method(m));
            }
            let body = if members.is_empty() {
                text("{}")
            } else {
                concat(vec![
                    text("{"),
                    indent(concat(vec![hardline(), join(concat(vec![hardline(), hardline()]), members)])),
                    hardline(),
                    text("}"),
                ])
            };
            let mut parts = vec![decorator_lines(*visibility, false)];
            if *is_abstract {
                parts.push(text("abstractus "));
            }
            parts.push(text("genus "));
            parts.push(text(name.clone()));
            parts.push(fmt_generics(generics));
            if !interfaces.is_empty() {
                parts.push(text(" pactum "));
                parts.push(join(text(", "), interfaces.iter().map(|i| text(i.clone())).collect()));
            }
            parts.push(text(" "));
            parts.push(body);
            concat(parts)
        }

        Stmt::InterfaceDecl { name, generics, methods, visibility, .. } => {
            let body = if methods.is_empty() {
                text("{}")
            } else {
                let members = join(hardline(), methods.iter().map(fmt_interface_method).collect());
                concat(vec![text("{"), indent(concat(vec![hardline(), members])), hardline(), text("}")])
            };
            concat(vec![
                decorator_lines(*visibility, false),
                text("pactum "),
                text(name.clone()),
                fmt_generics(generics),
                text(" "),
                body,
            ])
        }

        Stmt::EnumDecl { name, members, visibility, .. } => {
            let body = if members.is_empty() {
                text("{}")
            } else {
                let items: Vec<FormatIR> = members
                    .iter()
                    .map(|m| {
                        let mut parts = vec![text(m.name.clone())];
                        if let Some(value) = &m.value {
                            parts.push(text(" = "));
                            parts.push(wrap(value));
                        }
                        concat(parts)
                    })
                    .collect();
                concat(vec![
                    text("{"),
                    indent(concat(vec![hardline(), join(concat(vec![text(","), hardline()]), items)])),
                    hardline(),
                    text("}"),
                ])
            };
            concat(vec![decorator_lines(*visibility, false), text("ordo "), text(name.clone()), text(" "), body])
        }

        Stmt::UnionDecl { name, variants, visibility, .. } => {
            let body = if variants.is_empty() {
                text("{}")
            } else {
                let items = join(concat(vec![hardline(), hardline()]), variants.iter().map(fmt_variant_decl).collect());
                concat(vec![text("{"), indent(concat(vec![hardline(), items])), hardline(), text("}")])
            };
            concat(vec![decorator_lines(*visibility, false), text("discretio "), text(name.clone()), text(" "), body])
        }

        Stmt::Import { path, total, alias, names, .. } => {
            let mut parts = vec![text("§ importa ex "), text(quote_str(path)), text(" ")];
            if *total {
                parts.push(text("*"));
                if let Some(alias) = alias {
                    parts.push(text(" ut "));
                    parts.push(text(alias.clone()));
                }
            } else {
                parts.push(join(text(", "), names.iter().map(fmt_import_name).collect()));
            }
            concat(parts)
        }

        Stmt::TypeAlias { name, target, .. } => {
            concat(vec![text("idem "), text(name.clone()), text(" = "), fmt_type(target)])
        }

        Stmt::If { cond, then_branch, else_branch, .. } => fmt_if("si", cond, then_branch, else_branch),

        Stmt::While { cond, body, .. } => concat(vec![text("dum "), fmt_expr(cond), text(" "), fmt_body(body)]),

        Stmt::DoWhile { body, cond, .. } => {
            concat(vec![text("fac "), fmt_body(body), text(" dum "), fmt_expr(cond)])
        }

        Stmt::For { binding, iterator, body, species, is_async, .. } => {
            let species_kw = match species {
                ForSpecies::In => "in",
                ForSpecies::De => "de",
            };
            let mut parts = Vec::new();
            if *is_async {
                parts.push(text("asynca "));
            }
            parts.push(text("itera "));
            parts.push(text(binding.clone()));
            parts.push(text(" "));
            parts.push(text(species_kw));
            parts.push(text(" "));
            parts.push(fmt_expr(iterator));
            parts.push(text(" "));
            parts.push(fmt_body(body));
            concat(parts)
        }

        Stmt::Switch { subject, cases, default, .. } => {
            let mut items: Vec<FormatIR> = cases.iter().map(fmt_switch_case).collect();
            if let Some(default) = default {
                items.push(concat(vec![text("secus "), fmt_case_body(default)]));
            }
            let body = if items.is_empty() {
                text("{}")
            } else {
                concat(vec![text("{"), indent(concat(vec![hardline(), join(hardline(), items)])), hardline(), text("}")])
            };
            concat(vec![text("elige "), fmt_expr(subject), text(" "), body])
        }

        Stmt::Match { scrutinees, cases, .. } => {
            let subjects = join(text(", "), scrutinees.iter().map(fmt_expr).collect());
            let body = if cases.is_empty() {
                text("{}")
            } else {
                let items = join(hardline(), cases.iter().map(fmt_match_case).collect());
                concat(vec![text("{"), indent(concat(vec![hardline(), items])), hardline(), text("}")])
            };
            concat(vec![text("discerne "), subjects, text(" "), body])
        }

        Stmt::Guard { clauses, .. } => {
            let body = if clauses.is_empty() {
                text("{}")
            } else {
                let items = join(hardline(), clauses.iter().map(fmt_guard_clause).collect());
                concat(vec![text("{"), indent(concat(vec![hardline(), items])), hardline(), text("}")])
            };
            concat(vec![text("custodi "), body])
        }

        Stmt::Try { block, catch, finally, .. } => {
            let mut parts = vec![text("tempta "), fmt_body(block)];
            if let Some(catch) = catch {
                parts.push(text(" cape "));
                if let Some(param) = &catch.param {
                    parts.push(text(param.clone()));
                    parts.push(text(" "));
                }
                parts.push(fmt_block_braces(&catch.body));
            }
            if let Some(finally) = finally {
                parts.push(text(" denique "));
                parts.push(fmt_body(finally));
            }
            concat(parts)
        }

        Stmt::Return { value, .. } => match value {
            Some(value) => concat(vec![text("reddit "), fmt_expr(value)]),
            None => text("reddit"),
        },

        Stmt::Throw { value, fatal, .. } => {
            concat(vec![text(if *fatal { "moritor " } else { "iacit " }), fmt_expr(value)])
        }

        Stmt::Print { value, severity, .. } => {
            let kw = match severity {
                PrintSeverity::Info => "scribe",
                PrintSeverity::Debug => "mussat",
                PrintSeverity::Warn => "cavet",
            };
            concat(vec![text(kw), text(" "), fmt_expr(value)])
        }

        Stmt::Assert { cond, message, .. } => {
            let mut parts = vec![text("confirma "), fmt_expr(cond)];
            if let Some(message) = message {
                parts.push(text(", "));
                parts.push(fmt_expr(message));
            }
            concat(parts)
        }

        Stmt::Break { .. } => text("rumpe"),
        Stmt::Continue { .. } => text("perge"),

        Stmt::EntryPoint { body, is_async, .. } => {
            let kw = if *is_async { "incipiet" } else { "incipit" };
            concat(vec![text(kw), text(" "), fmt_block_braces(body)])
        }

        Stmt::TestSuite { name, body, .. } => {
            concat(vec![text("probandum "), text(quote_str(name)), text(" "), fmt_block_braces(body)])
        }

        Stmt::TestCase { name, body, .. } => {
            concat(vec![text("proba "), text(quote_str(name)), text(" "), fmt_block_braces(body)])
        }
    }
}

// ── Expressions ──────────────────────────────────────────────────────

fn needs_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::Binary { .. } | Expr::Unary { .. } | Expr::Ternary { .. } | Expr::Assign { .. } | Expr::Range { .. })
}

/// Render `expr` as a sub-expression embedded in another expression,
/// parenthesizing whenever its own shape is precedence-sensitive. This
/// is deliberately not minimal (spec §4.4: "the emitter does not
/// reintroduce minimal parenthesization") -- it always wraps the same
/// handful of shapes regardless of the parent's own precedence.
fn wrap(expr: &Expr) -> FormatIR {
    if needs_parens(expr) {
        concat(vec![text("("), fmt_expr(expr), text(")")])
    } else {
        fmt_expr(expr)
    }
}

fn fmt_property_key(key: &PropertyKey) -> FormatIR {
    match key {
        PropertyKey::Name { name, .. } => text(name.clone()),
        PropertyKey::Computed { expr, .. } => concat(vec![text("["), wrap(expr), text("]")]),
    }
}

fn fmt_object_property(prop: &ObjectProperty) -> FormatIR {
    if prop.shorthand {
        return fmt_property_key(&prop.key);
    }
    concat(vec![fmt_property_key(&prop.key), text(": "), wrap(&prop.value)])
}

fn fmt_properties_braced(properties: &[ObjectProperty]) -> FormatIR {
    if properties.is_empty() {
        return text("{}");
    }
    concat(vec![text("{ "), join(text(", "), properties.iter().map(fmt_object_property).collect()), text(" }")])
}

pub(crate) fn fmt_expr(expr: &Expr) -> FormatIR {
    match expr {
        Expr::Identifier { name, .. } => text(name.clone()),
        Expr::SelfRef { .. } => text("ego"),
        Expr::Literal { value, .. } => fmt_literal(value),

        Expr::Binary { op, left, right, .. } => {
            concat(vec![wrap(left), text(" "), text(op.clone()), text(" "), wrap(right)])
        }

        Expr::Unary { op, operand, .. } => {
            if matches!(op.as_str(), "non" | "nihil" | "nonnihil") {
                concat(vec![text(format!("{op} ")), wrap(operand)])
            } else {
                concat(vec![text(op.clone()), wrap(operand)])
            }
        }

        Expr::Assign { op, target, value, .. } => {
            concat(vec![wrap(target), text(" "), text(op.clone()), text(" "), wrap(value)])
        }

        Expr::Ternary { cond, consequent, alternative, .. } => {
            concat(vec![wrap(cond), text(" sic "), wrap(consequent), text(" secus "), wrap(alternative)])
        }

        Expr::Call { callee, args, .. } => {
            concat(vec![wrap(callee), text("("), join(text(", "), args.iter().map(wrap).collect()), text(")")])
        }

        Expr::Member { object, property, non_null, .. } => match property {
            PropertyKey::Name { name, .. } => {
                concat(vec![wrap(object), text(if *non_null { "!." } else { "." }), text(name.clone())])
            }
            PropertyKey::Computed { expr, .. } => concat(vec![
                wrap(object),
                text(if *non_null { "![" } else { "[" }),
                wrap(expr),
                text("]"),
            ]),
        },

        Expr::ArrayLiteral { elements, .. } => {
            concat(vec![text("["), join(text(", "), elements.iter().map(wrap).collect()), text("]")])
        }

        Expr::ObjectLiteral { properties, .. } => fmt_properties_braced(properties),

        Expr::Lambda { params, body, is_async, .. } => {
            let mut parts = Vec::new();
            if *is_async {
                parts.push(text("asynca "));
            }
            parts.push(text("clausura"));
            parts.push(text("("));
            parts.push(join(text(", "), params.iter().map(fmt_param).collect()));
            parts.push(text(")"));
            match body {
                LambdaBody::Expr { expr } => {
                    parts.push(text(": "));
                    parts.push(wrap(expr));
                }
                LambdaBody::Block { statements } => {
                    parts.push(text(" "));
                    parts.push(fmt_block_braces(statements));
                }
            }
            concat(parts)
        }

        Expr::New { callee, args, init, .. } => {
            let mut parts = vec![text("novum "), wrap(callee), text("(")];
            parts.push(join(text(", "), args.iter().map(wrap).collect()));
            parts.push(text(")"));
            if let Some(init) = init {
                parts.push(text(" "));
                parts.push(fmt_properties_braced(init));
            }
            concat(parts)
        }

        Expr::Await { operand, .. } => concat(vec![text("cede "), wrap(operand)]),

        Expr::TypeAssert { operand, target, kind, .. } => match kind {
            TypeAssertKind::As => concat(vec![wrap(operand), text(" qua "), fmt_type(target)]),
            TypeAssertKind::Is => concat(vec![wrap(operand), text(" innatum "), fmt_type(target)]),
            TypeAssertKind::ConstructCast => concat(vec![wrap(operand), text(" novum")]),
        },

        Expr::VariantConstruct { variant, fields, type_hint, .. } => {
            let mut parts = vec![text("finge "), text(variant.clone()), text(" "), fmt_properties_braced(fields)];
            if let Some(ty) = type_hint {
                parts.push(text(" qua "));
                parts.push(fmt_type(ty));
            }
            concat(parts)
        }

        Expr::Template { format, args, .. } => {
            let mut parts = vec![text("scriptum("), text(quote_str(format))];
            for arg in args {
                parts.push(text(", "));
                parts.push(wrap(arg));
            }
            parts.push(text(")"));
            concat(parts)
        }

        Expr::Range { start, end, inclusive, .. } => {
            concat(vec![wrap(start), text(if *inclusive { "..=" } else { ".." }), wrap(end)])
        }

        Expr::Convert { operand, target, fallback, .. } => {
            let kw = match target {
                PrimitiveTarget::Number => "numeratum",
                PrimitiveTarget::Fraction => "fractatum",
                PrimitiveTarget::Text => "textatum",
                PrimitiveTarget::Boolean => "bivalentum",
            };
            let mut parts = vec![wrap(operand), text(" "), text(kw)];
            if let Some(fallback) = fallback {
                parts.push(text(" vel "));
                parts.push(wrap(fallback));
            }
            concat(parts)
        }
    }
}

fn fmt_literal(value: &LiteralValue) -> FormatIR {
    text(literal_text(value))
}

fn literal_text(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Float(f) => format_float(*f),
        LiteralValue::Str(s) => quote_str(s),
        LiteralValue::True => "verum".to_string(),
        LiteralValue::False => "falsum".to_string(),
        LiteralValue::Null => "nihil".to_string(),
    }
}

/// `f64::Display` omits the trailing `.0` for whole numbers (`1.0` ->
/// `"1"`), which would re-lex as an `Int` and break the `Float`
/// round-trip -- force a decimal point onto whole-number floats.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

// ── Types ────────────────────────────────────────────────────────────

pub(crate) fn fmt_type(ty: &Type) -> FormatIR {
    match ty {
        Type::Named { name, .. } => text(name.clone()),
        Type::Generic { name, args, .. } => {
            concat(vec![text(name.clone()), text("<"), join(text(", "), args.iter().map(fmt_type).collect()), text(">")])
        }
        Type::Function { params, ret, .. } => concat(vec![
            text("("),
            join(text(", "), params.iter().map(fmt_type).collect()),
            text(") -> "),
            fmt_type(ret),
        ]),
        Type::Nullable { inner, .. } => concat(vec![fmt_type(inner), text("?")]),
        Type::Union { members, .. } => join(text(" | "), members.iter().map(fmt_type).collect()),
        Type::Literal { value, .. } => text(literal_text(value)),
    }
}
