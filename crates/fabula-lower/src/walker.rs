//! Typed-IR walker producing lowered-to-Python [`FormatIR`] (spec §4.5).
//!
//! Grounded on `fabula_fmt::walker`'s traversal shape (same IR, same
//! `Text`/`Hardline`/`Indent`/`Concat` document algebra reused from
//! `crate::ir` re-exported by `fabula-fmt`), but every textual form is
//! the Python rendering of a node rather than its Fabula re-spelling.
//! Builtin method/property rewrites (spec §4.5 points 5-6) consult the
//! `SemaContext` produced by `fabula_sema::analyze` to tell a genuine
//! user-defined method of the same name apart from the recognized
//! domain name it would otherwise shadow.

use fabula_parser::{
    CaseBody, Expr, FieldDecl, GuardClause, ImportName, InterfaceMethod, LambdaBody, LiteralValue,
    MatchCase, Module, ObjectProperty, Param, Pattern, PrimitiveTarget, PropertyKey,
    PrintSeverity, Stmt, SwitchCase, Type, TypeAssertKind, VariantDecl,
};
use fabula_sema::{SemaContext, SemanticType};

use fabula_fmt::ir::{concat, hardline, indent, join, text, FormatIR};

use crate::builtins::{method_rewrite, property_rewrite, py_ident, MethodRewrite, PropertyRewrite};
use crate::requirements::Requirements;

/// Render `module` as lowered Python source text, given the semantic
/// context `analyze` produced for it.
pub fn lower_module(module: &Module, ctx: &SemaContext) -> FormatIR {
    let reqs = Requirements::scan(module);
    let prelude = reqs.render();
    let body = join(concat(vec![hardline(), hardline()]), module.statements.iter().map(|s| fmt_stmt(s, ctx)).collect());
    if matches!(prelude, FormatIR::Empty) {
        body
    } else {
        concat(vec![prelude, hardline(), hardline(), body])
    }
}

// ── Statements ───────────────────────────────────────────────────────

fn block(statements: &[Stmt], ctx: &SemaContext) -> FormatIR {
    if statements.is_empty() {
        return indent(concat(vec![hardline(), text("pass")]));
    }
    let body = join(hardline(), statements.iter().map(|s| fmt_stmt(s, ctx)).collect());
    indent(concat(vec![hardline(), body]))
}

/// A control-flow body, rendered as an indented Python suite. A bare
/// (non-`Block`) statement body still gets its own indented suite --
/// Python has no single-statement-without-colon-block shorthand.
fn suite(stmt: &Stmt, ctx: &SemaContext) -> FormatIR {
    match stmt {
        Stmt::Block { statements, .. } => block(statements, ctx),
        other => indent(concat(vec![hardline(), fmt_stmt(other, ctx)])),
    }
}

fn fmt_case_body(body: &CaseBody, ctx: &SemaContext) -> FormatIR {
    match body {
        CaseBody::Block { statements } => block(statements, ctx),
        CaseBody::Return { expr } => indent(concat(vec![hardline(), text("return "), fmt_expr(expr, ctx)])),
    }
}

fn lower_ident(name: &str) -> FormatIR {
    text(py_ident(name))
}

fn fmt_param(param: &Param, ctx: &SemaContext) -> FormatIR {
    let mut parts = Vec::new();
    if param.rest {
        parts.push(text("*"));
    }
    parts.push(lower_ident(&param.name));
    if let Some(ty) = &param.ty {
        parts.push(text(": "));
        if param.optional {
            parts.push(concat(vec![lower_type(ty), text(" | None")]));
        } else {
            parts.push(lower_type(ty));
        }
    }
    if let Some(default) = &param.default {
        parts.push(text(" = "));
        parts.push(wrap(default, ctx));
    } else if param.optional {
        parts.push(text(" = None"));
    }
    concat(parts)
}

fn fmt_params(params: &[Param], ctx: &SemaContext, leading_self: bool) -> FormatIR {
    let mut rendered: Vec<FormatIR> = Vec::new();
    if leading_self {
        rendered.push(text("self"));
    }
    rendered.extend(params.iter().map(|p| fmt_param(p, ctx)));
    join(text(", "), rendered)
}

fn fmt_def(
    name: &str,
    params: &[Param],
    ret: &Option<Type>,
    body: &Option<Vec<Stmt>>,
    is_async: bool,
    is_abstract: bool,
    leading_self: bool,
    ctx: &SemaContext,
) -> FormatIR {
    let mut parts = Vec::new();
    if is_abstract {
        parts.push(text("@abstractmethod"));
        parts.push(hardline());
    }
    if is_async {
        parts.push(text("async "));
    }
    parts.push(text("def "));
    parts.push(text(py_ident(name)));
    parts.push(text("("));
    parts.push(fmt_params(params, ctx, leading_self));
    parts.push(text(")"));
    if let Some(ret) = ret {
        parts.push(text(" -> "));
        parts.push(lower_type(ret));
    }
    parts.push(text(":"));
    match body {
        Some(stmts) if !is_abstract => parts.push(block(stmts, ctx)),
        _ => parts.push(indent(concat(vec![hardline(), text("...")]))),
    }
    concat(parts)
}

fn fmt_field(field: &FieldDecl, ctx: &SemaContext) -> FormatIR {
    let mut parts = vec![lower_ident(&field.name), text(": "), lower_type(&field.ty)];
    if let Some(default) = &field.default {
        parts.push(text(" = "));
        parts.push(wrap(default, ctx));
    }
    concat(parts)
}

fn fmt_if(cond: &Expr, then_branch: &Stmt, else_branch: &Option<Box<Stmt>>, ctx: &SemaContext, leading: &'static str) -> FormatIR {
    let mut parts = vec![text(leading), fmt_expr(cond, ctx), text(":"), suite(then_branch, ctx)];
    if let Some(else_stmt) = else_branch {
        match else_stmt.as_ref() {
            Stmt::If { cond, then_branch, else_branch, .. } => {
                parts.push(hardline());
                parts.push(fmt_if(cond, then_branch, else_branch, ctx, "elif "));
            }
            other => {
                parts.push(hardline());
                parts.push(text("else:"));
                parts.push(suite(other, ctx));
            }
        }
    }
    concat(parts)
}

fn module_path(path: &str) -> String {
    path.split('/').map(|seg| seg.replace('-', "_")).collect::<Vec<_>>().join(".")
}

fn fmt_import_name(name: &ImportName) -> FormatIR {
    match &name.alias {
        Some(alias) => concat(vec![lower_ident(&name.name), text(" as "), lower_ident(alias)]),
        None => lower_ident(&name.name),
    }
}

fn fmt_pattern(pattern: &Pattern) -> FormatIR {
    match pattern {
        Pattern::Wildcard { .. } => text("_"),
        Pattern::Variant { name, alias, bindings, .. } => {
            let ctor = if bindings.is_empty() {
                concat(vec![text(name.clone()), text("()")])
            } else {
                concat(vec![
                    text(name.clone()),
                    text("("),
                    join(text(", "), bindings.iter().map(|b| lower_ident(b)).collect()),
                    text(")"),
                ])
            };
            match alias {
                Some(alias) => concat(vec![ctor, text(" as "), lower_ident(alias)]),
                None => ctor,
            }
        }
    }
}

fn fmt_match_case_patterns(case: &MatchCase) -> FormatIR {
    if case.patterns.len() == 1 {
        fmt_pattern(&case.patterns[0])
    } else {
        concat(vec![text("("), join(text(", "), case.patterns.iter().map(fmt_pattern).collect()), text(")")])
    }
}

fn fmt_match_case(case: &MatchCase, ctx: &SemaContext) -> FormatIR {
    concat(vec![text("case "), fmt_match_case_patterns(case), text(":"), block(&case.body, ctx)])
}

fn fmt_switch_case(case: &SwitchCase, ctx: &SemaContext) -> FormatIR {
    concat(vec![text("case "), wrap(&case.pattern, ctx), text(":"), fmt_case_body(&case.body, ctx)])
}

/// `ordo`'s camel-pascal-ish enumeration name re-slugged into a valid
/// Python identifier, preserving the teacher's "be forgiving with
/// user-chosen names" spirit rather than asserting they're already
/// identifier-shaped (they always are here, but defensive nonetheless).
fn slug_ident(name: &str) -> String {
    let mut out = String::new();
    let mut prev_was_sep = true;
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            if prev_was_sep && c.is_ascii_digit() {
                out.push('_');
            }
            out.push(if prev_was_sep { c.to_ascii_uppercase() } else { c });
            prev_was_sep = false;
        } else {
            prev_was_sep = true;
        }
    }
    if out.is_empty() {
        "Case".to_string()
    } else {
        out
    }
}

fn test_method_ident(name: &str) -> String {
    let mut out = String::from("test_");
    let mut prev_was_sep = true;
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            prev_was_sep = false;
        } else if !prev_was_sep {
            out.push('_');
            prev_was_sep = true;
        }
    }
    out
}

fn fmt_union_variant_record(variant: &VariantDecl, ctx: &SemaContext) -> FormatIR {
    let fields = if variant.fields.is_empty() {
        indent(concat(vec![hardline(), text("pass")]))
    } else {
        indent(concat(vec![hardline(), join(hardline(), variant.fields.iter().map(|f| fmt_field(f, ctx)).collect())]))
    };
    concat(vec![text("@dataclass"), hardline(), text("class "), text(variant.name.clone()), text(":"), fields])
}

fn fmt_interface_method(method: &InterfaceMethod, ctx: &SemaContext) -> FormatIR {
    concat(vec![
        text("def "),
        text(py_ident(&method.name)),
        text("("),
        fmt_params(&method.params, ctx, true),
        text(")"),
        match &method.ret {
            Some(ret) => concat(vec![text(" -> "), lower_type(ret)]),
            None => FormatIR::Empty,
        },
        text(":"),
        indent(concat(vec![hardline(), text("...")])),
    ])
}

pub(crate) fn fmt_stmt(stmt: &Stmt, ctx: &SemaContext) -> FormatIR {
    match stmt {
        Stmt::Block { statements, .. } => {
            concat(vec![text("if True:"), block(statements, ctx)])
        }

        Stmt::Expr { expr, .. } => fmt_expr(expr, ctx),

        Stmt::Empty { .. } => text("pass"),

        Stmt::VarDecl { name, init, ty, is_extern, .. } => {
            if *is_extern {
                return text("pass");
            }
            let mut parts = vec![lower_ident(name)];
            if let Some(ty) = ty {
                parts.push(text(": "));
                parts.push(lower_type(ty));
            }
            match init {
                Some(init) => {
                    parts.push(text(" = "));
                    parts.push(wrap(init, ctx));
                }
                None if ty.is_none() => parts.push(text(" = None")),
                None => {}
            }
            concat(parts)
        }

        Stmt::FunctionDecl { name, params, ret, body, is_async, is_extern, is_abstract, .. } => {
            fmt_def(name, params, ret, &if *is_extern { None } else { body.clone() }, *is_async, *is_abstract, false, ctx)
        }

        Stmt::ClassDecl { name, fields, methods, interfaces, is_abstract, .. } => {
            let mut bases: Vec<FormatIR> = interfaces.iter().map(|i| text(i.clone())).collect();
            if *is_abstract {
                bases.push(text("ABC"));
            }
            let mut members = Vec::new();
            for f in fields {
                members.push(fmt_field(f, ctx));
            }
            for m in methods {
                if let Stmt::FunctionDecl { name, params, ret, body, is_async, is_abstract, .. } = m {
                    members.push(fmt_def(name, params, ret, body, *is_async, *is_abstract, true, ctx));
                } else {
                    members.push(fmt_stmt(m, ctx));
                }
            }
            let body_ir = if members.is_empty() {
                indent(concat(vec![hardline(), text("pass")]))
            } else {
                indent(concat(vec![hardline(), join(concat(vec![hardline(), hardline()]), members)]))
            };
            let mut parts = vec![text("@dataclass"), hardline(), text("class "), text(name.clone())];
            if !bases.is_empty() {
                parts.push(text("("));
                parts.push(join(text(", "), bases));
                parts.push(text(")"));
            }
            parts.push(text(":"));
            parts.push(body_ir);
            concat(parts)
        }

        Stmt::InterfaceDecl { name, methods, .. } => {
            let body = if methods.is_empty() {
                indent(concat(vec![hardline(), text("pass")]))
            } else {
                indent(concat(vec![
                    hardline(),
                    join(concat(vec![hardline(), hardline()]), methods.iter().map(|m| fmt_interface_method(m, ctx)).collect()),
                ]))
            };
            concat(vec![text("class "), text(name.clone()), text("(Protocol):"), body])
        }

        Stmt::EnumDecl { name, members, .. } => {
            let body = if members.is_empty() {
                indent(concat(vec![hardline(), text("pass")]))
            } else {
                let items: Vec<FormatIR> = members
                    .iter()
                    .map(|m| match &m.value {
                        Some(value) => concat(vec![lower_ident(&m.name), text(" = "), wrap(value, ctx)]),
                        None => concat(vec![lower_ident(&m.name), text(" = auto()")]),
                    })
                    .collect();
                indent(concat(vec![hardline(), join(hardline(), items)]))
            };
            concat(vec![text("class "), text(name.clone()), text("(Enum):"), body])
        }

        Stmt::UnionDecl { name, variants, .. } => {
            let records = join(concat(vec![hardline(), hardline()]), variants.iter().map(|v| fmt_union_variant_record(v, ctx)).collect());
            let alias_members = join(text(" | "), variants.iter().map(|v| text(v.name.clone())).collect());
            concat(vec![records, hardline(), hardline(), text(name.clone()), text(" = "), alias_members])
        }

        Stmt::Import { path, total, alias, names, .. } => {
            let modpath = module_path(path);
            if *total {
                match alias {
                    Some(alias) => concat(vec![text("import "), text(modpath), text(" as "), lower_ident(alias)]),
                    None => concat(vec![text("import "), text(modpath)]),
                }
            } else {
                concat(vec![
                    text("from "),
                    text(modpath),
                    text(" import "),
                    join(text(", "), names.iter().map(fmt_import_name).collect()),
                ])
            }
        }

        Stmt::TypeAlias { name, target, .. } => concat(vec![text(name.clone()), text(" = "), lower_type(target)]),

        Stmt::If { cond, then_branch, else_branch, .. } => fmt_if(cond, then_branch, else_branch, ctx, "if "),

        Stmt::While { cond, body, .. } => concat(vec![text("while "), fmt_expr(cond, ctx), text(":"), suite(body, ctx)]),

        Stmt::DoWhile { body, cond, .. } => {
            let break_check = concat(vec![
                hardline(),
                text("if not ("),
                fmt_expr(cond, ctx),
                text("):"),
                indent(concat(vec![hardline(), text("break")])),
            ]);
            match body.as_ref() {
                Stmt::Block { statements, .. } => {
                    let inner = if statements.is_empty() {
                        break_check
                    } else {
                        concat(vec![join(hardline(), statements.iter().map(|s| fmt_stmt(s, ctx)).collect()), break_check])
                    };
                    concat(vec![text("while True:"), indent(concat(vec![hardline(), inner]))])
                }
                other => concat(vec![
                    text("while True:"),
                    indent(concat(vec![hardline(), fmt_stmt(other, ctx), break_check])),
                ]),
            }
        }

        Stmt::For { binding, iterator, body, is_async, .. } => {
            let kw = if *is_async { "async for " } else { "for " };
            concat(vec![text(kw), lower_ident(binding), text(" in "), fmt_expr(iterator, ctx), text(":"), suite(body, ctx)])
        }

        Stmt::Switch { subject, cases, default, .. } => {
            let mut items: Vec<FormatIR> = cases.iter().map(|c| fmt_switch_case(c, ctx)).collect();
            if let Some(default) = default {
                items.push(concat(vec![text("case _:"), fmt_case_body(default, ctx)]));
            } else {
                items.push(concat(vec![text("case _:"), indent(concat(vec![hardline(), text("pass")]))]));
            }
            let body = join(hardline(), items);
            concat(vec![text("match "), wrap(subject, ctx), text(":"), indent(concat(vec![hardline(), body]))])
        }

        Stmt::Match { scrutinees, cases, .. } => {
            let subject = if scrutinees.len() == 1 {
                fmt_expr(&scrutinees[0], ctx)
            } else {
                concat(vec![text("("), join(text(", "), scrutinees.iter().map(|e| fmt_expr(e, ctx)).collect()), text(")")])
            };
            let body = join(hardline(), cases.iter().map(|c| fmt_match_case(c, ctx)).collect());
            concat(vec![text("match "), subject, text(":"), indent(concat(vec![hardline(), body]))])
        }

        Stmt::Guard { clauses, .. } => fmt_guard_clauses(clauses, ctx),

        Stmt::Try { block: try_block, catch, finally, .. } => {
            let mut parts = vec![text("try:"), suite(try_block, ctx)];
            match catch {
                Some(clause) => {
                    parts.push(hardline());
                    match &clause.param {
                        Some(param) => {
                            parts.push(text("except Exception as "));
                            parts.push(lower_ident(param));
                            parts.push(text(":"));
                        }
                        None => parts.push(text("except Exception:")),
                    }
                    parts.push(block(&clause.body, ctx));
                }
                None => {}
            }
            if let Some(finally) = finally {
                parts.push(hardline());
                parts.push(text("finally:"));
                parts.push(suite(finally, ctx));
            }
            concat(parts)
        }

        Stmt::Return { value, .. } => match value {
            Some(value) => concat(vec![text("return "), fmt_expr(value, ctx)]),
            None => text("return"),
        },

        Stmt::Throw { value, .. } => concat(vec![text("raise "), fmt_expr(value, ctx)]),

        Stmt::Print { value, severity, .. } => match severity {
            PrintSeverity::Info => concat(vec![text("print("), fmt_expr(value, ctx), text(")")]),
            PrintSeverity::Debug => concat(vec![text("logging.debug("), fmt_expr(value, ctx), text(")")]),
            PrintSeverity::Warn => concat(vec![text("logging.warning("), fmt_expr(value, ctx), text(")")]),
        },

        Stmt::Assert { cond, message, .. } => {
            let mut parts = vec![text("assert "), fmt_expr(cond, ctx)];
            if let Some(message) = message {
                parts.push(text(", "));
                parts.push(fmt_expr(message, ctx));
            }
            concat(parts)
        }

        Stmt::Break { .. } => text("break"),
        Stmt::Continue { .. } => text("continue"),

        Stmt::EntryPoint { body, is_async, .. } => {
            if *is_async {
                concat(vec![
                    text("async def main():"),
                    block(body, ctx),
                    hardline(),
                    hardline(),
                    text("if __name__ == \"__main__\":"),
                    indent(concat(vec![hardline(), text("asyncio.run(main())")])),
                ])
            } else {
                concat(vec![text("if __name__ == \"__main__\":"), block(body, ctx)])
            }
        }

        Stmt::TestSuite { name, body, .. } => {
            let class_name = format!("Test{}", slug_ident(name));
            let lowered_members: Vec<FormatIR> = body
                .iter()
                .map(|s| match s {
                    Stmt::TestCase { name, body, .. } => {
                        fmt_def(&test_method_ident(name), &[], &None, &Some(body.clone()), false, false, true, ctx)
                    }
                    other => fmt_stmt(other, ctx),
                })
                .collect();
            let members = if lowered_members.is_empty() {
                indent(concat(vec![hardline(), text("pass")]))
            } else {
                indent(concat(vec![hardline(), join(concat(vec![hardline(), hardline()]), lowered_members)]))
            };
            concat(vec![text("class "), text(class_name), text("(unittest.TestCase):"), members])
        }

        Stmt::TestCase { name, body, .. } => fmt_def(&test_method_ident(name), &[], &None, &Some(body.clone()), false, false, true, ctx),
    }
}

fn fmt_guard_clauses(clauses: &[GuardClause], ctx: &SemaContext) -> FormatIR {
    join(
        concat(vec![hardline(), hardline()]),
        clauses.iter().map(|clause| concat(vec![text("if "), fmt_expr(&clause.cond, ctx), text(":"), block(&clause.body, ctx)])).collect(),
    )
}

// ── Expressions ──────────────────────────────────────────────────────

fn needs_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::Binary { .. } | Expr::Unary { .. } | Expr::Ternary { .. } | Expr::Assign { .. } | Expr::Range { .. })
}

fn wrap(expr: &Expr, ctx: &SemaContext) -> FormatIR {
    if needs_parens(expr) {
        concat(vec![text("("), fmt_expr(expr, ctx), text(")")])
    } else {
        fmt_expr(expr, ctx)
    }
}

fn lower_binary_op(op: &str) -> &str {
    match op {
        "et" => "and",
        "aut" => "or",
        "===" => "is",
        "!==" => "is not",
        "inter" => "in",
        "intra" => "not in",
        other => other,
    }
}

fn fmt_object_properties(properties: &[ObjectProperty], ctx: &SemaContext) -> FormatIR {
    if properties.is_empty() {
        return text("{}");
    }
    let items: Vec<FormatIR> = properties
        .iter()
        .map(|prop| match &prop.key {
            PropertyKey::Name { name, .. } => concat(vec![text(format!("\"{name}\": ")), wrap(&prop.value, ctx)]),
            PropertyKey::Computed { expr, .. } => concat(vec![wrap(expr, ctx), text(": "), wrap(&prop.value, ctx)]),
        })
        .collect();
    concat(vec![text("{"), join(text(", "), items), text("}")])
}

fn fmt_keyword_args(properties: &[ObjectProperty], ctx: &SemaContext) -> FormatIR {
    join(
        text(", "),
        properties
            .iter()
            .map(|prop| match &prop.key {
                PropertyKey::Name { name, .. } => concat(vec![text(py_ident(name)), text("="), wrap(&prop.value, ctx)]),
                PropertyKey::Computed { expr, .. } => concat(vec![text("**{"), wrap(expr, ctx), text(": "), wrap(&prop.value, ctx), text("}")]),
            })
            .collect(),
    )
}

/// Whether `object`'s statically-resolved type declares its own
/// `method` -- if so, a recognized domain name on it is a genuine user
/// override and must not be rewritten (spec §4.5's "consumes the
/// annotated semantic context to distinguish method call sites").
fn has_user_method(object: &Expr, method: &str, ctx: &SemaContext) -> bool {
    match ctx.type_of(object) {
        Some(SemanticType::Class { name, .. }) => {
            matches!(ctx.classes.get(name), Some(SemanticType::Class { fields, .. }) if fields.methods.contains_key(method))
        }
        Some(SemanticType::Interface { methods, .. }) => methods.contains_key(method),
        _ => false,
    }
}

fn fmt_call(callee: &Expr, args: &[Expr], ctx: &SemaContext) -> FormatIR {
    if let Expr::Member { object, property: PropertyKey::Name { name: method, .. }, non_null: _, .. } = callee {
        if !has_user_method(object, method, ctx) {
            if let Some(rewrite) = method_rewrite(method) {
                return fmt_method_rewrite(rewrite, object, args, ctx);
            }
        }
    }
    concat(vec![wrap(callee, ctx), text("("), join(text(", "), args.iter().map(|a| wrap(a, ctx)).collect()), text(")")])
}

fn fmt_method_rewrite(rewrite: MethodRewrite, object: &Expr, args: &[Expr], ctx: &SemaContext) -> FormatIR {
    match rewrite {
        MethodRewrite::FreeFunctionOfReceiver(func) => concat(vec![text(func), text("("), wrap(object, ctx), text(")")]),
        MethodRewrite::SameNameMethod(method) => concat(vec![
            wrap(object, ctx),
            text(format!(".{method}(")),
            join(text(", "), args.iter().map(|a| wrap(a, ctx)).collect()),
            text(")"),
        ]),
        MethodRewrite::ReceiverJoinsArg => {
            let arg = args.first().map(|a| wrap(a, ctx)).unwrap_or_else(|| text("[]"));
            concat(vec![wrap(object, ctx), text(".join("), arg, text(")")])
        }
        MethodRewrite::Containment => {
            let arg = args.first().map(|a| wrap(a, ctx)).unwrap_or_else(|| text("None"));
            concat(vec![arg, text(" in "), wrap(object, ctx)])
        }
        MethodRewrite::Slice => {
            let start = args.first().map(|a| wrap(a, ctx)).unwrap_or_else(|| text(""));
            concat(vec![
                wrap(object, ctx),
                text("["),
                start,
                text(":"),
                match args.get(1) {
                    Some(end) => wrap(end, ctx),
                    None => FormatIR::Empty,
                },
                text("]"),
            ])
        }
    }
}

fn fmt_member(object: &Expr, property: &PropertyKey, ctx: &SemaContext) -> FormatIR {
    match property {
        PropertyKey::Computed { expr, .. } => concat(vec![wrap(object, ctx), text("["), wrap(expr, ctx), text("]")]),
        PropertyKey::Name { name, .. } => match property_rewrite(name) {
            Some(PropertyRewrite::Len) => concat(vec![text("len("), wrap(object, ctx), text(")")]),
            Some(PropertyRewrite::First) => concat(vec![wrap(object, ctx), text("[0]")]),
            Some(PropertyRewrite::Last) => concat(vec![wrap(object, ctx), text("[-1]")]),
            None => concat(vec![wrap(object, ctx), text("."), text(py_ident(name))]),
        },
    }
}

/// Whether a block-bodied lambda's statements can be rewritten into a
/// single Python expression via the left-to-right-evaluating tuple
/// trick `(s1, s2, …, tail)[-1]` -- every statement but the last must
/// itself be a bare expression statement, and the last must reduce to
/// one.
fn lambda_block_as_expr<'a>(statements: &'a [Stmt]) -> Option<Vec<&'a Expr>> {
    if statements.is_empty() {
        return None;
    }
    let mut exprs = Vec::with_capacity(statements.len());
    for (i, stmt) in statements.iter().enumerate() {
        let is_last = i + 1 == statements.len();
        match stmt {
            Stmt::Expr { expr, .. } => exprs.push(expr),
            Stmt::Return { value: Some(expr), .. } if is_last => exprs.push(expr),
            _ => return None,
        }
    }
    Some(exprs)
}

fn fmt_lambda_body(body: &LambdaBody, ctx: &SemaContext) -> FormatIR {
    match body {
        LambdaBody::Expr { expr } => wrap(expr, ctx),
        LambdaBody::Block { statements } => match lambda_block_as_expr(statements) {
            Some(exprs) if exprs.len() == 1 => wrap(exprs[0], ctx),
            Some(exprs) => concat(vec![
                text("("),
                join(text(", "), exprs.iter().map(|e| wrap(e, ctx)).collect()),
                text(")[-1]"),
            ]),
            None => text("(_ for _ in ()).throw(NotImplementedError(\"unsupported lambda body\"))"),
        },
    }
}

fn fmt_convert(operand: &Expr, target: PrimitiveTarget, fallback: &Option<Box<Expr>>, ctx: &SemaContext) -> FormatIR {
    let func = match target {
        PrimitiveTarget::Number => "int",
        PrimitiveTarget::Fraction => "float",
        PrimitiveTarget::Text => "str",
        PrimitiveTarget::Boolean => "bool",
    };
    match fallback {
        Some(fallback) => {
            let helper = match target {
                PrimitiveTarget::Number => "_fallback_numerus",
                PrimitiveTarget::Fraction => "_fallback_fractus",
                _ => func,
            };
            concat(vec![text(helper), text("("), wrap(operand, ctx), text(", "), wrap(fallback, ctx), text(")")])
        }
        None => concat(vec![text(func), text("("), wrap(operand, ctx), text(")")]),
    }
}

fn fmt_template(format: &str, args: &[Expr], ctx: &SemaContext) -> FormatIR {
    let mut slot = String::new();
    for c in format.chars() {
        match c {
            '{' => slot.push_str("{{"),
            '}' => slot.push_str("}}"),
            '§' => slot.push_str("{}"),
            other => slot.push(other),
        }
    }
    concat(vec![
        quote_str(&slot),
        text(".format("),
        join(text(", "), args.iter().map(|a| wrap(a, ctx)).collect()),
        text(")"),
    ])
}

pub(crate) fn fmt_expr(expr: &Expr, ctx: &SemaContext) -> FormatIR {
    match expr {
        Expr::Identifier { name, .. } => lower_ident(name),
        Expr::SelfRef { .. } => text("self"),
        Expr::Literal { value, .. } => fmt_literal(value),

        Expr::Binary { op, left, right, .. } if op == "vel" => {
            concat(vec![text("("), wrap(left, ctx), text(" if "), wrap(left, ctx), text(" is not None else "), wrap(right, ctx), text(")")])
        }
        Expr::Binary { op, left, right, .. } => {
            concat(vec![wrap(left, ctx), text(" "), text(lower_binary_op(op)), text(" "), wrap(right, ctx)])
        }

        Expr::Unary { op, operand, .. } => match op.as_str() {
            "non" => concat(vec![text("not "), wrap(operand, ctx)]),
            "nihil" => concat(vec![wrap(operand, ctx), text(" is None")]),
            "nonnihil" => concat(vec![wrap(operand, ctx), text(" is not None")]),
            _ => concat(vec![text(op.clone()), wrap(operand, ctx)]),
        },

        Expr::Assign { op, target, value, .. } => concat(vec![wrap(target, ctx), text(" "), text(op.clone()), text(" "), wrap(value, ctx)]),

        Expr::Ternary { cond, consequent, alternative, .. } => {
            concat(vec![text("("), wrap(consequent, ctx), text(" if "), wrap(cond, ctx), text(" else "), wrap(alternative, ctx), text(")")])
        }

        Expr::Call { callee, args, .. } => fmt_call(callee, args, ctx),

        Expr::Member { object, property, .. } => fmt_member(object, property, ctx),

        Expr::ArrayLiteral { elements, .. } => {
            concat(vec![text("["), join(text(", "), elements.iter().map(|e| wrap(e, ctx)).collect()), text("]")])
        }

        Expr::ObjectLiteral { properties, .. } => fmt_object_properties(properties, ctx),

        Expr::Lambda { params, body, .. } => {
            let mut parts = vec![text("lambda")];
            if !params.is_empty() {
                parts.push(text(" "));
                parts.push(join(text(", "), params.iter().map(|p| lower_ident(&p.name)).collect()));
            }
            parts.push(text(": "));
            parts.push(fmt_lambda_body(body, ctx));
            concat(parts)
        }

        Expr::New { callee, args, init, .. } => {
            let mut parts = vec![wrap(callee, ctx), text("(")];
            let mut call_args: Vec<FormatIR> = args.iter().map(|a| wrap(a, ctx)).collect();
            if let Some(init) = init {
                call_args.push(fmt_keyword_args(init, ctx));
            }
            parts.push(join(text(", "), call_args));
            parts.push(text(")"));
            concat(parts)
        }

        Expr::Await { operand, .. } => concat(vec![text("await "), wrap(operand, ctx)]),

        Expr::TypeAssert { operand, kind, .. } => match kind {
            TypeAssertKind::As | TypeAssertKind::Is => fmt_expr(operand, ctx),
            TypeAssertKind::ConstructCast => concat(vec![wrap(operand, ctx), text("()")]),
        },

        Expr::VariantConstruct { variant, fields, .. } => {
            concat(vec![text(variant.clone()), text("("), fmt_keyword_args(fields, ctx), text(")")])
        }

        Expr::Template { format, args, .. } => fmt_template(format, args, ctx),

        Expr::Range { start, end, inclusive, .. } => {
            let mut parts = vec![text("range("), wrap(start, ctx), text(", ")];
            if *inclusive {
                parts.push(text("("));
                parts.push(wrap(end, ctx));
                parts.push(text(") + 1"));
            } else {
                parts.push(wrap(end, ctx));
            }
            parts.push(text(")"));
            concat(parts)
        }

        Expr::Convert { operand, target, fallback, .. } => fmt_convert(operand, *target, fallback, ctx),
    }
}

fn fmt_literal(value: &LiteralValue) -> FormatIR {
    text(match value {
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Float(f) => format_float(*f),
        LiteralValue::Str(s) => return quote_str(s),
        LiteralValue::True => "True".to_string(),
        LiteralValue::False => "False".to_string(),
        LiteralValue::Null => "None".to_string(),
    })
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn quote_str(s: &str) -> FormatIR {
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
    text(out)
}

// ── Types ────────────────────────────────────────────────────────────

pub(crate) fn lower_type(ty: &Type) -> FormatIR {
    match ty {
        Type::Named { name, .. } => text(lower_named_type(name)),
        Type::Generic { name, args, .. } => {
            let container = match name.as_str() {
                "Copia" => "list",
                "Tabula" => "dict",
                "Congeries" => "set",
                other => other,
            };
            concat(vec![text(container), text("["), join(text(", "), args.iter().map(lower_type).collect()), text("]")])
        }
        Type::Function { params, ret, .. } => concat(vec![
            text("Callable[["),
            join(text(", "), params.iter().map(lower_type).collect()),
            text("], "),
            lower_type(ret),
            text("]"),
        ]),
        Type::Nullable { inner, .. } => concat(vec![lower_type(inner), text(" | None")]),
        Type::Union { members, .. } => join(text(" | "), members.iter().map(lower_type).collect()),
        Type::Literal { value, .. } => concat(vec![text("Literal["), fmt_literal(value), text("]")]),
    }
}

fn lower_named_type(name: &str) -> String {
    match name {
        "numerus" => "int",
        "fractus" => "float",
        "textus" => "str",
        "bivalens" => "bool",
        "vacuum" => "None",
        "nihil" => "None",
        other => other,
    }
    .to_string()
}
