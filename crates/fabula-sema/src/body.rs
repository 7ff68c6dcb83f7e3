//! Phase 2 -- body analysis (spec §4.3 "Phase 2", "Expression typing").
//!
//! Recursively walks every statement and expression, opening scopes at
//! Block/Function/Class boundaries, and populates the context's
//! per-expression type map. Diagnostics are pushed onto the context
//! and analysis never stops early -- a lookup failure yields `unknown`
//! and the walk continues (spec: "Diagnostics are collected but never
//! abort phase 2: analysis always completes").

use fabula_parser::{CaseBody, Expr, LiteralValue, Module, Pattern, PrimitiveTarget, PropertyKey, Stmt, VarKind};

use crate::context::SemaContext;
use crate::resolve::resolve_type;
use crate::scope::{Scope, ScopeKind, Symbol, SymbolKind};
use crate::types::{ClassShape, SemanticType};
use std::rc::Rc;

pub fn analyze_module(module: &Module, ctx: &mut SemaContext) {
    let global = ctx.global.clone();
    for stmt in &module.statements {
        analyze_stmt(stmt, ctx, &global);
    }
}

fn is_reassignable(kind: VarKind) -> bool {
    matches!(kind, VarKind::Mutable | VarKind::Rebindable)
}

fn analyze_case_body(body: &CaseBody, ctx: &mut SemaContext, scope: &Scope) {
    match body {
        CaseBody::Block { statements } => {
            let inner = scope.child(ScopeKind::Block);
            for s in statements {
                analyze_stmt(s, ctx, &inner);
            }
        }
        CaseBody::Return { expr } => {
            type_of_expr(expr, ctx, scope);
        }
    }
}

pub fn analyze_stmt(stmt: &Stmt, ctx: &mut SemaContext, scope: &Scope) {
    match stmt {
        Stmt::Block { statements, .. } => {
            let inner = scope.child(ScopeKind::Block);
            for s in statements {
                analyze_stmt(s, ctx, &inner);
            }
        }
        Stmt::Expr { expr, .. } => {
            type_of_expr(expr, ctx, scope);
        }
        Stmt::Empty { .. } | Stmt::Import { .. } | Stmt::TypeAlias { .. } | Stmt::InterfaceDecl { .. } => {}
        Stmt::VarDecl { name, kind, ty, init, locus, .. } => {
            let declared = ty.as_ref().map(|t| resolve_type(t, ctx));
            let inferred = init.as_ref().map(|e| type_of_expr(e, ctx, scope));
            let final_ty = declared.or(inferred).unwrap_or_else(SemanticType::unknown);
            scope.define(Symbol::new(name.clone(), SymbolKind::Variable, final_ty, is_reassignable(*kind), *locus));
        }
        Stmt::FunctionDecl { params, body, .. } => {
            let fn_scope = scope.child(ScopeKind::Function);
            for param in params {
                let base = param.ty.as_ref().map(|t| resolve_type(t, ctx)).unwrap_or_else(SemanticType::unknown);
                let ty = if param.optional { base.with_nullable(true) } else { base };
                if let Some(default) = &param.default {
                    type_of_expr(default, ctx, &fn_scope);
                }
                fn_scope.define(Symbol::new(param.name.clone(), SymbolKind::Parameter, ty, true, param.locus));
            }
            if let Some(body) = body {
                for s in body {
                    analyze_stmt(s, ctx, &fn_scope);
                }
            }
        }
        Stmt::ClassDecl { name, fields, methods, locus, .. } => {
            let ego_ty = ctx.classes.get(name).cloned().unwrap_or_else(SemanticType::unknown);
            let class_scope = scope.child(ScopeKind::Class);
            class_scope.define(Symbol::new("ego", SymbolKind::Variable, ego_ty, false, *locus));
            for field in fields {
                if let Some(default) = &field.default {
                    type_of_expr(default, ctx, &class_scope);
                }
            }
            for method in methods {
                analyze_stmt(method, ctx, &class_scope);
            }
        }
        Stmt::EnumDecl { members, .. } => {
            for member in members {
                if let Some(value) = &member.value {
                    type_of_expr(value, ctx, scope);
                }
            }
        }
        Stmt::UnionDecl { variants, .. } => {
            for variant in variants {
                for field in &variant.fields {
                    if let Some(default) = &field.default {
                        type_of_expr(default, ctx, scope);
                    }
                }
            }
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            type_of_expr(cond, ctx, scope);
            analyze_stmt(then_branch, ctx, scope);
            if let Some(else_branch) = else_branch {
                analyze_stmt(else_branch, ctx, scope);
            }
        }
        Stmt::While { cond, body, .. } => {
            type_of_expr(cond, ctx, scope);
            analyze_stmt(body, ctx, scope);
        }
        Stmt::DoWhile { body, cond, .. } => {
            analyze_stmt(body, ctx, scope);
            type_of_expr(cond, ctx, scope);
        }
        Stmt::For { binding, iterator, body, locus, .. } => {
            let iter_ty = type_of_expr(iterator, ctx, scope);
            let binding_ty = match iter_ty {
                SemanticType::List { element, .. } => *element,
                _ => SemanticType::unknown(),
            };
            let for_scope = scope.child(ScopeKind::Block);
            for_scope.define(Symbol::new(binding.clone(), SymbolKind::Variable, binding_ty, true, *locus));
            analyze_stmt(body, ctx, &for_scope);
        }
        Stmt::Switch { subject, cases, default, .. } => {
            type_of_expr(subject, ctx, scope);
            for case in cases {
                type_of_expr(&case.pattern, ctx, scope);
                analyze_case_body(&case.body, ctx, scope);
            }
            if let Some(default) = default {
                analyze_case_body(default, ctx, scope);
            }
        }
        Stmt::Match { scrutinees, cases, .. } => {
            let scrutinee_types: Vec<SemanticType> = scrutinees.iter().map(|e| type_of_expr(e, ctx, scope)).collect();
            for case in cases {
                let case_scope = scope.child(ScopeKind::Block);
                for (pattern, scrutinee_ty) in case.patterns.iter().zip(scrutinee_types.iter()) {
                    bind_pattern(pattern, scrutinee_ty, ctx, &case_scope);
                }
                for s in &case.body {
                    analyze_stmt(s, ctx, &case_scope);
                }
            }
        }
        Stmt::Guard { clauses, .. } => {
            for clause in clauses {
                let clause_scope = scope.child(ScopeKind::Block);
                type_of_expr(&clause.cond, ctx, &clause_scope);
                for s in &clause.body {
                    analyze_stmt(s, ctx, &clause_scope);
                }
            }
        }
        Stmt::Try { block, catch, finally, .. } => {
            analyze_stmt(block, ctx, scope);
            if let Some(catch) = catch {
                let catch_scope = scope.child(ScopeKind::Block);
                if let Some(param) = &catch.param {
                    catch_scope.define(Symbol::new(
                        param.clone(),
                        SymbolKind::Variable,
                        SemanticType::unknown(),
                        true,
                        catch.locus,
                    ));
                }
                for s in &catch.body {
                    analyze_stmt(s, ctx, &catch_scope);
                }
            }
            if let Some(finally) = finally {
                analyze_stmt(finally, ctx, scope);
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                type_of_expr(value, ctx, scope);
            }
        }
        Stmt::Throw { value, .. } => {
            type_of_expr(value, ctx, scope);
        }
        Stmt::Print { value, .. } => {
            type_of_expr(value, ctx, scope);
        }
        Stmt::Assert { cond, message, .. } => {
            type_of_expr(cond, ctx, scope);
            if let Some(message) = message {
                type_of_expr(message, ctx, scope);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } => {}
        Stmt::EntryPoint { body, .. } | Stmt::TestSuite { body, .. } | Stmt::TestCase { body, .. } => {
            let inner = scope.child(ScopeKind::Function);
            for s in body {
                analyze_stmt(s, ctx, &inner);
            }
        }
    }
}

fn bind_pattern(pattern: &Pattern, scrutinee_ty: &SemanticType, ctx: &mut SemaContext, scope: &Scope) {
    match pattern {
        Pattern::Wildcard { .. } => {}
        Pattern::Variant { name, alias, bindings, locus } => {
            let variant_shape = match scrutinee_ty {
                SemanticType::DiscriminatedUnion { variants, .. } => variants.get(name).and_then(|v| match v {
                    SemanticType::Class { fields, .. } => Some(fields.clone()),
                    _ => None,
                }),
                _ => None,
            };
            match variant_shape {
                Some(shape) => bind_positional_fields(bindings, &shape, scope, *locus),
                None => ctx.error(*locus, format!("unknown variant '{name}' in pattern")),
            }
            if let Some(alias) = alias {
                scope.define(Symbol::new(alias.clone(), SymbolKind::Variable, SemanticType::unknown(), true, *locus));
            }
        }
    }
}

fn bind_positional_fields(bindings: &[String], shape: &Rc<ClassShape>, scope: &Scope, locus: fabula_common::Locus) {
    for (i, binding) in bindings.iter().enumerate() {
        let field_ty = shape
            .field_order
            .get(i)
            .and_then(|field_name| shape.fields.get(field_name))
            .cloned()
            .unwrap_or_else(SemanticType::unknown);
        scope.define(Symbol::new(binding.clone(), SymbolKind::Variable, field_ty, true, locus));
    }
}

/// Types `expr`, records the result on the context, and returns it.
pub fn type_of_expr(expr: &Expr, ctx: &mut SemaContext, scope: &Scope) -> SemanticType {
    let ty = compute_type(expr, ctx, scope);
    ctx.record_type(expr, ty.clone());
    ty
}

fn compute_type(expr: &Expr, ctx: &mut SemaContext, scope: &Scope) -> SemanticType {
    match expr {
        Expr::Literal { value, .. } => literal_type(value),
        Expr::SelfRef { locus } => scope.lookup("ego").map(|s| s.ty.clone()).unwrap_or_else(|| {
            ctx.error(*locus, "'ego' used outside a class method");
            SemanticType::unknown()
        }),
        Expr::Identifier { name, locus } => match scope.lookup(name) {
            Some(symbol) => symbol.ty.clone(),
            None => match lookup_nominal_type(name, ctx) {
                Some(ty) => ty,
                None => {
                    ctx.error(*locus, format!("undefined identifier '{name}'"));
                    SemanticType::unknown()
                }
            },
        },
        Expr::Binary { op, left, right, .. } => {
            let lt = type_of_expr(left, ctx, scope);
            let rt = type_of_expr(right, ctx, scope);
            binary_type(op, &lt, &rt)
        }
        Expr::Unary { op, operand, .. } => {
            let ot = type_of_expr(operand, ctx, scope);
            unary_type(op, ot)
        }
        Expr::Assign { target, value, .. } => {
            type_of_expr(target, ctx, scope);
            type_of_expr(value, ctx, scope)
        }
        Expr::Ternary { cond, consequent, alternative, .. } => {
            type_of_expr(cond, ctx, scope);
            let ct = type_of_expr(consequent, ctx, scope);
            type_of_expr(alternative, ctx, scope);
            ct
        }
        Expr::Call { callee, args, .. } => {
            for arg in args {
                type_of_expr(arg, ctx, scope);
            }
            call_type(callee, ctx, scope)
        }
        Expr::Member { object, property, non_null, .. } => {
            let ty = member_type(object, property, ctx, scope);
            if *non_null {
                ty.with_nullable(false)
            } else {
                ty
            }
        }
        Expr::ArrayLiteral { elements, .. } => {
            let element_ty = elements
                .first()
                .map(|first| type_of_expr(first, ctx, scope))
                .unwrap_or_else(SemanticType::unknown);
            for el in elements.iter().skip(1) {
                type_of_expr(el, ctx, scope);
            }
            SemanticType::List { element: Box::new(element_ty), nullable: false }
        }
        Expr::ObjectLiteral { properties, .. } => {
            let mut shape = ClassShape::default();
            for prop in properties {
                let ty = type_of_expr(&prop.value, ctx, scope);
                if let PropertyKey::Name { name, .. } = &prop.key {
                    shape.insert_field(name.clone(), ty);
                }
            }
            SemanticType::Class { name: "<object>".into(), fields: Rc::new(shape), nullable: false }
        }
        Expr::Lambda { params, body, .. } => {
            let lambda_scope = scope.child(ScopeKind::Function);
            let mut param_tys = Vec::new();
            for param in params {
                let ty = param.ty.as_ref().map(|t| resolve_type(t, ctx)).unwrap_or_else(SemanticType::unknown);
                param_tys.push(ty.clone());
                lambda_scope.define(Symbol::new(param.name.clone(), SymbolKind::Parameter, ty, true, param.locus));
            }
            let ret = match body {
                fabula_parser::LambdaBody::Expr { expr } => type_of_expr(expr, ctx, &lambda_scope),
                fabula_parser::LambdaBody::Block { statements } => {
                    for s in statements {
                        analyze_stmt(s, ctx, &lambda_scope);
                    }
                    SemanticType::unknown()
                }
            };
            SemanticType::Function { params: param_tys, ret: Box::new(ret), nullable: false }
        }
        Expr::New { callee, args, init, .. } => {
            for arg in args {
                type_of_expr(arg, ctx, scope);
            }
            if let Some(init) = init {
                for prop in init {
                    type_of_expr(&prop.value, ctx, scope);
                }
            }
            match callee.as_ref() {
                Expr::Identifier { name, .. } => lookup_nominal_type(name, ctx).unwrap_or_else(|| {
                    SemanticType::Unresolved { name: name.clone(), nullable: false }
                }),
                other => type_of_expr(other, ctx, scope),
            }
        }
        Expr::Await { operand, .. } => type_of_expr(operand, ctx, scope),
        Expr::TypeAssert { operand, target, .. } => {
            // qua/innatum/construct-cast all assume the annotated type unconditionally.
            type_of_expr(operand, ctx, scope);
            resolve_type(target, ctx)
        }
        Expr::VariantConstruct { variant, fields, type_hint, .. } => {
            for field in fields {
                type_of_expr(&field.value, ctx, scope);
            }
            if let Some(hint) = type_hint {
                return resolve_type(hint, ctx);
            }
            lookup_variant_type(variant, ctx).unwrap_or_else(|| SemanticType::Unresolved {
                name: variant.clone(),
                nullable: false,
            })
        }
        Expr::Template { args, .. } => {
            for arg in args {
                type_of_expr(arg, ctx, scope);
            }
            SemanticType::textus()
        }
        Expr::Range { start, end, .. } => {
            type_of_expr(start, ctx, scope);
            type_of_expr(end, ctx, scope);
            SemanticType::List { element: Box::new(SemanticType::numerus()), nullable: false }
        }
        Expr::Convert { operand, target, fallback, .. } => {
            type_of_expr(operand, ctx, scope);
            if let Some(fallback) = fallback {
                type_of_expr(fallback, ctx, scope);
            }
            convert_target_type(*target)
        }
    }
}

fn literal_type(value: &LiteralValue) -> SemanticType {
    match value {
        LiteralValue::Int(_) => SemanticType::numerus(),
        LiteralValue::Float(_) => SemanticType::fractus(),
        LiteralValue::Str(_) => SemanticType::textus(),
        LiteralValue::True | LiteralValue::False => SemanticType::bivalens(),
        LiteralValue::Null => SemanticType::nihil(),
    }
}

fn convert_target_type(target: PrimitiveTarget) -> SemanticType {
    match target {
        PrimitiveTarget::Number => SemanticType::numerus(),
        PrimitiveTarget::Fraction => SemanticType::fractus(),
        PrimitiveTarget::Text => SemanticType::textus(),
        PrimitiveTarget::Boolean => SemanticType::bivalens(),
    }
}

const LOGICAL_OPS: &[&str] = &["&&", "||", "et", "aut", "==", "===", "!=", "!==", "<", ">", "<=", ">=", "inter", "intra"];

fn binary_type(op: &str, left: &SemanticType, right: &SemanticType) -> SemanticType {
    if op == "vel" {
        return left.clone();
    }
    if LOGICAL_OPS.contains(&op) {
        return SemanticType::bivalens();
    }
    if op == "+" && matches!(left, SemanticType::Textus { .. }) {
        return SemanticType::textus();
    }
    if left.is_numeric() && right.is_numeric() {
        if matches!(left, SemanticType::Fractus { .. }) || matches!(right, SemanticType::Fractus { .. }) {
            return SemanticType::fractus();
        }
        return SemanticType::numerus();
    }
    SemanticType::unknown()
}

fn unary_type(op: &str, operand: SemanticType) -> SemanticType {
    match op {
        // `non`, `nihil`, and `nonnihil` are the boolean-producing
        // unaries the parser emits (negation and the null-test pair);
        // `!` is reserved for non-null member/index assertions, which
        // are plain postfix flags rather than a unary operator here.
        "non" | "nihil" | "nonnihil" => SemanticType::bivalens(),
        _ => operand,
    }
}

fn lookup_nominal_type(name: &str, ctx: &SemaContext) -> Option<SemanticType> {
    ctx.classes
        .get(name)
        .or_else(|| ctx.enums.get(name))
        .or_else(|| ctx.unions.get(name))
        .or_else(|| ctx.interfaces.get(name))
        .cloned()
}

fn lookup_variant_type(name: &str, ctx: &SemaContext) -> Option<SemanticType> {
    ctx.unions.values().find_map(|u| match u {
        SemanticType::DiscriminatedUnion { variants, .. } => variants.get(name).cloned(),
        _ => None,
    })
}

fn call_type(callee: &Expr, ctx: &mut SemaContext, scope: &Scope) -> SemanticType {
    // `obj.name(...)` looks the method up on `obj`'s class directly
    // rather than through the generic member-access rule, since a bare
    // method name is not itself a value the surface language exposes.
    if let Expr::Member { object, property: PropertyKey::Name { name: method_name, .. }, .. } = callee {
        let object_ty = type_of_expr(object, ctx, scope);
        if let SemanticType::Class { name: class_name, .. } = &object_ty {
            if let Some(SemanticType::Class { fields, .. }) = ctx.classes.get(class_name) {
                if let Some(SemanticType::Function { ret, .. }) = fields.methods.get(method_name) {
                    return (**ret).clone();
                }
            }
        }
        return SemanticType::unknown();
    }

    let callee_ty = type_of_expr(callee, ctx, scope);
    match callee_ty {
        SemanticType::Function { ret, .. } => *ret,
        // A bare name registered as a class: constructor shorthand.
        class_ty @ SemanticType::Class { .. } => class_ty,
        _ => SemanticType::unknown(),
    }
}

fn member_type(object: &Expr, property: &PropertyKey, ctx: &mut SemaContext, scope: &Scope) -> SemanticType {
    let object_ty = type_of_expr(object, ctx, scope);
    match property {
        PropertyKey::Computed { expr, .. } => {
            type_of_expr(expr, ctx, scope);
            match object_ty {
                SemanticType::List { element, .. } => *element,
                SemanticType::Map { value, .. } => *value,
                SemanticType::Set { .. } => SemanticType::bivalens(),
                _ => SemanticType::unknown(),
            }
        }
        PropertyKey::Name { name, .. } => {
            if name == "longitudo" {
                return SemanticType::numerus();
            }
            if name == "primus" || name == "ultimus" {
                if let SemanticType::List { element, .. } = &object_ty {
                    return (**element).clone();
                }
                return SemanticType::unknown();
            }
            match &object_ty {
                SemanticType::Class { name: class_name, .. } => {
                    let fresh = ctx.classes.get(class_name).cloned().unwrap_or(object_ty.clone());
                    if let SemanticType::Class { fields, .. } = fresh {
                        if let Some(field_ty) = fields.fields.get(name) {
                            return field_ty.clone();
                        }
                        if let Some(method_ty) = fields.methods.get(name) {
                            return method_ty.clone();
                        }
                    }
                    SemanticType::unknown()
                }
                SemanticType::Enum { .. } => object_ty.clone(),
                SemanticType::Interface { methods, .. } => {
                    methods.get(name).cloned().unwrap_or_else(SemanticType::unknown)
                }
                _ => SemanticType::unknown(),
            }
        }
    }
}
