//! Resolves a surface [`fabula_parser::Type`] annotation to a
//! [`SemanticType`] (spec §4.3 Phase 1: "Fields and method
//! return/parameter types are resolved against the global scope").
//!
//! The surface spellings for the three parameterized collections
//! (`list<T>`, `map<K,V>`, `set<T>` in the glossary's semantic-type
//! vocabulary) aren't given a concrete keyword anywhere in the data
//! model -- `Copia<T>`, `Tabula<K,V>`, `Congeries<T>` are this
//! implementation's choice, recorded in DESIGN.md.

use fabula_parser::{LiteralValue, Type};

use crate::context::SemaContext;
use crate::types::SemanticType;

pub fn resolve_type(ty: &Type, ctx: &SemaContext) -> SemanticType {
    match ty {
        Type::Named { name, .. } => resolve_named(name, ctx),
        Type::Nullable { inner, .. } => resolve_type(inner, ctx).with_nullable(true),
        Type::Generic { name, args, .. } => resolve_generic(name, args, ctx),
        Type::Function { params, ret, .. } => SemanticType::Function {
            params: params.iter().map(|p| resolve_type(p, ctx)).collect(),
            ret: Box::new(resolve_type(ret, ctx)),
            nullable: false,
        },
        Type::Union { members, .. } => SemanticType::Union {
            members: members.iter().map(|m| resolve_type(m, ctx)).collect(),
            nullable: false,
        },
        Type::Literal { value, .. } => resolve_literal_type(value),
    }
}

fn resolve_named(name: &str, ctx: &SemaContext) -> SemanticType {
    match name {
        "textus" => SemanticType::textus(),
        "numerus" => SemanticType::numerus(),
        "fractus" => SemanticType::fractus(),
        "bivalens" => SemanticType::bivalens(),
        "vacuum" => SemanticType::vacuum(),
        "nihil" => SemanticType::nihil(),
        _ => lookup_nominal(name, ctx),
    }
}

fn lookup_nominal(name: &str, ctx: &SemaContext) -> SemanticType {
    if let Some(ty) = ctx.classes.get(name) {
        return ty.clone();
    }
    if let Some(ty) = ctx.enums.get(name) {
        return ty.clone();
    }
    if let Some(ty) = ctx.unions.get(name) {
        return ty.clone();
    }
    if let Some(ty) = ctx.interfaces.get(name) {
        return ty.clone();
    }
    if let Some(ty) = ctx.type_aliases.get(name) {
        return ty.clone();
    }
    SemanticType::Unresolved { name: name.to_string(), nullable: false }
}

fn resolve_generic(name: &str, args: &[Type], ctx: &SemaContext) -> SemanticType {
    match (name, args) {
        ("Copia", [element]) => {
            SemanticType::List { element: Box::new(resolve_type(element, ctx)), nullable: false }
        }
        ("Tabula", [key, value]) => SemanticType::Map {
            key: Box::new(resolve_type(key, ctx)),
            value: Box::new(resolve_type(value, ctx)),
            nullable: false,
        },
        ("Congeries", [element]) => {
            SemanticType::Set { element: Box::new(resolve_type(element, ctx)), nullable: false }
        }
        // A user-declared generic class/interface: the registry entry
        // already carries its unparameterized field/method shape; the
        // analyzer does not instantiate per call site.
        _ => lookup_nominal(name, ctx),
    }
}

fn resolve_literal_type(value: &LiteralValue) -> SemanticType {
    match value {
        LiteralValue::Int(_) => SemanticType::numerus(),
        LiteralValue::Float(_) => SemanticType::fractus(),
        LiteralValue::Str(_) => SemanticType::textus(),
        LiteralValue::True | LiteralValue::False => SemanticType::bivalens(),
        LiteralValue::Null => SemanticType::nihil(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_common::Locus;

    fn locus() -> Locus {
        Locus::start()
    }

    #[test]
    fn resolves_primitives() {
        let ctx = SemaContext::new();
        assert_eq!(resolve_type(&Type::named("numerus", locus()), &ctx), SemanticType::numerus());
        assert_eq!(resolve_type(&Type::named("textus", locus()), &ctx), SemanticType::textus());
    }

    #[test]
    fn resolves_nullable() {
        let ctx = SemaContext::new();
        let ty = Type::Nullable { inner: Box::new(Type::named("numerus", locus())), locus: locus() };
        assert!(resolve_type(&ty, &ctx).nullable());
    }

    #[test]
    fn resolves_list_generic() {
        let ctx = SemaContext::new();
        let ty = Type::Generic { name: "Copia".into(), args: vec![Type::named("textus", locus())], locus: locus() };
        match resolve_type(&ty, &ctx) {
            SemanticType::List { element, .. } => assert_eq!(*element, SemanticType::textus()),
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_nominal_keeps_name() {
        let ctx = SemaContext::new();
        let ty = resolve_type(&Type::named("Nonexistent", locus()), &ctx);
        assert!(matches!(ty, SemanticType::Unresolved { name, .. } if name == "Nonexistent"));
    }
}
