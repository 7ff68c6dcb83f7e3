//! Phase 1 -- declaration collection (spec §4.3).
//!
//! Registers every top-level class, enum, discriminated union,
//! interface, and non-extern function into its registry and as a
//! symbol in the global scope, resolving field/method types against a
//! global scope that is progressively filled in -- so forward
//! references between top-level declarations resolve regardless of
//! declaration order.
//!
//! Classes/interfaces/unions are registered twice: an empty-shape stub
//! first (so sibling declarations can resolve the *name*), then the
//! real shape once every field/method type has been resolved. Phase 2
//! always re-reads a class's shape from the registry by name rather
//! than trusting a shape captured inside another declaration's field,
//! so this two-pass wrinkle never leaks a stale stub into body
//! analysis.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use fabula_parser::{Module, Param, Stmt};

use crate::context::SemaContext;
use crate::resolve::resolve_type;
use crate::scope::{Symbol, SymbolKind};
use crate::types::{ClassShape, SemanticType};

pub fn collect(module: &Module, ctx: &mut SemaContext) {
    stub_pass(module, ctx);
    body_pass(module, ctx);
}

fn stub_pass(module: &Module, ctx: &mut SemaContext) {
    for stmt in &module.statements {
        match stmt {
            Stmt::ClassDecl { name, .. } => {
                ctx.classes.insert(
                    name.clone(),
                    SemanticType::Class { name: name.clone(), fields: Rc::new(ClassShape::default()), nullable: false },
                );
            }
            Stmt::InterfaceDecl { name, .. } => {
                ctx.interfaces.insert(
                    name.clone(),
                    SemanticType::Interface { name: name.clone(), methods: Rc::new(FxHashMap::default()), nullable: false },
                );
            }
            Stmt::UnionDecl { name, .. } => {
                ctx.unions.insert(
                    name.clone(),
                    SemanticType::DiscriminatedUnion {
                        name: name.clone(),
                        variants: Rc::new(FxHashMap::default()),
                        nullable: false,
                    },
                );
            }
            Stmt::TypeAlias { name, .. } => {
                ctx.type_aliases.insert(name.clone(), SemanticType::Unresolved { name: name.clone(), nullable: false });
            }
            _ => {}
        }
    }
}

fn param_types(params: &[Param], ctx: &SemaContext) -> Vec<SemanticType> {
    params
        .iter()
        .map(|p| {
            let base = p.ty.as_ref().map(|t| resolve_type(t, ctx)).unwrap_or_else(SemanticType::unknown);
            if p.optional {
                base.with_nullable(true)
            } else {
                base
            }
        })
        .collect()
}

fn function_symbol_type(params: &[Param], ret: &Option<fabula_parser::Type>, ctx: &SemaContext) -> SemanticType {
    let params = param_types(params, ctx);
    let ret = ret.as_ref().map(|t| resolve_type(t, ctx)).unwrap_or_else(SemanticType::vacuum);
    SemanticType::Function { params, ret: Box::new(ret), nullable: false }
}

fn body_pass(module: &Module, ctx: &mut SemaContext) {
    for stmt in &module.statements {
        match stmt {
            Stmt::ClassDecl { name, fields, methods, locus, .. } => {
                let mut shape = ClassShape::default();
                for field in fields {
                    shape.insert_field(field.name.clone(), resolve_type(&field.ty, ctx));
                }
                for method in methods {
                    if let Stmt::FunctionDecl { name: mname, params, ret, .. } = method {
                        shape.methods.insert(mname.clone(), function_symbol_type(params, ret, ctx));
                    }
                }
                let ty = SemanticType::Class { name: name.clone(), fields: Rc::new(shape), nullable: false };
                ctx.classes.insert(name.clone(), ty.clone());
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::Class, ty, false, *locus));
            }
            Stmt::InterfaceDecl { name, methods, locus, .. } => {
                let mut table = FxHashMap::default();
                for method in methods {
                    table.insert(method.name.clone(), function_symbol_type(&method.params, &method.ret, ctx));
                }
                let ty = SemanticType::Interface { name: name.clone(), methods: Rc::new(table), nullable: false };
                ctx.interfaces.insert(name.clone(), ty.clone());
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::Interface, ty, false, *locus));
            }
            Stmt::EnumDecl { name, members, locus, .. } => {
                let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
                let ty = SemanticType::Enum { name: name.clone(), members: Rc::new(names), nullable: false };
                ctx.enums.insert(name.clone(), ty.clone());
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::Enum, ty, false, *locus));
            }
            Stmt::UnionDecl { name, variants, locus, .. } => {
                let mut table = FxHashMap::default();
                for variant in variants {
                    let mut shape = ClassShape::default();
                    for field in &variant.fields {
                        shape.insert_field(field.name.clone(), resolve_type(&field.ty, ctx));
                    }
                    let variant_ty =
                        SemanticType::Class { name: variant.name.clone(), fields: Rc::new(shape), nullable: false };
                    table.insert(variant.name.clone(), variant_ty.clone());
                    ctx.global.define(Symbol::new(
                        variant.name.clone(),
                        SymbolKind::Variant,
                        variant_ty,
                        false,
                        variant.locus,
                    ));
                }
                let ty =
                    SemanticType::DiscriminatedUnion { name: name.clone(), variants: Rc::new(table), nullable: false };
                ctx.unions.insert(name.clone(), ty.clone());
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::DiscriminatedUnion, ty, false, *locus));
            }
            Stmt::TypeAlias { name, target, locus, .. } => {
                let ty = resolve_type(target, ctx);
                ctx.type_aliases.insert(name.clone(), ty.clone());
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::Type, ty, false, *locus));
            }
            Stmt::FunctionDecl { name, params, ret, is_extern, locus, .. } => {
                if *is_extern {
                    continue;
                }
                let ty = function_symbol_type(params, ret, ctx);
                ctx.global.define(Symbol::new(name.clone(), SymbolKind::Function, ty, false, *locus));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_common::Locus;
    use fabula_parser::{FieldDecl, Visibility};

    fn locus() -> Locus {
        Locus::start()
    }

    #[test]
    fn registers_class_fields() {
        let module = Module {
            statements: vec![Stmt::ClassDecl {
                name: "Persona".into(),
                generics: vec![],
                fields: vec![FieldDecl {
                    name: "nomen".into(),
                    ty: fabula_parser::Type::named("textus", locus()),
                    visibility: Visibility::Public,
                    default: None,
                    locus: locus(),
                }],
                methods: vec![],
                interfaces: vec![],
                is_abstract: false,
                visibility: Visibility::Public,
                locus: locus(),
            }],
        };
        let mut ctx = SemaContext::new();
        collect(&module, &mut ctx);
        match ctx.classes.get("Persona").unwrap() {
            SemanticType::Class { fields, .. } => {
                assert_eq!(fields.fields.get("nomen"), Some(&SemanticType::textus()));
            }
            other => panic!("expected Class, got {other:?}"),
        }
        assert!(ctx.global.lookup("Persona").is_some());
    }

    #[test]
    fn forward_reference_between_classes_resolves() {
        let module = Module {
            statements: vec![
                Stmt::ClassDecl {
                    name: "A".into(),
                    generics: vec![],
                    fields: vec![FieldDecl {
                        name: "b".into(),
                        ty: fabula_parser::Type::named("B", locus()),
                        visibility: Visibility::Public,
                        default: None,
                        locus: locus(),
                    }],
                    methods: vec![],
                    interfaces: vec![],
                    is_abstract: false,
                    visibility: Visibility::Public,
                    locus: locus(),
                },
                Stmt::ClassDecl {
                    name: "B".into(),
                    generics: vec![],
                    fields: vec![],
                    methods: vec![],
                    interfaces: vec![],
                    is_abstract: false,
                    visibility: Visibility::Public,
                    locus: locus(),
                },
            ],
        };
        let mut ctx = SemaContext::new();
        collect(&module, &mut ctx);
        match ctx.classes.get("A").unwrap() {
            SemanticType::Class { fields, .. } => {
                assert!(matches!(fields.fields.get("b"), Some(SemanticType::Class { name, .. }) if name == "B"));
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn skips_extern_functions() {
        let module = Module {
            statements: vec![Stmt::FunctionDecl {
                name: "foo".into(),
                params: vec![],
                ret: None,
                body: None,
                is_async: false,
                generics: vec![],
                visibility: Visibility::Public,
                is_extern: true,
                is_abstract: false,
                locus: locus(),
            }],
        };
        let mut ctx = SemaContext::new();
        collect(&module, &mut ctx);
        assert!(ctx.global.lookup("foo").is_none());
    }
}
