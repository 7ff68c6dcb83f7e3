//! Semantic types (spec §4.3 "Expression typing", and the "Semantic
//! types" paragraph preceding §4.4).
//!
//! Unlike the teacher's `snow_typeck::ty::Ty` (a Hindley-Milner type
//! representation with `ena`-backed unification variables), this is a
//! plain resolved-type sum: the analyzer never unifies or generalizes,
//! it only looks declared/inferred types up directly. Every variant
//! carries its own `nullable` flag rather than wrapping a shared one,
//! matching the spec's literal wording.

use std::rc::Rc;

use rustc_hash::FxHashMap;

/// A resolved semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    Textus { nullable: bool },
    Numerus { nullable: bool },
    Fractus { nullable: bool },
    Bivalens { nullable: bool },
    /// The type of the `nihil` literal itself.
    Nihil { nullable: bool },
    /// A function's declared-absent return type.
    Vacuum { nullable: bool },
    /// Anything the analyzer could not pin down: an unresolved
    /// identifier, an unannotated parameter, a failed lookup.
    Unknown { nullable: bool },
    List { element: Box<SemanticType>, nullable: bool },
    Map { key: Box<SemanticType>, value: Box<SemanticType>, nullable: bool },
    Set { element: Box<SemanticType>, nullable: bool },
    Function { params: Vec<SemanticType>, ret: Box<SemanticType>, nullable: bool },
    Class { name: String, fields: Rc<ClassShape>, nullable: bool },
    Enum { name: String, members: Rc<Vec<String>>, nullable: bool },
    DiscriminatedUnion { name: String, variants: Rc<FxHashMap<String, SemanticType>>, nullable: bool },
    Interface { name: String, methods: Rc<FxHashMap<String, SemanticType>>, nullable: bool },
    TypeParameter { name: String, nullable: bool },
    /// A nominal name the analyzer never resolved to a registered
    /// class/enum/union/interface -- kept rather than collapsed to
    /// `Unknown` so diagnostics can still name it.
    Unresolved { name: String, nullable: bool },
    Union { members: Vec<SemanticType>, nullable: bool },
}

/// The field and method tables of a `genus` declaration (and of the
/// anonymous record a `novum`/object-literal construction yields).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassShape {
    pub fields: FxHashMap<String, SemanticType>,
    /// Field names in declaration order -- needed to bind positional
    /// `discerne` pattern bindings to the right field (spec §4.3
    /// "bind each `binding` to the corresponding field type").
    pub field_order: Vec<String>,
    pub methods: FxHashMap<String, SemanticType>,
}

impl ClassShape {
    pub fn insert_field(&mut self, name: impl Into<String>, ty: SemanticType) {
        let name = name.into();
        self.field_order.push(name.clone());
        self.fields.insert(name, ty);
    }
}

impl SemanticType {
    pub fn nullable(&self) -> bool {
        match self {
            SemanticType::Textus { nullable }
            | SemanticType::Numerus { nullable }
            | SemanticType::Fractus { nullable }
            | SemanticType::Bivalens { nullable }
            | SemanticType::Nihil { nullable }
            | SemanticType::Vacuum { nullable }
            | SemanticType::Unknown { nullable }
            | SemanticType::List { nullable, .. }
            | SemanticType::Map { nullable, .. }
            | SemanticType::Set { nullable, .. }
            | SemanticType::Function { nullable, .. }
            | SemanticType::Class { nullable, .. }
            | SemanticType::Enum { nullable, .. }
            | SemanticType::DiscriminatedUnion { nullable, .. }
            | SemanticType::Interface { nullable, .. }
            | SemanticType::TypeParameter { nullable, .. }
            | SemanticType::Unresolved { nullable, .. }
            | SemanticType::Union { nullable, .. } => *nullable,
        }
    }

    /// Returns `self` with its `nullable` flag forced to `value`.
    pub fn with_nullable(self, value: bool) -> SemanticType {
        match self {
            SemanticType::Textus { .. } => SemanticType::Textus { nullable: value },
            SemanticType::Numerus { .. } => SemanticType::Numerus { nullable: value },
            SemanticType::Fractus { .. } => SemanticType::Fractus { nullable: value },
            SemanticType::Bivalens { .. } => SemanticType::Bivalens { nullable: value },
            SemanticType::Nihil { .. } => SemanticType::Nihil { nullable: value },
            SemanticType::Vacuum { .. } => SemanticType::Vacuum { nullable: value },
            SemanticType::Unknown { .. } => SemanticType::Unknown { nullable: value },
            SemanticType::List { element, .. } => SemanticType::List { element, nullable: value },
            SemanticType::Map { key, value: v, .. } => SemanticType::Map { key, value: v, nullable: value },
            SemanticType::Set { element, .. } => SemanticType::Set { element, nullable: value },
            SemanticType::Function { params, ret, .. } => SemanticType::Function { params, ret, nullable: value },
            SemanticType::Class { name, fields, .. } => SemanticType::Class { name, fields, nullable: value },
            SemanticType::Enum { name, members, .. } => SemanticType::Enum { name, members, nullable: value },
            SemanticType::DiscriminatedUnion { name, variants, .. } => {
                SemanticType::DiscriminatedUnion { name, variants, nullable: value }
            }
            SemanticType::Interface { name, methods, .. } => SemanticType::Interface { name, methods, nullable: value },
            SemanticType::TypeParameter { name, .. } => SemanticType::TypeParameter { name, nullable: value },
            SemanticType::Unresolved { name, .. } => SemanticType::Unresolved { name, nullable: value },
            SemanticType::Union { members, .. } => SemanticType::Union { members, nullable: value },
        }
    }

    pub fn unknown() -> SemanticType {
        SemanticType::Unknown { nullable: false }
    }

    pub fn numerus() -> SemanticType {
        SemanticType::Numerus { nullable: false }
    }

    pub fn fractus() -> SemanticType {
        SemanticType::Fractus { nullable: false }
    }

    pub fn textus() -> SemanticType {
        SemanticType::Textus { nullable: false }
    }

    pub fn bivalens() -> SemanticType {
        SemanticType::Bivalens { nullable: false }
    }

    pub fn vacuum() -> SemanticType {
        SemanticType::Vacuum { nullable: false }
    }

    pub fn nihil() -> SemanticType {
        SemanticType::Nihil { nullable: false }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, SemanticType::Numerus { .. } | SemanticType::Fractus { .. })
    }

    pub fn name_for_diagnostic(&self) -> String {
        match self {
            SemanticType::Textus { .. } => "textus".into(),
            SemanticType::Numerus { .. } => "numerus".into(),
            SemanticType::Fractus { .. } => "fractus".into(),
            SemanticType::Bivalens { .. } => "bivalens".into(),
            SemanticType::Nihil { .. } => "nihil".into(),
            SemanticType::Vacuum { .. } => "vacuum".into(),
            SemanticType::Unknown { .. } => "unknown".into(),
            SemanticType::List { element, .. } => format!("list<{}>", element.name_for_diagnostic()),
            SemanticType::Map { key, value, .. } => {
                format!("map<{}, {}>", key.name_for_diagnostic(), value.name_for_diagnostic())
            }
            SemanticType::Set { element, .. } => format!("set<{}>", element.name_for_diagnostic()),
            SemanticType::Function { .. } => "function".into(),
            SemanticType::Class { name, .. }
            | SemanticType::Enum { name, .. }
            | SemanticType::DiscriminatedUnion { name, .. }
            | SemanticType::Interface { name, .. }
            | SemanticType::TypeParameter { name, .. }
            | SemanticType::Unresolved { name, .. } => name.clone(),
            SemanticType::Union { members, .. } => members
                .iter()
                .map(SemanticType::name_for_diagnostic)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_is_independent_per_variant() {
        let a = SemanticType::Numerus { nullable: true };
        let b = SemanticType::Numerus { nullable: false };
        assert!(a.nullable());
        assert!(!b.nullable());
    }

    #[test]
    fn list_name_nests_element() {
        let ty = SemanticType::List { element: Box::new(SemanticType::textus()), nullable: false };
        assert_eq!(ty.name_for_diagnostic(), "list<textus>");
    }
}
