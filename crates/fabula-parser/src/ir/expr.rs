use serde::Serialize;

use fabula_common::Locus;

use super::stmt::Stmt;
use super::types::Type;

/// The value carried by a literal expression node, and by a type node
/// that uses a literal as its annotation (spec §3: "Literal (string/number
/// used as a type)").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "species")]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,
    Null,
}

/// Either a plain named property/member (`.name`) or a computed one
/// (`[expr]`). Folding the spec's separate "computed-index flag" into
/// the key's own shape avoids a key/flag pair that could disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum PropertyKey {
    Name { name: String, locus: Locus },
    Computed { expr: Box<Expr>, locus: Locus },
}

impl PropertyKey {
    pub fn locus(&self) -> Locus {
        match self {
            PropertyKey::Name { locus, .. } | PropertyKey::Computed { locus, .. } => *locus,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyKey::Computed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Expr,
    pub shorthand: bool,
    pub locus: Locus,
}

/// A lambda's body: either a brace-delimited statement block or a
/// single bare expression (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum LambdaBody {
    Block { statements: Vec<Stmt> },
    Expr { expr: Box<Expr> },
}

/// A parameter in a function/lambda parameter list (spec §4.2
/// "Parameter lists").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<Type>,
    /// `ceteri` -- rest parameter.
    pub rest: bool,
    /// `si` -- optional; wraps the declared type in `Nullable`.
    pub optional: bool,
    /// One of `ex`/`de`/`in`, retained as an informational string.
    pub ownership: Option<String>,
    pub default: Option<Expr>,
    pub locus: Locus,
}

/// The three postfix type-assertion spellings (spec §4.2 point 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeAssertKind {
    /// `qua T` -- assume type T.
    As,
    /// `innatum T` -- assume T is the runtime type.
    Is,
    /// `T novum` (postfix `novum`) -- construct-cast.
    ConstructCast,
}

/// The four numeratum/fractatum/textatum/bivalentum conversions (spec
/// §3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimitiveTarget {
    Number,
    Fraction,
    Text,
    Boolean,
}

impl PrimitiveTarget {
    /// Whether this conversion accepts a `vel fallback` expression
    /// (spec §4.2: "each of the two numeric ones allowing `vel
    /// fallback`").
    pub fn allows_fallback(self) -> bool {
        matches!(self, PrimitiveTarget::Number | PrimitiveTarget::Fraction)
    }
}

/// An expression node (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum Expr {
    Identifier {
        name: String,
        locus: Locus,
    },
    /// `ego` -- self-reference.
    SelfRef {
        locus: Locus,
    },
    Literal {
        value: LiteralValue,
        locus: Locus,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        locus: Locus,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
        locus: Locus,
    },
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
        locus: Locus,
    },
    Ternary {
        cond: Box<Expr>,
        consequent: Box<Expr>,
        alternative: Box<Expr>,
        locus: Locus,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        locus: Locus,
    },
    Member {
        object: Box<Expr>,
        property: PropertyKey,
        /// `!.`/`![` -- non-null assertion on the access.
        non_null: bool,
        locus: Locus,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        locus: Locus,
    },
    ObjectLiteral {
        properties: Vec<ObjectProperty>,
        locus: Locus,
    },
    Lambda {
        params: Vec<Param>,
        body: LambdaBody,
        is_async: bool,
        locus: Locus,
    },
    /// `novum Callee(args) { init }`.
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
        init: Option<Vec<ObjectProperty>>,
        locus: Locus,
    },
    Await {
        operand: Box<Expr>,
        locus: Locus,
    },
    TypeAssert {
        operand: Box<Expr>,
        target: Type,
        kind: TypeAssertKind,
        locus: Locus,
    },
    /// `finge Variant { field: expr, … } [qua T]`.
    VariantConstruct {
        variant: String,
        fields: Vec<ObjectProperty>,
        type_hint: Option<Type>,
        locus: Locus,
    },
    /// `scriptum("template § …", args…)`.
    Template {
        format: String,
        args: Vec<Expr>,
        locus: Locus,
    },
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        inclusive: bool,
        locus: Locus,
    },
    Convert {
        operand: Box<Expr>,
        target: PrimitiveTarget,
        fallback: Option<Box<Expr>>,
        locus: Locus,
    },
}

impl Expr {
    pub fn locus(&self) -> Locus {
        match self {
            Expr::Identifier { locus, .. }
            | Expr::SelfRef { locus }
            | Expr::Literal { locus, .. }
            | Expr::Binary { locus, .. }
            | Expr::Unary { locus, .. }
            | Expr::Assign { locus, .. }
            | Expr::Ternary { locus, .. }
            | Expr::Call { locus, .. }
            | Expr::Member { locus, .. }
            | Expr::ArrayLiteral { locus, .. }
            | Expr::ObjectLiteral { locus, .. }
            | Expr::Lambda { locus, .. }
            | Expr::New { locus, .. }
            | Expr::Await { locus, .. }
            | Expr::TypeAssert { locus, .. }
            | Expr::VariantConstruct { locus, .. }
            | Expr::Template { locus, .. }
            | Expr::Range { locus, .. }
            | Expr::Convert { locus, .. } => *locus,
        }
    }
}
