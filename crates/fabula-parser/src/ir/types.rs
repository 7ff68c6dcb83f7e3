use serde::Serialize;

use fabula_common::Locus;

use super::expr::LiteralValue;

/// Surface-level type annotation, as written by the programmer.
///
/// This is a recursive sum (spec §3); nodes are acyclic trees by
/// construction at parse time -- nominal cycles (a class referring to
/// itself) are only ever resolved by name in the semantic analyzer, not
/// represented structurally here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum Type {
    Named {
        name: String,
        locus: Locus,
    },
    Generic {
        name: String,
        args: Vec<Type>,
        locus: Locus,
    },
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
        locus: Locus,
    },
    Nullable {
        inner: Box<Type>,
        locus: Locus,
    },
    Union {
        members: Vec<Type>,
        locus: Locus,
    },
    Literal {
        value: LiteralValue,
        locus: Locus,
    },
}

impl Type {
    pub fn locus(&self) -> Locus {
        match self {
            Type::Named { locus, .. }
            | Type::Generic { locus, .. }
            | Type::Function { locus, .. }
            | Type::Nullable { locus, .. }
            | Type::Union { locus, .. }
            | Type::Literal { locus, .. } => *locus,
        }
    }

    pub fn named(name: impl Into<String>, locus: Locus) -> Type {
        Type::Named { name: name.into(), locus }
    }
}
