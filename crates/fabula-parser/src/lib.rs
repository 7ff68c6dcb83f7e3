//! IR and recursive-descent parser for the Fabula surface language.
//!
//! `parse` turns the filtered token stream `fabula_lexer::prepare`
//! produces into a [`Module`] -- the typed tree every other crate
//! (semantic analysis, formatting, lowering) walks.

mod error;
mod ir;
mod parser;

pub use error::ParseError;
pub use ir::{
    CaseBody, CatchClause, EnumMember, Expr, FieldDecl, ForSpecies, GuardClause, ImportName,
    InterfaceMethod, LambdaBody, LiteralValue, MatchCase, Module, ObjectProperty, Param, Pattern,
    PrimitiveTarget, PrintSeverity, PropertyKey, Stmt, SwitchCase, Type, TypeAssertKind, VarKind,
    VariantDecl, Visibility,
};
pub use parser::parse;
