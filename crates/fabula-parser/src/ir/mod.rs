pub mod expr;
pub mod stmt;
pub mod types;

pub use expr::{
    Expr, LambdaBody, LiteralValue, ObjectProperty, Param, PrimitiveTarget, PropertyKey,
    TypeAssertKind,
};
pub use stmt::{
    CaseBody, CatchClause, EnumMember, FieldDecl, ForSpecies, GuardClause, ImportName,
    InterfaceMethod, MatchCase, Module, Pattern, PrintSeverity, Stmt, SwitchCase, VarKind,
    VariantDecl, Visibility,
};
pub use types::Type;
