use serde::Serialize;

use fabula_common::Locus;

use super::expr::Expr;
use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VarKind {
    /// `varia`
    Mutable,
    /// `fixum`
    Const,
    /// `figendum`
    Frozen,
    /// `variandum`
    Rebindable,
}

/// Default visibility of class members is `Public` regardless of the
/// enclosing top-level `publica` annotation flag (spec §9 open question
/// b) -- preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForSpecies {
    /// `itera x in xs`
    In,
    /// `itera x de xs`
    De,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrintSeverity {
    /// `scribe`
    Info,
    /// `mussat`
    Debug,
    /// `cavet`
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub visibility: Visibility,
    pub default: Option<Expr>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceMethod {
    pub name: String,
    pub params: Vec<super::expr::Param>,
    pub ret: Option<Type>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Expr>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
    pub locus: Locus,
}

/// `elige`/`discerne` case body: either a brace block or a bare
/// `reddit expr` shorthand (spec §4.2).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum CaseBody {
    Block { statements: Vec<Stmt> },
    Return { expr: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub pattern: Expr,
    pub body: CaseBody,
    pub locus: Locus,
}

/// A `discerne` pattern: wildcard, bare variant, variant-with-alias, or
/// variant-with-field-bindings (spec §3, §4.2, GLOSSARY).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum Pattern {
    Wildcard { locus: Locus },
    Variant {
        name: String,
        alias: Option<String>,
        bindings: Vec<String>,
        locus: Locus,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCase {
    /// One pattern per scrutinee (multiple scrutinees -> tuple match).
    pub patterns: Vec<Pattern>,
    pub body: Vec<Stmt>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardClause {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Vec<Stmt>,
    pub locus: Locus,
}

/// A top-level statement or nested block-statement (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_type")]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
        locus: Locus,
    },
    Expr {
        expr: Expr,
        locus: Locus,
    },
    /// A statement with no content: `tacet`, or a discarded `§ sectio
    /// "name"` directive (spec §4.2).
    Empty {
        locus: Locus,
    },
    VarDecl {
        name: String,
        kind: VarKind,
        ty: Option<Type>,
        init: Option<Expr>,
        visibility: Visibility,
        is_extern: bool,
        locus: Locus,
    },
    FunctionDecl {
        name: String,
        params: Vec<super::expr::Param>,
        ret: Option<Type>,
        body: Option<Vec<Stmt>>,
        is_async: bool,
        generics: Vec<String>,
        visibility: Visibility,
        is_extern: bool,
        is_abstract: bool,
        locus: Locus,
    },
    ClassDecl {
        name: String,
        generics: Vec<String>,
        fields: Vec<FieldDecl>,
        methods: Vec<Stmt>,
        interfaces: Vec<String>,
        is_abstract: bool,
        visibility: Visibility,
        locus: Locus,
    },
    InterfaceDecl {
        name: String,
        generics: Vec<String>,
        methods: Vec<InterfaceMethod>,
        visibility: Visibility,
        locus: Locus,
    },
    EnumDecl {
        name: String,
        members: Vec<EnumMember>,
        visibility: Visibility,
        locus: Locus,
    },
    UnionDecl {
        name: String,
        variants: Vec<VariantDecl>,
        visibility: Visibility,
        locus: Locus,
    },
    Import {
        path: String,
        total: bool,
        alias: Option<String>,
        names: Vec<ImportName>,
        locus: Locus,
    },
    TypeAlias {
        name: String,
        target: Type,
        visibility: Visibility,
        locus: Locus,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        locus: Locus,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        locus: Locus,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        locus: Locus,
    },
    For {
        binding: String,
        iterator: Expr,
        body: Box<Stmt>,
        species: ForSpecies,
        is_async: bool,
        locus: Locus,
    },
    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
        default: Option<CaseBody>,
        locus: Locus,
    },
    Match {
        scrutinees: Vec<Expr>,
        cases: Vec<MatchCase>,
        locus: Locus,
    },
    Guard {
        clauses: Vec<GuardClause>,
        locus: Locus,
    },
    Try {
        block: Box<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Box<Stmt>>,
        locus: Locus,
    },
    Return {
        value: Option<Expr>,
        locus: Locus,
    },
    Throw {
        value: Expr,
        fatal: bool,
        locus: Locus,
    },
    Print {
        value: Expr,
        severity: PrintSeverity,
        locus: Locus,
    },
    Assert {
        cond: Expr,
        message: Option<Expr>,
        locus: Locus,
    },
    Break {
        locus: Locus,
    },
    Continue {
        locus: Locus,
    },
    EntryPoint {
        body: Vec<Stmt>,
        is_async: bool,
        locus: Locus,
    },
    TestSuite {
        name: String,
        body: Vec<Stmt>,
        locus: Locus,
    },
    TestCase {
        name: String,
        body: Vec<Stmt>,
        locus: Locus,
    },
}

impl Stmt {
    pub fn locus(&self) -> Locus {
        match self {
            Stmt::Block { locus, .. }
            | Stmt::Expr { locus, .. }
            | Stmt::Empty { locus }
            | Stmt::VarDecl { locus, .. }
            | Stmt::FunctionDecl { locus, .. }
            | Stmt::ClassDecl { locus, .. }
            | Stmt::InterfaceDecl { locus, .. }
            | Stmt::EnumDecl { locus, .. }
            | Stmt::UnionDecl { locus, .. }
            | Stmt::Import { locus, .. }
            | Stmt::TypeAlias { locus, .. }
            | Stmt::If { locus, .. }
            | Stmt::While { locus, .. }
            | Stmt::DoWhile { locus, .. }
            | Stmt::For { locus, .. }
            | Stmt::Switch { locus, .. }
            | Stmt::Match { locus, .. }
            | Stmt::Guard { locus, .. }
            | Stmt::Try { locus, .. }
            | Stmt::Return { locus, .. }
            | Stmt::Throw { locus, .. }
            | Stmt::Print { locus, .. }
            | Stmt::Assert { locus, .. }
            | Stmt::Break { locus }
            | Stmt::Continue { locus }
            | Stmt::EntryPoint { locus, .. }
            | Stmt::TestSuite { locus, .. }
            | Stmt::TestCase { locus, .. } => *locus,
        }
    }
}

/// A compilation unit: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub statements: Vec<Stmt>,
}
