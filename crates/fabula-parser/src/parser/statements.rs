//! Statement and declaration grammar (spec §4.2).

use fabula_lexer::Tag;

use crate::error::ParseError;
use crate::ir::{
    CaseBody, CatchClause, EnumMember, Expr, FieldDecl, ForSpecies, GuardClause, ImportName,
    InterfaceMethod, LiteralValue, MatchCase, Pattern, PrintSeverity, Stmt, SwitchCase, VarKind,
    VariantDecl, Visibility,
};

use super::expressions::{self, parse_expr};
use super::patterns;
use super::types;
use super::{is_statement_keyword, Decorators, Parser};

/// Parses one statement, including any leading `@annotation` decorators
/// and `§ directive`. This is the single entry point used for top-level
/// statements, block members, and (via `parse_body`) control-flow
/// bodies -- a body is just another statement position.
pub(crate) fn parse_any_stmt(p: &mut Parser) -> Result<Stmt, ParseError> {
    let decorators = super::parse_decorators(p)?;
    if p.check_punct("§") {
        if let Some(stmt) = parse_directive(p)? {
            return Ok(stmt);
        }
    }
    parse_stmt(p, decorators)
}

pub(crate) fn parse_block_stmts(p: &mut Parser) -> Result<Vec<Stmt>, ParseError> {
    let mut stmts = Vec::new();
    while !p.check_punct("}") && !p.is_eof() {
        stmts.push(parse_any_stmt(p)?);
    }
    Ok(stmts)
}

fn visibility_from_decorators(decorators: &Decorators) -> Visibility {
    if decorators.privata {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

/// The body of a control-flow statement: a brace block, an `ergo STMT`
/// single-statement shorthand, or a bare short-form statement
/// (`reddit`/`iacit`/`moritor`/`tacet`, spec §4.2).
fn parse_body(p: &mut Parser) -> Result<Stmt, ParseError> {
    if p.check_punct("{") {
        let locus = p.locus();
        p.advance();
        let statements = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::Block { statements, locus });
    }
    p.match_kw("ergo");
    parse_any_stmt(p)
}

/// After a return/throw/print keyword, expression parsing stops when
/// the next token is EOF, `}`, or a statement-introducing keyword
/// (spec §4.2 "Return-expression delimiting").
fn parse_optional_trailing_expr(p: &mut Parser) -> Result<Option<Expr>, ParseError> {
    if p.is_eof() || p.check_punct("}") || (p.check(Tag::Keyword) && is_statement_keyword(&p.current().lexeme)) {
        Ok(None)
    } else {
        Ok(Some(parse_expr(p)?))
    }
}

pub(crate) fn parse_stmt(p: &mut Parser, decorators: Decorators) -> Result<Stmt, ParseError> {
    if p.check_kw("varia") || p.check_kw("fixum") || p.check_kw("figendum") || p.check_kw("variandum") {
        return parse_var_decl(p, &decorators);
    }

    if p.match_kw("abstractus") {
        if p.check_kw("genus") {
            return parse_class_decl(p, &decorators, true);
        }
        if p.check_kw("functio") {
            return parse_function_decl(p, &decorators, true, false);
        }
        return Err(ParseError::new("expected `genus` or `functio` after `abstractus`", p.locus()));
    }

    if p.match_kw("asynca") {
        if p.check_kw("functio") {
            return parse_function_decl(p, &decorators, false, true);
        }
        if p.check_kw("itera") {
            return parse_for(p, true);
        }
        return Err(ParseError::new("expected `functio` or `itera` after `asynca`", p.locus()));
    }

    if p.check_kw("functio") {
        return parse_function_decl(p, &decorators, false, false);
    }
    if p.check_kw("genus") {
        return parse_class_decl(p, &decorators, false);
    }
    if p.check_kw("pactum") {
        return parse_interface_decl(p, &decorators);
    }
    if p.check_kw("ordo") {
        return parse_enum_decl(p, &decorators);
    }
    if p.check_kw("discretio") {
        return parse_union_decl(p, &decorators);
    }
    if p.check_kw("idem") {
        return parse_type_alias(p, &decorators);
    }

    if p.check_kw("si") {
        return parse_if(p);
    }
    if p.check_kw("dum") {
        return parse_while(p);
    }
    if p.check_kw("fac") {
        return parse_do_while(p);
    }
    if p.check_kw("itera") {
        return parse_for(p, false);
    }
    if p.check_kw("elige") {
        return parse_switch(p);
    }
    if p.check_kw("discerne") {
        return parse_match(p);
    }
    if p.check_kw("custodi") {
        return parse_guard(p);
    }
    if p.check_kw("tempta") {
        return parse_try(p);
    }

    if p.check_kw("reddit") {
        let locus = p.advance().locus;
        let value = parse_optional_trailing_expr(p)?;
        return Ok(Stmt::Return { value, locus });
    }
    if p.check_kw("iacit") {
        let locus = p.advance().locus;
        let value = parse_optional_trailing_expr(p)?.unwrap_or(Expr::Literal { value: LiteralValue::Null, locus });
        return Ok(Stmt::Throw { value, fatal: false, locus });
    }
    if p.check_kw("moritor") {
        let locus = p.advance().locus;
        let value = parse_optional_trailing_expr(p)?.unwrap_or(Expr::Literal { value: LiteralValue::Null, locus });
        return Ok(Stmt::Throw { value, fatal: true, locus });
    }
    if p.check_kw("tacet") {
        let locus = p.advance().locus;
        return Ok(Stmt::Empty { locus });
    }
    if p.check_kw("rumpe") {
        let locus = p.advance().locus;
        return Ok(Stmt::Break { locus });
    }
    if p.check_kw("perge") {
        let locus = p.advance().locus;
        return Ok(Stmt::Continue { locus });
    }

    if p.check_kw("scribe") {
        return parse_print(p, PrintSeverity::Info);
    }
    if p.check_kw("mussat") {
        return parse_print(p, PrintSeverity::Debug);
    }
    if p.check_kw("cavet") {
        return parse_print(p, PrintSeverity::Warn);
    }
    if p.check_kw("confirma") {
        return parse_assert(p);
    }

    if p.check_kw("incipit") {
        let locus = p.advance().locus;
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::EntryPoint { body, is_async: false, locus });
    }
    if p.check_kw("incipiet") {
        let locus = p.advance().locus;
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::EntryPoint { body, is_async: true, locus });
    }
    if p.check_kw("probandum") {
        let locus = p.advance().locus;
        let name_tok = p.expect(Tag::String, "a string literal")?;
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::TestSuite { name: name_tok.lexeme, body, locus });
    }
    if p.check_kw("proba") {
        let locus = p.advance().locus;
        let name_tok = p.expect(Tag::String, "a string literal")?;
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::TestCase { name: name_tok.lexeme, body, locus });
    }

    if p.check_punct("{") {
        let locus = p.locus();
        p.advance();
        let statements = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        return Ok(Stmt::Block { statements, locus });
    }

    let locus = p.locus();
    let expr = parse_expr(p)?;
    Ok(Stmt::Expr { expr, locus })
}

fn parse_var_decl(p: &mut Parser, decorators: &Decorators) -> Result<Stmt, ParseError> {
    let locus = p.locus();
    let kind_tok = p.advance();
    let kind = match kind_tok.lexeme.as_str() {
        "varia" => VarKind::Mutable,
        "fixum" => VarKind::Const,
        "figendum" => VarKind::Frozen,
        "variandum" => VarKind::Rebindable,
        other => return Err(ParseError::new(format!("unexpected variable-declaration keyword `{other}`"), locus)),
    };
    let (ty, name, _) = expressions::parse_leading_type_and_name(p)?;
    let init = if p.match_op("=") { Some(parse_expr(p)?) } else { None };
    Ok(Stmt::VarDecl {
        name,
        kind,
        ty,
        init,
        visibility: visibility_from_decorators(decorators),
        is_extern: decorators.externa,
        locus,
    })
}

fn parse_function_decl(
    p: &mut Parser,
    decorators: &Decorators,
    is_abstract: bool,
    is_async: bool,
) -> Result<Stmt, ParseError> {
    parse_function_decl_inner(p, visibility_from_decorators(decorators), decorators.externa, is_abstract, is_async)
}

fn parse_function_decl_inner(
    p: &mut Parser,
    visibility: Visibility,
    is_extern: bool,
    is_abstract: bool,
    is_async: bool,
) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("functio")?.locus;
    let (name, _) = p.expect_name()?;
    let generics = parse_optional_generics(p)?;
    p.expect_punct("(")?;
    let mut params = Vec::new();
    if !p.check_punct(")") {
        params.push(expressions::parse_param(p)?);
        while p.match_punct(",") {
            params.push(expressions::parse_param(p)?);
        }
    }
    p.expect_punct(")")?;
    let ret = if p.match_op("->") { Some(types::parse_type(p)?) } else { None };
    let body = if is_extern || is_abstract {
        None
    } else {
        p.expect_punct("{")?;
        let stmts = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        Some(stmts)
    };
    Ok(Stmt::FunctionDecl { name, params, ret, body, is_async, generics, visibility, is_extern, is_abstract, locus })
}

fn parse_optional_generics(p: &mut Parser) -> Result<Vec<String>, ParseError> {
    let mut generics = Vec::new();
    if p.check_op("<") {
        p.advance();
        generics.push(p.expect_name()?.0);
        while p.match_punct(",") {
            generics.push(p.expect_name()?.0);
        }
        p.expect_op(">")?;
    }
    Ok(generics)
}

fn parse_class_decl(p: &mut Parser, decorators: &Decorators, is_abstract: bool) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("genus")?.locus;
    let (name, _) = p.expect_name()?;
    let generics = parse_optional_generics(p)?;

    let mut interfaces = Vec::new();
    if p.match_kw("pactum") {
        interfaces.push(p.expect_name()?.0);
        while p.match_punct(",") {
            interfaces.push(p.expect_name()?.0);
        }
    }

    p.expect_punct("{")?;
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    while !p.check_punct("}") {
        let member_locus = p.locus();
        let member_vis = if p.match_kw("privata") {
            Visibility::Private
        } else if p.match_kw("protecta") {
            Visibility::Protected
        } else {
            Visibility::Public
        };
        let member_abstract = p.match_kw("abstractus");
        let member_async = p.match_kw("asynca");

        if p.check_kw("functio") {
            methods.push(parse_function_decl_inner(p, member_vis, false, member_abstract, member_async)?);
        } else {
            let (ty, fname, _) = expressions::parse_leading_type_and_name(p)?;
            let ty = ty.ok_or_else(|| ParseError::new("class field requires an explicit type", member_locus))?;
            let default = if p.match_op("=") { Some(parse_expr(p)?) } else { None };
            fields.push(FieldDecl { name: fname, ty, visibility: member_vis, default, locus: member_locus });
        }
        p.match_punct(";");
    }
    p.expect_punct("}")?;

    Ok(Stmt::ClassDecl {
        name,
        generics,
        fields,
        methods,
        interfaces,
        is_abstract,
        visibility: visibility_from_decorators(decorators),
        locus,
    })
}

fn parse_interface_decl(p: &mut Parser, decorators: &Decorators) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("pactum")?.locus;
    let (name, _) = p.expect_name()?;
    let generics = parse_optional_generics(p)?;
    p.expect_punct("{")?;
    let mut methods = Vec::new();
    while !p.check_punct("}") {
        let mlocus = p.locus();
        p.expect_kw("functio")?;
        let (mname, _) = p.expect_name()?;
        p.expect_punct("(")?;
        let mut params = Vec::new();
        if !p.check_punct(")") {
            params.push(expressions::parse_param(p)?);
            while p.match_punct(",") {
                params.push(expressions::parse_param(p)?);
            }
        }
        p.expect_punct(")")?;
        let ret = if p.match_op("->") { Some(types::parse_type(p)?) } else { None };
        methods.push(InterfaceMethod { name: mname, params, ret, locus: mlocus });
        p.match_punct(";");
    }
    p.expect_punct("}")?;
    Ok(Stmt::InterfaceDecl { name, generics, methods, visibility: visibility_from_decorators(decorators), locus })
}

fn parse_enum_decl(p: &mut Parser, decorators: &Decorators) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("ordo")?.locus;
    let (name, _) = p.expect_name()?;
    p.expect_punct("{")?;
    let mut members = Vec::new();
    while !p.check_punct("}") {
        let mlocus = p.locus();
        let (mname, _) = p.expect_name()?;
        let value = if p.match_op("=") { Some(parse_expr(p)?) } else { None };
        members.push(EnumMember { name: mname, value, locus: mlocus });
        if !p.match_punct(",") {
            break;
        }
    }
    p.expect_punct("}")?;
    Ok(Stmt::EnumDecl { name, members, visibility: visibility_from_decorators(decorators), locus })
}

fn parse_union_decl(p: &mut Parser, decorators: &Decorators) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("discretio")?.locus;
    let (name, _) = p.expect_name()?;
    p.expect_punct("{")?;
    let mut variants = Vec::new();
    while !p.check_punct("}") {
        let vlocus = p.locus();
        let (vname, _) = p.expect_name()?;
        p.expect_punct("{")?;
        let mut fields = Vec::new();
        while !p.check_punct("}") {
            let flocus = p.locus();
            let (ty, fname, _) = expressions::parse_leading_type_and_name(p)?;
            let ty = ty.ok_or_else(|| ParseError::new("variant field requires an explicit type", flocus))?;
            fields.push(FieldDecl { name: fname, ty, visibility: Visibility::Public, default: None, locus: flocus });
            p.match_punct(",");
        }
        p.expect_punct("}")?;
        variants.push(VariantDecl { name: vname, fields, locus: vlocus });
    }
    p.expect_punct("}")?;
    Ok(Stmt::UnionDecl { name, variants, visibility: visibility_from_decorators(decorators), locus })
}

fn parse_type_alias(p: &mut Parser, decorators: &Decorators) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("idem")?.locus;
    let (name, _) = p.expect_name()?;
    p.expect_op("=")?;
    let target = types::parse_type(p)?;
    Ok(Stmt::TypeAlias { name, target, visibility: visibility_from_decorators(decorators), locus })
}

fn parse_if(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("si")?.locus;
    let cond = parse_expr(p)?;
    let then_branch = Box::new(parse_body(p)?);
    let else_branch = if p.check_kw("sin") {
        Some(Box::new(parse_elif_chain(p)?))
    } else if p.match_kw("secus") {
        Some(Box::new(parse_body(p)?))
    } else {
        None
    };
    Ok(Stmt::If { cond, then_branch, else_branch, locus })
}

fn parse_elif_chain(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("sin")?.locus;
    let cond = parse_expr(p)?;
    let then_branch = Box::new(parse_body(p)?);
    let else_branch = if p.check_kw("sin") {
        Some(Box::new(parse_elif_chain(p)?))
    } else if p.match_kw("secus") {
        Some(Box::new(parse_body(p)?))
    } else {
        None
    };
    Ok(Stmt::If { cond, then_branch, else_branch, locus })
}

fn parse_while(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("dum")?.locus;
    let cond = parse_expr(p)?;
    let body = Box::new(parse_body(p)?);
    Ok(Stmt::While { cond, body, locus })
}

fn parse_do_while(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("fac")?.locus;
    let body = Box::new(parse_body(p)?);
    p.expect_kw("dum")?;
    let cond = parse_expr(p)?;
    Ok(Stmt::DoWhile { body, cond, locus })
}

fn parse_for(p: &mut Parser, is_async: bool) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("itera")?.locus;
    let (binding, _) = p.expect_name()?;
    let species = if p.match_kw("in") {
        ForSpecies::In
    } else {
        p.expect_kw("de")?;
        ForSpecies::De
    };
    let iterator = parse_expr(p)?;
    let body = Box::new(parse_body(p)?);
    Ok(Stmt::For { binding, iterator, body, species, is_async, locus })
}

fn parse_switch(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("elige")?.locus;
    let subject = parse_expr(p)?;
    p.expect_punct("{")?;
    let mut cases = Vec::new();
    while p.match_kw("casu") {
        let case_locus = p.locus();
        let pattern = parse_expr(p)?;
        let body = parse_case_body(p)?;
        cases.push(SwitchCase { pattern, body, locus: case_locus });
    }
    let default = if p.match_kw("secus") { Some(parse_case_body(p)?) } else { None };
    p.expect_punct("}")?;
    Ok(Stmt::Switch { subject, cases, default, locus })
}

fn parse_case_body(p: &mut Parser) -> Result<CaseBody, ParseError> {
    if p.match_kw("reddit") {
        let expr = parse_expr(p)?;
        Ok(CaseBody::Return { expr })
    } else {
        p.expect_punct("{")?;
        let statements = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        Ok(CaseBody::Block { statements })
    }
}

fn parse_match(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("discerne")?.locus;
    let mut scrutinees = vec![parse_expr(p)?];
    while p.match_punct(",") {
        scrutinees.push(parse_expr(p)?);
    }
    p.expect_punct("{")?;
    let mut cases = Vec::new();
    while p.match_kw("casu") {
        let case_locus = p.locus();
        let mut case_patterns = vec![patterns::parse_pattern(p)?];
        while p.match_punct(",") {
            case_patterns.push(patterns::parse_pattern(p)?);
        }
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        cases.push(MatchCase { patterns: case_patterns, body, locus: case_locus });
    }
    p.expect_punct("}")?;
    Ok(Stmt::Match { scrutinees, cases, locus })
}

fn parse_guard(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("custodi")?.locus;
    p.expect_punct("{")?;
    let mut clauses = Vec::new();
    while p.match_kw("si") {
        let clause_locus = p.locus();
        let cond = parse_expr(p)?;
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        clauses.push(GuardClause { cond, body, locus: clause_locus });
    }
    p.expect_punct("}")?;
    Ok(Stmt::Guard { clauses, locus })
}

fn parse_try(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("tempta")?.locus;
    p.expect_punct("{")?;
    let stmts = parse_block_stmts(p)?;
    p.expect_punct("}")?;
    let block = Box::new(Stmt::Block { statements: stmts, locus });

    let catch = if p.match_kw("cape") {
        let catch_locus = p.locus();
        let param = if p.check(Tag::Identifier) { Some(p.expect_name()?.0) } else { None };
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        Some(CatchClause { param, body, locus: catch_locus })
    } else {
        None
    };

    let finally = if p.match_kw("denique") {
        let finally_locus = p.locus();
        p.expect_punct("{")?;
        let body = parse_block_stmts(p)?;
        p.expect_punct("}")?;
        Some(Box::new(Stmt::Block { statements: body, locus: finally_locus }))
    } else {
        None
    };

    Ok(Stmt::Try { block, catch, finally, locus })
}

fn parse_print(p: &mut Parser, severity: PrintSeverity) -> Result<Stmt, ParseError> {
    let locus = p.advance().locus;
    let value = parse_optional_trailing_expr(p)?.unwrap_or(Expr::Literal { value: LiteralValue::Null, locus });
    Ok(Stmt::Print { value, severity, locus })
}

fn parse_assert(p: &mut Parser) -> Result<Stmt, ParseError> {
    let locus = p.expect_kw("confirma")?.locus;
    let cond = parse_expr(p)?;
    let message = if p.match_punct(",") { Some(parse_expr(p)?) } else { None };
    Ok(Stmt::Assert { cond, message, locus })
}

/// `§ importa ex "path" …`, its legacy `§ ex "path" importa …` form, or
/// `§ sectio "name"` (discarded) -- the only statements the `§`
/// directive sigil introduces (spec §4.2).
pub(crate) fn parse_directive(p: &mut Parser) -> Result<Option<Stmt>, ParseError> {
    let locus = p.expect_punct("§")?.locus;

    if p.check_kw("importa") {
        p.advance();
        p.expect_kw("ex")?;
        let path_tok = p.expect(Tag::String, "an import path string")?;
        return Ok(Some(parse_import_tail(p, path_tok.lexeme, locus)?));
    }
    if p.check_kw("ex") {
        p.advance();
        let path_tok = p.expect(Tag::String, "an import path string")?;
        p.expect_kw("importa")?;
        return Ok(Some(parse_import_tail(p, path_tok.lexeme, locus)?));
    }
    if p.match_kw("sectio") {
        p.expect(Tag::String, "a section name")?;
        return Ok(Some(Stmt::Empty { locus }));
    }

    Err(ParseError::new(format!("unknown directive `§ {}`", p.current().lexeme), locus))
}

fn parse_import_tail(p: &mut Parser, path: String, locus: fabula_common::Locus) -> Result<Stmt, ParseError> {
    if p.match_op("*") {
        let alias = if p.match_kw("ut") { Some(p.expect_name()?.0) } else { None };
        return Ok(Stmt::Import { path, total: true, alias, names: Vec::new(), locus });
    }

    let mut names = Vec::new();
    loop {
        let (name, name_locus) = p.expect_name()?;
        let alias = if p.match_kw("ut") { Some(p.expect_name()?.0) } else { None };
        names.push(ImportName { name, alias, locus: name_locus });
        if !p.match_punct(",") {
            break;
        }
    }
    Ok(Stmt::Import { path, total: false, alias: None, names, locus })
}
