//! Expression grammar: Pratt-style precedence climbing (spec §4.2
//! "Expression grammar").
//!
//! Precedence table, loosest to tightest:
//! 1 assignment · 2 `aut`/`||`/`vel` · 3 `et`/`&&` · 4 equality ·
//! 5 relational · 6 range (`..`) · 7 additive · 8 multiplicative ·
//! 9 postfix type-assertion/conversion (`qua`, `innatum`, postfix
//! `novum`, `numeratum`/`fractatum`/`textatum`/`bivalentum`).

use fabula_lexer::Tag;

use crate::error::ParseError;
use crate::ir::{
    Expr, LambdaBody, LiteralValue, ObjectProperty, Param, PrimitiveTarget, PropertyKey, Type,
    TypeAssertKind,
};

use super::types::parse_type;
use super::{number_literal_value, string_literal_value, Parser};

const RANGE_PREC: u8 = 6;

pub(crate) fn parse_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    parse_assignment(p)
}

fn parse_assignment(p: &mut Parser) -> Result<Expr, ParseError> {
    let left = parse_ternary(p)?;
    if let Some(op) = match_assign_op(p) {
        let locus = left.locus();
        let value = parse_assignment(p)?;
        return Ok(Expr::Assign { op, target: Box::new(left), value: Box::new(value), locus });
    }
    Ok(left)
}

fn match_assign_op(p: &mut Parser) -> Option<String> {
    for op in ["+=", "-=", "*=", "/=", "="] {
        if p.check_op(op) {
            return Some(p.advance().lexeme);
        }
    }
    None
}

fn parse_ternary(p: &mut Parser) -> Result<Expr, ParseError> {
    let cond = parse_binary(p, 2)?;
    if p.match_kw("sic") {
        let locus = cond.locus();
        let consequent = parse_assignment(p)?;
        p.expect_kw("secus")?;
        let alternative = parse_assignment(p)?;
        return Ok(Expr::Ternary {
            cond: Box::new(cond),
            consequent: Box::new(consequent),
            alternative: Box::new(alternative),
            locus,
        });
    }
    Ok(cond)
}

fn parse_binary(p: &mut Parser, min_prec: u8) -> Result<Expr, ParseError> {
    let mut left = parse_unary(p)?;
    loop {
        if let Some(specialized) = try_parse_postfix_special(p, &left)? {
            left = specialized;
            continue;
        }

        if p.check_op("..") {
            if RANGE_PREC < min_prec {
                break;
            }
            let locus = left.locus();
            p.advance();
            let end = parse_binary(p, RANGE_PREC + 1)?;
            left = Expr::Range { start: Box::new(left), end: Box::new(end), inclusive: false, locus };
            continue;
        }

        match peek_binop(p, min_prec) {
            Some((op, prec)) => {
                let locus = left.locus();
                p.advance();
                let right = parse_binary(p, prec + 1)?;
                left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), locus };
            }
            None => break,
        }
    }
    Ok(left)
}

fn peek_binop(p: &Parser, min_prec: u8) -> Option<(String, u8)> {
    let tok = p.current();
    let (lexeme, prec): (&str, u8) = match (tok.tag, tok.lexeme.as_str()) {
        (Tag::Operator, lx @ "||") => (lx, 2),
        (Tag::Keyword, lx @ "aut") => (lx, 2),
        (Tag::Keyword, lx @ "vel") => (lx, 2),
        (Tag::Operator, lx @ "&&") => (lx, 3),
        (Tag::Keyword, lx @ "et") => (lx, 3),
        (Tag::Operator, lx @ "==") => (lx, 4),
        (Tag::Operator, lx @ "!=") => (lx, 4),
        (Tag::Operator, lx @ "===") => (lx, 4),
        (Tag::Operator, lx @ "!==") => (lx, 4),
        (Tag::Operator, lx @ "<") => (lx, 5),
        (Tag::Operator, lx @ ">") => (lx, 5),
        (Tag::Operator, lx @ "<=") => (lx, 5),
        (Tag::Operator, lx @ ">=") => (lx, 5),
        (Tag::Keyword, lx @ "inter") => (lx, 5),
        (Tag::Keyword, lx @ "intra") => (lx, 5),
        (Tag::Operator, lx @ "+") => (lx, 7),
        (Tag::Operator, lx @ "-") => (lx, 7),
        (Tag::Operator, lx @ "*") => (lx, 8),
        (Tag::Operator, lx @ "/") => (lx, 8),
        (Tag::Operator, lx @ "%") => (lx, 8),
        _ => return None,
    };
    if prec < min_prec {
        None
    } else {
        Some((lexeme.to_string(), prec))
    }
}

/// The three postfix type-assertion spellings and the four primitive
/// conversions all bind at the tightest precedence (9) and can chain
/// directly onto the left operand without going through the generic
/// binary-operator table (spec §4.2 point 4).
fn try_parse_postfix_special(p: &mut Parser, left: &Expr) -> Result<Option<Expr>, ParseError> {
    let locus = left.locus();

    if p.match_kw("qua") {
        let target = parse_type(p)?;
        return Ok(Some(Expr::TypeAssert {
            operand: Box::new(left.clone()),
            target,
            kind: TypeAssertKind::As,
            locus,
        }));
    }
    if p.match_kw("innatum") {
        let target = parse_type(p)?;
        return Ok(Some(Expr::TypeAssert {
            operand: Box::new(left.clone()),
            target,
            kind: TypeAssertKind::Is,
            locus,
        }));
    }
    if p.check_kw("novum") {
        // Postfix construct-cast: `Name novum` casts the name as a type.
        if let Some(target) = expr_as_type(left) {
            p.advance();
            return Ok(Some(Expr::TypeAssert {
                operand: Box::new(left.clone()),
                target,
                kind: TypeAssertKind::ConstructCast,
                locus,
            }));
        }
    }

    for (kw, target) in [
        ("numeratum", PrimitiveTarget::Number),
        ("fractatum", PrimitiveTarget::Fraction),
        ("textatum", PrimitiveTarget::Text),
        ("bivalentum", PrimitiveTarget::Boolean),
    ] {
        if p.match_kw(kw) {
            let fallback = if target.allows_fallback() && p.match_kw("vel") {
                Some(Box::new(parse_unary(p)?))
            } else {
                None
            };
            return Ok(Some(Expr::Convert { operand: Box::new(left.clone()), target, fallback, locus }));
        }
    }

    Ok(None)
}

/// Reinterprets a bare identifier expression as a named type, for the
/// postfix `Name novum` construct-cast form.
fn expr_as_type(expr: &Expr) -> Option<Type> {
    match expr {
        Expr::Identifier { name, locus } => Some(Type::named(name.clone(), *locus)),
        _ => None,
    }
}

const UNARY_OPERATORS: &[&str] = &["-", "+", "~"];

/// Word-form keywords that only ever appear in infix position -- they
/// can never themselves begin an expression, so a prefix-operator
/// lookahead must reject them (spec §9 "unary prefix ambiguity"). `non`
/// is deliberately absent: it is itself a unary prefix, so it can start
/// one.
const INFIX_ONLY_KEYWORDS: &[&str] = &["et", "aut", "vel", "inter", "intra"];

fn is_unary_start(tok: &fabula_lexer::Token) -> bool {
    (tok.tag == Tag::Operator && UNARY_OPERATORS.contains(&tok.lexeme.as_str()))
        || tok.is_lexeme(Tag::Keyword, "non")
        || tok.is_lexeme(Tag::Keyword, "nihil")
        || tok.is_lexeme(Tag::Keyword, "nonnihil")
}

/// Whether a token can begin an expression -- used to disambiguate a
/// unary prefix from the same lexeme used in another grammatical
/// position (spec §9 "unary prefix ambiguity").
fn can_start_expr(tok: &fabula_lexer::Token) -> bool {
    if tok.is(Tag::Eof) {
        return false;
    }
    if tok.tag == Tag::Keyword && super::is_statement_keyword(&tok.lexeme) {
        return false;
    }
    if tok.tag == Tag::Keyword && INFIX_ONLY_KEYWORDS.contains(&tok.lexeme.as_str()) {
        return false;
    }
    if tok.tag == Tag::Punctuator && matches!(tok.lexeme.as_str(), ")" | "]" | "}" | "," | ";" | ":") {
        return false;
    }
    if tok.tag == Tag::Operator && !UNARY_OPERATORS.contains(&tok.lexeme.as_str()) {
        return false;
    }
    true
}

fn parse_unary(p: &mut Parser) -> Result<Expr, ParseError> {
    if p.check_kw("cede") {
        // Async is lexical, not semantic: `cede` just threads an Await
        // node through for the lowering emitter to translate.
        let locus = p.advance().locus;
        let operand = parse_unary(p)?;
        return Ok(Expr::Await { operand: Box::new(operand), locus });
    }
    if is_unary_start(p.current()) && can_start_expr(p.peek(1)) {
        let locus = p.locus();
        let op = p.advance().lexeme;
        let operand = parse_unary(p)?;
        return Ok(Expr::Unary { op, operand: Box::new(operand), locus });
    }
    parse_postfix(p)
}

fn parse_postfix(p: &mut Parser) -> Result<Expr, ParseError> {
    let mut expr = parse_primary(p)?;
    loop {
        let locus = expr.locus();
        if p.match_punct("(") {
            let args = parse_call_args(p)?;
            expr = Expr::Call { callee: Box::new(expr), args, locus };
        } else if p.check_punct("!") && (p.peek(1).is_lexeme(Tag::Punctuator, ".") || p.peek(1).is_lexeme(Tag::Punctuator, "[")) {
            p.advance();
            if p.match_punct(".") {
                let (name, name_locus) = p.expect_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: PropertyKey::Name { name, locus: name_locus },
                    non_null: true,
                    locus,
                };
            } else {
                p.expect_punct("[")?;
                let index = parse_expr(p)?;
                let index_locus = index.locus();
                p.expect_punct("]")?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: PropertyKey::Computed { expr: Box::new(index), locus: index_locus },
                    non_null: true,
                    locus,
                };
            }
        } else if p.match_punct(".") {
            let (name, name_locus) = p.expect_name()?;
            expr = Expr::Member {
                object: Box::new(expr),
                property: PropertyKey::Name { name, locus: name_locus },
                non_null: false,
                locus,
            };
        } else if p.match_punct("[") {
            let index = parse_expr(p)?;
            let index_locus = index.locus();
            p.expect_punct("]")?;
            expr = Expr::Member {
                object: Box::new(expr),
                property: PropertyKey::Computed { expr: Box::new(index), locus: index_locus },
                non_null: false,
                locus,
            };
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_call_args(p: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    let mut args = Vec::new();
    if !p.check_punct(")") {
        args.push(parse_expr(p)?);
        while p.match_punct(",") {
            args.push(parse_expr(p)?);
        }
    }
    p.expect_punct(")")?;
    Ok(args)
}

fn parse_primary(p: &mut Parser) -> Result<Expr, ParseError> {
    let locus = p.locus();

    if p.check(Tag::Number) {
        let tok = p.advance();
        return Ok(Expr::Literal { value: number_literal_value(&tok.lexeme), locus });
    }
    if p.check(Tag::String) {
        let tok = p.advance();
        return Ok(Expr::Literal { value: string_literal_value(&tok.lexeme), locus });
    }
    if p.check(Tag::Identifier) {
        let tok = p.advance();
        return Ok(Expr::Identifier { name: tok.lexeme, locus });
    }

    if p.match_kw("verum") {
        return Ok(Expr::Literal { value: LiteralValue::True, locus });
    }
    if p.match_kw("falsum") {
        return Ok(Expr::Literal { value: LiteralValue::False, locus });
    }
    if p.match_kw("nihil") {
        return Ok(Expr::Literal { value: LiteralValue::Null, locus });
    }
    if p.match_kw("ego") {
        return Ok(Expr::SelfRef { locus });
    }
    if p.check_kw("novum") {
        return parse_new(p);
    }
    if p.check_kw("finge") {
        return parse_variant_construct(p);
    }
    if p.check_kw("scriptum") {
        return parse_template(p);
    }
    if p.check_kw("asynca") && p.peek(1).is_lexeme(Tag::Keyword, "clausura") {
        p.advance();
        return parse_lambda(p, true);
    }
    if p.check_kw("clausura") {
        return parse_lambda(p, false);
    }

    if p.match_punct("(") {
        let inner = parse_expr(p)?;
        p.expect_punct(")")?;
        return Ok(inner);
    }
    if p.match_punct("[") {
        let mut elements = Vec::new();
        if !p.check_punct("]") {
            elements.push(parse_expr(p)?);
            while p.match_punct(",") {
                elements.push(parse_expr(p)?);
            }
        }
        p.expect_punct("]")?;
        return Ok(Expr::ArrayLiteral { elements, locus });
    }
    if p.match_punct("{") {
        let properties = parse_property_list_until_rbrace(p)?;
        p.expect_punct("}")?;
        return Ok(Expr::ObjectLiteral { properties, locus });
    }

    Err(ParseError::expected("an expression", &p.current().lexeme, locus))
}

fn parse_new(p: &mut Parser) -> Result<Expr, ParseError> {
    let locus = p.expect_kw("novum")?.locus;
    let callee = parse_callee_path(p)?;
    let mut args = Vec::new();
    if p.match_punct("(") {
        args = parse_call_args(p)?;
    }
    let init = if p.check_punct("{") {
        p.advance();
        let props = parse_property_list_until_rbrace(p)?;
        p.expect_punct("}")?;
        Some(props)
    } else {
        None
    };
    Ok(Expr::New { callee: Box::new(callee), args, init, locus })
}

fn parse_callee_path(p: &mut Parser) -> Result<Expr, ParseError> {
    let locus = p.locus();
    let (name, _) = p.expect_name()?;
    let mut expr = Expr::Identifier { name, locus };
    while p.match_punct(".") {
        let (field, field_locus) = p.expect_name()?;
        expr = Expr::Member {
            object: Box::new(expr),
            property: PropertyKey::Name { name: field, locus: field_locus },
            non_null: false,
            locus,
        };
    }
    Ok(expr)
}

fn parse_variant_construct(p: &mut Parser) -> Result<Expr, ParseError> {
    let locus = p.expect_kw("finge")?.locus;
    let (variant, _) = p.expect_name()?;
    p.expect_punct("{")?;
    let fields = parse_property_list_until_rbrace(p)?;
    p.expect_punct("}")?;
    let type_hint = if p.match_kw("qua") { Some(parse_type(p)?) } else { None };
    Ok(Expr::VariantConstruct { variant, fields, type_hint, locus })
}

fn parse_template(p: &mut Parser) -> Result<Expr, ParseError> {
    let locus = p.expect_kw("scriptum")?.locus;
    p.expect_punct("(")?;
    let fmt_tok = p.expect(Tag::String, "a template format string")?;
    let mut args = Vec::new();
    while p.match_punct(",") {
        args.push(parse_expr(p)?);
    }
    p.expect_punct(")")?;
    Ok(Expr::Template { format: fmt_tok.lexeme, args, locus })
}

fn parse_lambda(p: &mut Parser, is_async: bool) -> Result<Expr, ParseError> {
    let locus = p.expect_kw("clausura")?.locus;
    let mut params = Vec::new();
    if p.match_punct("(") {
        if !p.check_punct(")") {
            params.push(parse_param(p)?);
            while p.match_punct(",") {
                params.push(parse_param(p)?);
            }
        }
        p.expect_punct(")")?;
    }
    let body = if p.match_punct(":") {
        LambdaBody::Expr { expr: Box::new(parse_expr(p)?) }
    } else {
        p.expect_punct("{")?;
        let statements = super::statements::parse_block_stmts(p)?;
        p.expect_punct("}")?;
        LambdaBody::Block { statements }
    };
    Ok(Expr::Lambda { params, body, is_async, locus })
}

fn parse_property_list_until_rbrace(p: &mut Parser) -> Result<Vec<ObjectProperty>, ParseError> {
    let mut props = Vec::new();
    while !p.check_punct("}") {
        let locus = p.locus();
        if p.match_punct("[") {
            let key_expr = parse_expr(p)?;
            let key_locus = key_expr.locus();
            p.expect_punct("]")?;
            p.expect_punct(":")?;
            let value = parse_expr(p)?;
            props.push(ObjectProperty {
                key: PropertyKey::Computed { expr: Box::new(key_expr), locus: key_locus },
                value,
                shorthand: false,
                locus,
            });
        } else {
            let (name, name_locus) = p.expect_name()?;
            if p.match_punct(":") {
                let value = parse_expr(p)?;
                props.push(ObjectProperty {
                    key: PropertyKey::Name { name, locus: name_locus },
                    value,
                    shorthand: false,
                    locus,
                });
            } else {
                let value = Expr::Identifier { name: name.clone(), locus: name_locus };
                props.push(ObjectProperty {
                    key: PropertyKey::Name { name, locus: name_locus },
                    value,
                    shorthand: true,
                    locus,
                });
            }
        }
        if !p.match_punct(",") {
            break;
        }
    }
    Ok(props)
}

/// Shared leading-name heuristic for an optional type before a name
/// (spec §4.2 "Variable declaration" and "Parameter lists"): after a
/// leading name, `<` means it was a generic type, `?` means it was a
/// nullable type, another name means it was a type and the next token
/// is the real name; otherwise the leading name was the name itself.
pub(crate) fn parse_leading_type_and_name(
    p: &mut Parser,
) -> Result<(Option<Type>, String, fabula_common::Locus), ParseError> {
    let (first_name, first_locus) = p.expect_name()?;

    if p.check_op("<") {
        p.advance();
        let mut args = vec![parse_type(p)?];
        while p.match_punct(",") {
            args.push(parse_type(p)?);
        }
        p.expect_op(">")?;
        let mut ty = Type::Generic { name: first_name, args, locus: first_locus };
        if p.match_punct("?") {
            ty = Type::Nullable { inner: Box::new(ty), locus: first_locus };
        }
        let (name, locus) = p.expect_name()?;
        return Ok((Some(ty), name, locus));
    }

    if p.check_punct("?") {
        p.advance();
        let ty = Type::Nullable { inner: Box::new(Type::named(first_name, first_locus)), locus: first_locus };
        let (name, locus) = p.expect_name()?;
        return Ok((Some(ty), name, locus));
    }

    if p.check(Tag::Identifier) || p.check(Tag::Keyword) {
        let ty = Type::named(first_name, first_locus);
        let (name, locus) = p.expect_name()?;
        return Ok((Some(ty), name, locus));
    }

    Ok((None, first_name, first_locus))
}

fn wrap_nullable(ty: Type) -> Type {
    if matches!(ty, Type::Nullable { .. }) {
        ty
    } else {
        let locus = ty.locus();
        Type::Nullable { inner: Box::new(ty), locus }
    }
}

/// A parameter in a function/lambda parameter list (spec §4.2
/// "Parameter lists").
pub(crate) fn parse_param(p: &mut Parser) -> Result<Param, ParseError> {
    let locus = p.locus();
    let rest = p.match_kw("ceteri");
    let optional = p.match_kw("si");
    let ownership =
        if p.check_kw("ex") || p.check_kw("de") || p.check_kw("in") { Some(p.advance().lexeme) } else { None };

    let (mut ty, name, _) = parse_leading_type_and_name(p)?;
    if optional {
        ty = ty.map(wrap_nullable);
    }
    let default = if p.match_op("=") { Some(parse_expr(p)?) } else { None };

    Ok(Param { name, ty, rest, optional, ownership, default, locus })
}
