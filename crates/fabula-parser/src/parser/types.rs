//! Type annotation parsing (spec §3 "Types (surface IR)", §4.2).

use fabula_lexer::Tag;

use crate::error::ParseError;
use crate::ir::Type;

use super::{number_literal_value, string_literal_value, Parser};

/// Parses a full type expression: an atom, an optional postfix `?`, and
/// an optional `|`-separated union of further such units.
pub(crate) fn parse_type(p: &mut Parser) -> Result<Type, ParseError> {
    let first = parse_nullable_unit(p)?;
    if !p.check_op("|") {
        return Ok(first);
    }
    let locus = first.locus();
    let mut members = vec![first];
    while p.match_op("|") {
        members.push(parse_nullable_unit(p)?);
    }
    Ok(Type::Union { members, locus })
}

fn parse_nullable_unit(p: &mut Parser) -> Result<Type, ParseError> {
    let atom = parse_type_atom(p)?;
    if p.check_punct("?") {
        let locus = atom.locus();
        p.advance();
        Ok(Type::Nullable { inner: Box::new(atom), locus })
    } else {
        Ok(atom)
    }
}

fn parse_type_atom(p: &mut Parser) -> Result<Type, ParseError> {
    let locus = p.locus();

    if p.check_punct("(") {
        return parse_function_type(p);
    }

    if p.check(Tag::Number) {
        let tok = p.advance();
        return Ok(Type::Literal { value: number_literal_value(&tok.lexeme), locus });
    }

    if p.check(Tag::String) {
        let tok = p.advance();
        return Ok(Type::Literal { value: string_literal_value(&tok.lexeme), locus });
    }

    let (name, locus) = p.expect_name()?;

    if p.check_op("<") {
        p.advance();
        let mut args = vec![parse_type(p)?];
        while p.match_punct(",") {
            args.push(parse_type(p)?);
        }
        p.expect_op(">")?;
        return Ok(Type::Generic { name, args, locus });
    }

    Ok(Type::named(name, locus))
}

fn parse_function_type(p: &mut Parser) -> Result<Type, ParseError> {
    let locus = p.locus();
    p.expect_punct("(")?;
    let mut params = Vec::new();
    if !p.check_punct(")") {
        params.push(parse_type(p)?);
        while p.match_punct(",") {
            params.push(parse_type(p)?);
        }
    }
    p.expect_punct(")")?;
    p.expect_op("->")?;
    let ret = Box::new(parse_type(p)?);
    Ok(Type::Function { params, ret, locus })
}
