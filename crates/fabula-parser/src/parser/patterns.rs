//! `discerne` pattern parsing (spec §4.2, GLOSSARY "Pattern").

use fabula_lexer::Tag;

use crate::error::ParseError;
use crate::ir::Pattern;

use super::Parser;

/// `_` (wildcard), `Variant`, `Variant ut alias`, or
/// `Variant pro|fixum binding₁, binding₂, …`.
pub(crate) fn parse_pattern(p: &mut Parser) -> Result<Pattern, ParseError> {
    let locus = p.locus();

    if p.check(Tag::Identifier) && p.current().lexeme == "_" {
        p.advance();
        return Ok(Pattern::Wildcard { locus });
    }

    let (name, _) = p.expect_name()?;

    if p.match_kw("ut") {
        let (alias, _) = p.expect_name()?;
        return Ok(Pattern::Variant { name, alias: Some(alias), bindings: Vec::new(), locus });
    }

    if p.match_kw("pro") || p.match_kw("fixum") {
        let mut bindings = vec![p.expect_name()?.0];
        while p.match_punct(",") {
            bindings.push(p.expect_name()?.0);
        }
        return Ok(Pattern::Variant { name, alias: None, bindings, locus });
    }

    Ok(Pattern::Variant { name, alias: None, bindings: Vec::new(), locus })
}
