/// The complete, fixed keyword set of the surface language.
///
/// Identifier-shaped lexemes are classified `Keyword` if (and only if)
/// they appear here, else `Identifier` -- this is the data-driven split
/// the spec calls for in §4.1, mirroring
/// `mesh_common::token::keyword_from_str`. A handful of these spellings
/// are deliberately reused across more than one grammatical position
/// (e.g. `si` both introduces an `if` statement and marks an optional
/// parameter; `privata` is both a bare member-visibility modifier and an
/// `@privata` annotation name) -- this mirrors the word-reuse the spec
/// explicitly calls out for `vel`/`novum`/`casu`, and the parser
/// disambiguates by grammatical context, not by lexeme alone.
pub const KEYWORDS: &[&str] = &[
    // Variable declaration kinds (mutable, const, frozen, rebindable).
    "varia",
    "fixum",
    "figendum",
    "variandum",
    // Function / class / interface / enum / discriminated union.
    "functio",
    "abstractus",
    "genus",
    "pactum",
    "ordo",
    "discretio",
    // Type alias.
    "idem",
    // Parameter modifiers.
    "ceteri",
    "ex",
    "de",
    "in",
    // Member visibility.
    "privata",
    "protecta",
    // Annotation names (used after `@`).
    "publica",
    "futura",
    "externa",
    "innatum",
    "subsidia",
    "radix",
    "verte",
    // Imports / directives.
    "importa",
    "ut",
    "sectio",
    // Constructors / type assertions / misc primaries.
    "novum",
    "finge",
    "qua",
    "clausura",
    "scriptum",
    "ego",
    // Ternary / conditionals.
    "sic",
    "secus",
    "sin",
    "si",
    // Loops.
    "dum",
    "fac",
    "itera",
    // Switch / pattern match.
    "elige",
    "casu",
    "discerne",
    "pro",
    // Guard / exceptions.
    "custodi",
    "tempta",
    "cape",
    "denique",
    // Jumps / terminators.
    "reddit",
    "iacit",
    "moritor",
    "tacet",
    "rumpe",
    "perge",
    // Single-statement body shorthand (`si cond ergo reddit x`).
    "ergo",
    // Print statements (severity Info/Debug/Warn) and assertions.
    "scribe",
    "mussat",
    "cavet",
    "confirma",
    // Entry points / tests.
    "incipit",
    "incipiet",
    "probandum",
    "proba",
    // Concurrency.
    "asynca",
    "cede",
    // Literals.
    "verum",
    "falsum",
    "nihil",
    // Word-form operators.
    "et",
    "aut",
    "vel",
    "inter",
    "intra",
    "non",
    "nonnihil",
    // Type conversions.
    "numeratum",
    "fractatum",
    "textatum",
    "bivalentum",
    // Primitive type names.
    "textus",
    "numerus",
    "fractus",
    "bivalens",
    "vacuum",
];

/// Whether `s` is a reserved keyword.
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_declaration_keywords() {
        for kw in ["varia", "fixum", "figendum", "variandum"] {
            assert!(is_keyword(kw), "{kw} should be a keyword");
        }
    }

    #[test]
    fn recognizes_body_shorthand_keyword() {
        assert!(is_keyword("ergo"));
    }

    #[test]
    fn rejects_plain_identifiers() {
        for name in ["foo", "bar", "Res", "msg", ""] {
            assert!(!is_keyword(name), "{name} should not be a keyword");
        }
    }

    #[test]
    fn no_duplicate_entries() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        let mut deduped = sorted.clone();
        deduped.dedup();
        assert_eq!(sorted.len(), deduped.len(), "KEYWORDS must not contain duplicates");
    }
}
