use std::fmt;

use fabula_common::Locus;

/// A parser error with location information.
///
/// The parser raises the first positioned error and aborts (spec §4.2/§7)
/// -- there is no error-recovery mode, matching `fabula_lexer::LexError`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub locus: Locus,
}

impl ParseError {
    pub fn new(message: impl Into<String>, locus: Locus) -> Self {
        Self { message: message.into(), locus }
    }

    pub fn expected(what: &str, found_lexeme: &str, locus: Locus) -> Self {
        Self::new(format!("expected {what}, found {found_lexeme:?}"), locus)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
