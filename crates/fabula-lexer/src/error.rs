use std::fmt;

use fabula_common::Locus;

/// A lexer error with location information.
///
/// The lexer aborts on the first unrecognized byte or unterminated
/// literal, per spec §4.1/§7 -- there is no error-recovery mode.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub locus: Locus,
}

impl LexError {
    pub fn new(kind: LexErrorKind, locus: Locus) -> Self {
        Self { kind, locus }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnrecognizedByte(char),
    UnterminatedString,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnrecognizedByte(c) => write!(f, "unrecognized byte: {c:?}"),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}
