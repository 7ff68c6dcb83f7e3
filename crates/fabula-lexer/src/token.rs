use serde::Serialize;

use fabula_common::Locus;

/// The coarse classification of a token, per the language's lexical
/// grammar. Unlike the teacher's `snow_common::token::TokenKind` (one
/// variant per concrete symbol, ~85 variants), `Tag` stays at the level
/// the spec's data model describes it: nine broad categories, with the
/// concrete symbol carried separately in `Token::lexeme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tag {
    Eof,
    Newline,
    Identifier,
    Number,
    String,
    Operator,
    Punctuator,
    Keyword,
    Comment,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tag::Eof => "EOF",
            Tag::Newline => "Newline",
            Tag::Identifier => "Identifier",
            Tag::Number => "Number",
            Tag::String => "String",
            Tag::Operator => "Operator",
            Tag::Punctuator => "Punctuator",
            Tag::Keyword => "Keyword",
            Tag::Comment => "Comment",
        };
        write!(f, "{s}")
    }
}

/// A single token: its tag, the literal source text it covers, and the
/// locus of its first character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub tag: Tag,
    pub lexeme: String,
    pub locus: Locus,
}

impl Token {
    pub fn new(tag: Tag, lexeme: impl Into<String>, locus: Locus) -> Self {
        Self {
            tag,
            lexeme: lexeme.into(),
            locus,
        }
    }

    pub fn is(&self, tag: Tag) -> bool {
        self.tag == tag
    }

    pub fn is_lexeme(&self, tag: Tag, lexeme: &str) -> bool {
        self.tag == tag && self.lexeme == lexeme
    }
}
