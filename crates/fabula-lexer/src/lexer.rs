use fabula_common::{Cursor, Locus};

use crate::error::{LexError, LexErrorKind};
use crate::keywords::is_keyword;
use crate::token::{Tag, Token};

/// A fixed, longest-first list of multi-character operator spellings.
/// Tried in order before falling back to the single-character operator
/// set; mirrors the teacher's `lex_eq`/`lex_lt`/… per-leading-character
/// dispatch functions, but driven by a literal table per spec §4.1
/// rather than one method per leading character.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "??", "+=", "-=", "*=", "/=", "->", "..",
];

const SINGLE_CHAR_OPERATORS: &[char] = &['+', '-', '*', '/', '%', '<', '>', '=', '&', '|', '^', '~'];

const SINGLE_CHAR_PUNCTUATORS: &[char] = &['(', ')', '{', '}', '[', ']', ',', '.', ';', ':', '@', '?', '!'];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizes Fabula source text. Pure; fails on the first unrecognized
/// byte or unterminated string literal (spec §4.1, §7).
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenize the entire source into a vector ending with exactly one
    /// `Eof` token (spec §8 property 4).
    pub fn tokenize(source: &'src str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.is(Tag::Eof);
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_insignificant_whitespace();

        let start = self.cursor.locus();
        let Some(c) = self.cursor.peek() else {
            return Ok(Token::new(Tag::Eof, "", start));
        };

        match c {
            '\n' => {
                self.cursor.advance();
                Ok(Token::new(Tag::Newline, "\n", start))
            }
            '#' => Ok(self.lex_comment(start)),
            '0'..='9' => Ok(self.lex_number(start)),
            '"' | '\'' => self.lex_string(start, c),
            '§' => {
                self.cursor.advance();
                Ok(Token::new(Tag::Punctuator, "§", start))
            }
            c if is_ident_start(c) => Ok(self.lex_identifier(start)),
            _ => self.lex_operator_or_punctuator(start, c),
        }
    }

    /// Space, tab, and carriage return are skipped silently; `\n` becomes
    /// a `Newline` token (spec §4.1).
    fn skip_insignificant_whitespace(&mut self) {
        self.cursor.eat_while(|c| c == ' ' || c == '\t' || c == '\r');
    }

    fn lex_comment(&mut self, start: Locus) -> Token {
        let begin = start.index;
        self.cursor.advance(); // '#'
        self.cursor.eat_while(|c| c != '\n');
        let end = self.cursor.locus().index;
        Token::new(Tag::Comment, self.cursor.slice(begin, end), start)
    }

    /// Contiguous run of digits, `.`, or `_`; classification into
    /// integer vs. float is deferred to the parser (spec §4.1).
    fn lex_number(&mut self, start: Locus) -> Token {
        let begin = start.index;
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '.' || c == '_');
        let end = self.cursor.locus().index;
        Token::new(Tag::Number, self.cursor.slice(begin, end), start)
    }

    fn lex_identifier(&mut self, start: Locus) -> Token {
        let begin = start.index;
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.locus().index;
        let lexeme = self.cursor.slice(begin, end);
        let tag = if is_keyword(lexeme) { Tag::Keyword } else { Tag::Identifier };
        Token::new(tag, lexeme, start)
    }

    /// Single- and double-quoted strings support `\n \t \r \\ \" \'`
    /// escapes (any other escaped character yields the literal
    /// character). A three-character double-quote opener begins a
    /// triple-quoted string ending at the next triple-quote, with an
    /// immediate post-opener newline swallowed and a single trailing
    /// newline stripped before yielding (spec §4.1).
    fn lex_string(&mut self, start: Locus, quote: char) -> Result<Token, LexError> {
        self.cursor.advance(); // opening quote

        if quote == '"' && self.cursor.peek() == Some('"') && self.cursor.peek_next() == Some('"') {
            self.cursor.advance();
            self.cursor.advance();
            return self.lex_triple_quoted_string(start);
        }

        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Err(LexError::new(LexErrorKind::UnterminatedString, start));
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some(escaped) => {
                            self.cursor.advance();
                            value.push(unescape(escaped));
                        }
                        None => return Err(LexError::new(LexErrorKind::UnterminatedString, start)),
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }
        Ok(Token::new(Tag::String, value, start))
    }

    fn lex_triple_quoted_string(&mut self, start: Locus) -> Result<Token, LexError> {
        if self.cursor.peek() == Some('\n') {
            self.cursor.advance();
        }

        let mut value = String::new();
        loop {
            if self.cursor.peek() == Some('"') && self.cursor.peek_next() == Some('"') {
                // Need a third lookahead to confirm the closing `"""`.
                let mut probe = self.cursor.clone();
                probe.advance();
                probe.advance();
                if probe.peek() == Some('"') {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
            }
            match self.cursor.peek() {
                None => return Err(LexError::new(LexErrorKind::UnterminatedString, start)),
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some(escaped) => {
                            self.cursor.advance();
                            value.push(unescape(escaped));
                        }
                        None => return Err(LexError::new(LexErrorKind::UnterminatedString, start)),
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }

        if value.ends_with('\n') {
            value.pop();
        }
        Ok(Token::new(Tag::String, value, start))
    }

    fn lex_operator_or_punctuator(&mut self, start: Locus, c: char) -> Result<Token, LexError> {
        for op in MULTI_CHAR_OPERATORS {
            if self.matches_ahead(op) {
                for _ in 0..op.chars().count() {
                    self.cursor.advance();
                }
                return Ok(Token::new(Tag::Operator, *op, start));
            }
        }
        if SINGLE_CHAR_OPERATORS.contains(&c) {
            self.cursor.advance();
            return Ok(Token::new(Tag::Operator, c.to_string(), start));
        }
        if SINGLE_CHAR_PUNCTUATORS.contains(&c) {
            self.cursor.advance();
            return Ok(Token::new(Tag::Punctuator, c.to_string(), start));
        }
        self.cursor.advance();
        Err(LexError::new(LexErrorKind::UnrecognizedByte(c), start))
    }

    fn matches_ahead(&self, text: &str) -> bool {
        let mut probe = self.cursor.clone();
        for expected in text.chars() {
            match probe.peek() {
                Some(c) if c == expected => {
                    probe.advance();
                }
                _ => return false,
            }
        }
        true
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        other => other,
    }
}

/// Tokenize `source`, attributing errors to `filename` via the returned
/// `Locus`. `filename` is carried by the caller for diagnostic rendering
/// (spec §4.1's `lex(source, filename) -> tokens`).
pub fn lex(source: &str, _filename: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(source)
}

/// Strip `Comment` and `Newline` tokens (spec §8 filtering property);
/// the parser never sees them.
pub fn prepare(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t.tag, Tag::Comment | Tag::Newline))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(src: &str) -> Vec<Token> {
        lex(src, "test").expect("should lex")
    }

    #[test]
    fn ends_with_exactly_one_eof() {
        let tokens = lex_ok("varia x = 1");
        assert_eq!(tokens.last().unwrap().tag, Tag::Eof);
        assert_eq!(tokens.iter().filter(|t| t.tag == Tag::Eof).count(), 1);
    }

    #[test]
    fn keyword_vs_identifier() {
        let tokens = lex_ok("varia functio");
        assert_eq!(tokens[0].tag, Tag::Keyword);
        assert_eq!(tokens[0].lexeme, "varia");
        assert_eq!(tokens[1].tag, Tag::Keyword);
    }

    #[test]
    fn plain_identifier() {
        let tokens = lex_ok("fooBar");
        assert_eq!(tokens[0].tag, Tag::Identifier);
        assert_eq!(tokens[0].lexeme, "fooBar");
    }

    #[test]
    fn newline_and_comment_tokens_present_before_filtering() {
        let tokens = lex_ok("varia x # a comment\n");
        assert!(tokens.iter().any(|t| t.tag == Tag::Comment));
        assert!(tokens.iter().any(|t| t.tag == Tag::Newline));
    }

    #[test]
    fn prepare_strips_comments_and_newlines() {
        let tokens = lex_ok("varia x # hi\n= 1");
        let filtered = prepare(tokens);
        assert!(!filtered.iter().any(|t| matches!(t.tag, Tag::Comment | Tag::Newline)));
    }

    #[test]
    fn operators_longest_match_first() {
        let tokens = lex_ok("a === b");
        assert_eq!(tokens[1].lexeme, "===");
        let tokens = lex_ok("a == b");
        assert_eq!(tokens[1].lexeme, "==");
        let tokens = lex_ok("a = b");
        assert_eq!(tokens[1].lexeme, "=");
    }

    #[test]
    fn arrow_vs_minus_equals_vs_minus() {
        assert_eq!(lex_ok("->")[0].lexeme, "->");
        assert_eq!(lex_ok("-=")[0].lexeme, "-=");
        assert_eq!(lex_ok("-")[0].lexeme, "-");
    }

    #[test]
    fn range_vs_dot() {
        assert_eq!(lex_ok("1..2")[1].lexeme, "..");
        assert_eq!(lex_ok("1.2")[0].tag, Tag::Number); // number absorbs the dot
        assert_eq!(lex_ok("a.b")[1].lexeme, ".");
    }

    #[test]
    fn nullable_and_coalesce() {
        assert_eq!(lex_ok("T?")[1].lexeme, "?");
        assert_eq!(lex_ok("a ?? b")[1].lexeme, "??");
    }

    #[test]
    fn section_sign_is_a_punctuator() {
        let tokens = lex_ok("§ importa");
        assert_eq!(tokens[0].tag, Tag::Punctuator);
        assert_eq!(tokens[0].lexeme, "§");
        assert_eq!(tokens[1].tag, Tag::Keyword);
    }

    #[test]
    fn string_escapes() {
        let tokens = lex_ok(r#""a\nb\tc\\d\"e""#);
        assert_eq!(tokens[0].tag, Tag::String);
        assert_eq!(tokens[0].lexeme, "a\nb\tc\\d\"e");
    }

    #[test]
    fn string_unknown_escape_yields_literal_char() {
        let tokens = lex_ok(r#""a\zb""#);
        assert_eq!(tokens[0].lexeme, "azb");
    }

    #[test]
    fn triple_quoted_string_value() {
        let tokens = lex_ok("\"\"\"\nhello\n\"\"\"");
        assert_eq!(tokens[0].tag, Tag::String);
        assert_eq!(tokens[0].lexeme, "hello");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = lex("\"abc", "test").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn unrecognized_byte_is_an_error() {
        let err = lex("`", "test").unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::UnrecognizedByte('`')));
    }

    #[test]
    fn locus_tracks_line_and_column() {
        let tokens = lex_ok("varia\nfixum");
        let fixum = tokens.iter().find(|t| t.lexeme == "fixum").unwrap();
        assert_eq!(fixum.locus.line, 2);
        assert_eq!(fixum.locus.column, 1);
    }

    #[test]
    fn keyword_as_field_name_still_lexes_as_keyword() {
        // `x.casu` -- `casu` lexes as Keyword; the parser's `expect_name`
        // is what allows it to be used as a member name.
        let tokens = lex_ok("x.casu");
        assert_eq!(tokens[2].tag, Tag::Keyword);
        assert_eq!(tokens[2].lexeme, "casu");
    }
}
