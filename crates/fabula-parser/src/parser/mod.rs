//! Recursive-descent parser for the Fabula surface language.
//!
//! The parser consumes the filtered token stream (`fabula_lexer::prepare`
//! has already dropped `Comment`/`Newline`) and builds the typed IR
//! directly -- there is no intermediate concrete syntax tree. State is a
//! token array and a cursor, with `peek`/`advance`/`check`/`match_tok`/
//! `expect`/`expect_name` helpers mirroring the grammar description in
//! the component design. On the first malformed construct the parser
//! raises a single positioned [`ParseError`] and aborts; there is no
//! error-recovery mode.

pub(crate) mod expressions;
pub(crate) mod patterns;
pub(crate) mod statements;
pub(crate) mod types;

use fabula_common::Locus;
use fabula_lexer::{Tag, Token};

use crate::error::ParseError;
use crate::ir::{LiteralValue, Module, Stmt};

/// Keywords that introduce a new statement. Used in two places the spec
/// calls out explicitly: the return-expression delimiter (§4.2) and the
/// unary-operator lookahead blacklist (§9), plus to stop annotation-arg
/// scanning before the next declaration.
const STATEMENT_KEYWORDS: &[&str] = &[
    "varia", "fixum", "figendum", "variandum", "functio", "abstractus", "genus", "pactum", "ordo",
    "discretio", "idem", "importa", "si", "sin", "secus", "dum", "fac", "itera", "elige",
    "discerne", "custodi", "tempta", "reddit", "iacit", "moritor", "tacet", "rumpe", "perge",
    "scribe", "mussat", "cavet", "confirma", "incipit", "incipiet", "probandum", "proba", "asynca",
];

fn is_statement_keyword(lexeme: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&lexeme)
}

/// Boolean flags toggled by leading `@annotation` decorators (spec §4.2).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Decorators {
    pub publica: bool,
    pub privata: bool,
    pub futura: bool,
    pub externa: bool,
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    fn peek(&self, k: usize) -> &Token {
        let idx = (self.pos + k).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn locus(&self) -> Locus {
        self.current().locus
    }

    fn is_eof(&self) -> bool {
        self.current().is(Tag::Eof)
    }

    fn check(&self, tag: Tag) -> bool {
        self.current().is(tag)
    }

    fn check_lexeme(&self, tag: Tag, lexeme: &str) -> bool {
        self.current().is_lexeme(tag, lexeme)
    }

    fn check_kw(&self, lexeme: &str) -> bool {
        self.check_lexeme(Tag::Keyword, lexeme)
    }

    fn check_punct(&self, lexeme: &str) -> bool {
        self.check_lexeme(Tag::Punctuator, lexeme)
    }

    fn check_op(&self, lexeme: &str) -> bool {
        self.check_lexeme(Tag::Operator, lexeme)
    }

    // ── Mutation ───────────────────────────────────────────────────────

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_eof() {
            self.pos += 1;
        }
        tok
    }

    fn match_tok(&mut self, tag: Tag) -> Option<Token> {
        if self.check(tag) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn match_lexeme(&mut self, tag: Tag, lexeme: &str) -> bool {
        if self.check_lexeme(tag, lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_kw(&mut self, lexeme: &str) -> bool {
        self.match_lexeme(Tag::Keyword, lexeme)
    }

    fn match_punct(&mut self, lexeme: &str) -> bool {
        self.match_lexeme(Tag::Punctuator, lexeme)
    }

    fn match_op(&mut self, lexeme: &str) -> bool {
        self.match_lexeme(Tag::Operator, lexeme)
    }

    fn expect(&mut self, tag: Tag, what: &str) -> Result<Token, ParseError> {
        if self.check(tag) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(what, &self.current().lexeme, self.locus()))
        }
    }

    fn expect_lexeme(&mut self, tag: Tag, lexeme: &str) -> Result<Token, ParseError> {
        if self.check_lexeme(tag, lexeme) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                &format!("`{lexeme}`"),
                &self.current().lexeme,
                self.locus(),
            ))
        }
    }

    fn expect_kw(&mut self, lexeme: &str) -> Result<Token, ParseError> {
        self.expect_lexeme(Tag::Keyword, lexeme)
    }

    fn expect_punct(&mut self, lexeme: &str) -> Result<Token, ParseError> {
        self.expect_lexeme(Tag::Punctuator, lexeme)
    }

    fn expect_op(&mut self, lexeme: &str) -> Result<Token, ParseError> {
        self.expect_lexeme(Tag::Operator, lexeme)
    }

    /// Accepts either an `Identifier` or a `Keyword` as a name -- the
    /// crucial rule used wherever field/member names may collide with
    /// keywords (spec §9).
    fn expect_name(&mut self) -> Result<(String, Locus), ParseError> {
        if self.check(Tag::Identifier) || self.check(Tag::Keyword) {
            let tok = self.advance();
            Ok((tok.lexeme, tok.locus))
        } else {
            Err(ParseError::expected("a name", &self.current().lexeme, self.locus()))
        }
    }
}

/// Parse a filtered token stream into a [`Module`].
///
/// `filename` is accepted for contract parity with `lex`/`parse`'s
/// uniform `(source_like, filename)` shape but is not consulted
/// internally -- positioning is carried entirely by `Locus`.
pub fn parse(tokens: Vec<Token>, _filename: &str) -> Result<Module, ParseError> {
    let mut p = Parser::new(tokens);
    let mut statements = Vec::new();
    while !p.is_eof() {
        statements.push(parse_top_level_stmt(&mut p)?);
    }
    Ok(Module { statements })
}

fn parse_top_level_stmt(p: &mut Parser) -> Result<Stmt, ParseError> {
    let decorators = parse_decorators(p)?;

    if p.check_punct("§") {
        if let Some(stmt) = statements::parse_directive(p)? {
            return Ok(stmt);
        }
    }

    statements::parse_stmt(p, decorators)
}

/// Recognized annotation names whose argument lists are skipped rather
/// than structurally parsed (spec §4.2: "a fixed set of CLI and
/// formatter annotations").
const SKIPPED_ANNOTATIONS: &[&str] = &["innatum", "subsidia", "radix", "verte", "formatum", "cli"];

fn parse_decorators(p: &mut Parser) -> Result<Decorators, ParseError> {
    let mut decorators = Decorators::default();
    while p.check_punct("@") {
        let at_locus = p.advance().locus;
        let (name, _) = p.expect_name()?;
        match name.as_str() {
            "publica" => decorators.publica = true,
            "privata" => decorators.privata = true,
            "futura" => decorators.futura = true,
            "externa" => decorators.externa = true,
            other if SKIPPED_ANNOTATIONS.contains(&other) => skip_annotation_args(p),
            other => {
                return Err(ParseError::new(format!("unknown annotation `@{other}`"), at_locus));
            }
        }
    }
    Ok(decorators)
}

/// A `Number` token's lexeme classifies as `Float` if it contains `.`,
/// else `Int` -- classification is deferred from the lexer to here
/// (spec §4.1). Underscores are accepted but never validated (spec §9
/// open question c) -- they are simply stripped before parsing.
pub(crate) fn number_literal_value(lexeme: &str) -> LiteralValue {
    let cleaned: String = lexeme.chars().filter(|&c| c != '_').collect();
    if cleaned.contains('.') {
        LiteralValue::Float(cleaned.parse().unwrap_or(0.0))
    } else {
        LiteralValue::Int(cleaned.parse().unwrap_or(0))
    }
}

pub(crate) fn string_literal_value(lexeme: &str) -> LiteralValue {
    LiteralValue::Str(lexeme.to_string())
}

/// Scan forward past an unparsed annotation's argument list, stopping
/// before the next `@`, `§`, or statement-introducing keyword.
fn skip_annotation_args(p: &mut Parser) {
    loop {
        if p.is_eof() || p.check_punct("@") || p.check_punct("§") {
            break;
        }
        if p.check(Tag::Keyword) && is_statement_keyword(&p.current().lexeme) {
            break;
        }
        p.advance();
    }
}
