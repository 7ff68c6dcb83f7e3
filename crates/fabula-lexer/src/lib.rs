//! Tokenizer for the Fabula surface language.
//!
//! `lex` turns source text into a flat token stream ending with exactly
//! one `Eof` token; `prepare` strips the `Comment`/`Newline` tokens the
//! parser doesn't need but the IR-dump commands (spec §6) do.

mod error;
mod keywords;
mod lexer;
mod token;

pub use error::{LexError, LexErrorKind};
pub use keywords::{is_keyword, KEYWORDS};
pub use lexer::{lex, prepare, Lexer};
pub use token::{Tag, Token};
