//! Lexical analysis for wirescript.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, lookup_keyword};

/// Whether `text` lexes as a single identifier token (not a keyword).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(cursor::is_ident_start)
        && chars.all(cursor::is_ident_continue)
        && lookup_keyword(text).is_none()
}
