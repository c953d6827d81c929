//! Token types and definitions for the wirescript lexer.

use std::fmt;

use wirescript_core::Span;

/// A token from the source code.
///
/// The lexeme borrows from the source string being lexed.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Describe this token for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All possible token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`, `0xFF`
    IntLiteral,
    /// Float literal: `3.14`, `1e10`
    FloatLiteral,
    /// String literal: `"hello"`, `'a'`
    StringLiteral,

    /// User-defined identifier (including type names)
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    True,
    False,
    Null,
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,

    // =========================================
    // Operators
    // =========================================
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    EqualEqual,
    Bang,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    Question,

    // =========================================
    // Punctuation
    // =========================================
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Colon,

    // =========================================
    // Special
    // =========================================
    /// Lexer error placeholder; the error itself is recorded by the lexer.
    Error,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Static text for fixed-spelling tokens.
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer",
            FloatLiteral => "float",
            StringLiteral => "string",
            Identifier => "identifier",
            True => "true",
            False => "false",
            Null => "null",
            If => "if",
            Else => "else",
            For => "for",
            While => "while",
            Break => "break",
            Continue => "continue",
            Return => "return",
            Plus => "+",
            Minus => "-",
            Star => "*",
            StarStar => "**",
            Slash => "/",
            Percent => "%",
            Equal => "=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            StarEqual => "*=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            EqualEqual => "==",
            Bang => "!",
            BangEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            AmpAmp => "&&",
            PipePipe => "||",
            Question => "?",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            LeftBracket => "[",
            RightBracket => "]",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            Error => "<error>",
            Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Look up a keyword by its spelling.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "true" => True,
        "false" => False,
        "null" => Null,
        "if" => If,
        "else" => Else,
        "for" => For,
        "while" => While,
        "break" => Break,
        "continue" => Continue,
        "return" => Return,
        _ => return None,
    })
}
