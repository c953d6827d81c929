//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s.
//! It uses direct dispatch based on the first character.

use std::collections::VecDeque;

use wirescript_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for wirescript source code.
///
/// Converts source text into a stream of tokens. Provides lookahead
/// via [`peek`](Self::peek) and [`peek_nth`](Self::peek_nth).
pub struct Lexer<'src> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Lookahead buffer for peeking.
    lookahead: VecDeque<Token<'src>>,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            lookahead: VecDeque::with_capacity(4),
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        if let Some(token) = self.lookahead.pop_front() {
            return token;
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Token<'src> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead (0 = next token).
    pub fn peek_nth(&mut self, n: usize) -> Token<'src> {
        while self.lookahead.len() <= n {
            let token = self.scan_token();
            self.lookahead.push_back(token);
        }
        self.lookahead[n]
    }

    /// Lex the whole source, ending with (and including) the EOF token.
    pub fn tokenize(mut self) -> (Vec<Token<'src>>, Vec<LexError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        let errors = self.take_errors();
        (tokens, errors)
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'src> {
        if let Some(error) = self.skip_trivia() {
            return self.make_error(error);
        }

        if self.cursor.is_eof() {
            return self.make_eof();
        }

        let start = self.start();
        let Some(c) = self.cursor.peek() else {
            return self.make_eof();
        };

        match c {
            '"' | '\'' => self.scan_string(c, start),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            c if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_operator(start),
        }
    }

    /// Skip whitespace, BOM and comments.
    ///
    /// Returns an error for an unterminated block comment.
    fn skip_trivia(&mut self) -> Option<LexError> {
        loop {
            if self.cursor.check_str("\u{FEFF}") {
                self.cursor.advance();
                continue;
            }
            if self.cursor.check(|c| c.is_whitespace()) {
                self.cursor.eat_while(|c| c.is_whitespace());
                continue;
            }
            if self.cursor.check_str("//") {
                self.cursor.eat_while(|c| c != '\n');
                continue;
            }
            if self.cursor.check_str("/*") {
                let start = self.start();
                self.cursor.advance();
                self.cursor.advance();
                loop {
                    if self.cursor.check_str("*/") {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    if self.cursor.advance().is_none() {
                        let span = self.span_from(start);
                        return Some(LexError::UnterminatedComment { span });
                    }
                }
                continue;
            }
            return None;
        }
    }

    fn start(&self) -> Start {
        Start {
            offset: self.cursor.offset(),
            line: self.cursor.line(),
            col: self.cursor.column(),
        }
    }

    fn span_from(&self, start: Start) -> Span {
        Span::new(
            start.offset,
            start.line,
            start.col,
            self.cursor.offset() - start.offset,
        )
    }

    fn make_eof(&self) -> Token<'src> {
        let span = Span::point(self.cursor.offset(), self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    /// Create a token from start position to current position.
    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'src> {
        let lexeme = &self.cursor.source()[start.offset as usize..self.cursor.offset() as usize];
        Token::new(kind, lexeme, self.span_from(start))
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'src> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, "", span)
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a quoted string. Escapes are kept verbatim in the lexeme and
    /// decoded by the parser.
    fn scan_string(&mut self, quote: char, start: Start) -> Token<'src> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    return self.make_error(LexError::UnterminatedString { span });
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, start: Start) -> Token<'src> {
        if self.cursor.check_str("0x") || self.cursor.check_str("0X") {
            self.cursor.advance();
            self.cursor.advance();
            let digits = self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            if digits.is_empty() {
                let span = self.span_from(start);
                return self.make_error(LexError::InvalidNumber {
                    span,
                    detail: "missing hexadecimal digits".to_string(),
                });
            }
            return self.make_token(TokenKind::IntLiteral, start);
        }

        let mut kind = TokenKind::IntLiteral;
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            kind = TokenKind::FloatLiteral;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if self.cursor.check(|c| c == 'e' || c == 'E') {
            let signed = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.cursor.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                kind = TokenKind::FloatLiteral;
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }

        if self.cursor.check(is_ident_start) {
            let suffix = self.cursor.eat_while(is_ident_continue);
            let span = self.span_from(start);
            return self.make_error(LexError::InvalidNumber {
                span,
                detail: format!("unexpected suffix '{suffix}'"),
            });
        }

        self.make_token(kind, start)
    }

    // =========================================
    // Scanning: Identifiers
    // =========================================

    fn scan_identifier(&mut self, start: Start) -> Token<'src> {
        let ident = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(ident).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_operator(&mut self, start: Start) -> Token<'src> {
        use TokenKind::*;

        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };

        let kind = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            '[' => LeftBracket,
            ']' => RightBracket,
            ',' => Comma,
            ';' => Semicolon,
            ':' => Colon,
            '?' => Question,
            '+' => self.with_equal(Plus, PlusEqual),
            '-' => self.with_equal(Minus, MinusEqual),
            '*' => {
                if self.cursor.eat('*') {
                    StarStar
                } else {
                    self.with_equal(Star, StarEqual)
                }
            }
            '/' => self.with_equal(Slash, SlashEqual),
            '%' => self.with_equal(Percent, PercentEqual),
            '=' => self.with_equal(Equal, EqualEqual),
            '!' => self.with_equal(Bang, BangEqual),
            '<' => self.with_equal(Less, LessEqual),
            '>' => self.with_equal(Greater, GreaterEqual),
            '&' if self.cursor.eat('&') => AmpAmp,
            '|' if self.cursor.eat('|') => PipePipe,
            ch => {
                let span = self.span_from(start);
                return self.make_error(LexError::UnexpectedChar { ch, span });
            }
        };

        self.make_token(kind, start)
    }

    /// Pick `compound` if the next character is `=`.
    fn with_equal(&mut self, plain: TokenKind, compound: TokenKind) -> TokenKind {
        if self.cursor.eat('=') {
            compound
        } else {
            plain
        }
    }
}

#[derive(Clone, Copy)]
struct Start {
    offset: u32,
    line: u32,
    col: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn function_declaration() {
        use TokenKind::*;
        assert_eq!(
            kinds("int f1(int x, int y = 2) { return x + y; }"),
            vec![
                Identifier, Identifier, LeftParen, Identifier, Identifier, Comma, Identifier,
                Identifier, Equal, IntLiteral, RightParen, LeftBrace, Return, Identifier, Plus,
                Identifier, Semicolon, RightBrace, Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 2.5 .5 1e10 2E-3 0xFF 3"),
            vec![
                IntLiteral, FloatLiteral, FloatLiteral, FloatLiteral, FloatLiteral, IntLiteral,
                IntLiteral, Eof,
            ]
        );
    }

    #[test]
    fn operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("** *= == != <= >= && || ! ? : %"),
            vec![
                StarStar, StarEqual, EqualEqual, BangEqual, LessEqual, GreaterEqual, AmpAmp,
                PipePipe, Bang, Question, Colon, Percent, Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        use TokenKind::*;
        assert_eq!(
            kinds("// line\nx /* block\n comment */ y"),
            vec![Identifier, Identifier, Eof]
        );
    }

    #[test]
    fn string_with_escapes_keeps_lexeme() {
        let (tokens, errors) = Lexer::new(r#""a \"b\" c""#).tokenize();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, r#""a \"b\" c""#);
    }

    #[test]
    fn spans_carry_offsets() {
        let (tokens, _) = Lexer::new("int\n  foo").tokenize();
        assert_eq!(tokens[1].span.start, 6);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.col, 3);
        assert_eq!(tokens[1].span.len, 3);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (tokens, errors) = Lexer::new("\"abc").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn unexpected_character() {
        let (_, errors) = Lexer::new("a # b").tokenize();
        assert!(matches!(errors[0], LexError::UnexpectedChar { ch: '#', .. }));
    }

    #[test]
    fn unterminated_comment() {
        let (_, errors) = Lexer::new("x /* never closed").tokenize();
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek_nth(1).lexeme, "b");
        assert_eq!(lexer.peek().lexeme, "a");
        assert_eq!(lexer.next_token().lexeme, "a");
        assert_eq!(lexer.next_token().lexeme, "b");
        assert!(!lexer.has_errors());
    }

    #[test]
    fn take_errors_drains() {
        let mut lexer = Lexer::new("a # b");
        while lexer.next_token().kind != TokenKind::Eof {}
        assert!(lexer.has_errors());
        assert_eq!(lexer.take_errors().len(), 1);
        assert!(!lexer.has_errors());
    }
}
