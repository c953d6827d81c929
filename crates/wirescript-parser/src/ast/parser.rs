//! Parser state, token helpers and the public entry points.

use wirescript_core::{ParseError, ParseErrorKind, ParseErrors, Span};

use crate::ast::{Expr, Ident, Script};
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser over a pre-lexed token stream.
///
/// Expression parsing lives in `expr_parser.rs`, statements in
/// `stmt_parser.rs` and top-level declarations in `decl_parser.rs`.
pub struct Parser<'src> {
    /// Tokens with lexer error placeholders removed. Always ends with EOF.
    tokens: Vec<Token<'src>>,
    /// Index of the next token.
    pos: usize,
    /// Errors reported by the lexer, merged into the final result.
    lex_errors: Vec<ParseError>,
    /// Number of enclosing loops, for `break`/`continue` validation.
    pub(super) loop_depth: u32,
    source_len: u32,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();
        Self {
            tokens: tokens
                .into_iter()
                .filter(|t| t.kind != TokenKind::Error)
                .collect(),
            pos: 0,
            lex_errors: lex_errors.into_iter().map(ParseError::from).collect(),
            loop_depth: 0,
            source_len: source.len() as u32,
        }
    }

    /// Parse a complete script, failing if any error was found.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str) -> Result<Script, ParseErrors> {
        let (script, errors) = Self::parse_lenient(source);
        if errors.is_empty() {
            Ok(script)
        } else {
            let mut all = ParseErrors::new();
            for error in errors {
                all.push(error);
            }
            Err(all)
        }
    }

    /// Parse a script, recovering from errors at item boundaries.
    ///
    /// Returns every item that parsed cleanly together with all errors,
    /// ordered by source position.
    pub fn parse_lenient(source: &str) -> (Script, Vec<ParseError>) {
        let mut parser = Parser::new(source);
        let mut items = Vec::new();
        let mut errors = Vec::new();

        while !parser.check(TokenKind::Eof) {
            let item_start = parser.pos;
            match parser.parse_item() {
                Ok(item) => items.push(item),
                Err(error) => {
                    errors.push(error);
                    parser.synchronize(item_start);
                }
            }
        }

        errors.append(&mut parser.lex_errors);
        errors.sort_by_key(|e| e.span.start);

        let span = Span::new(0, 1, 1, parser.source_len);
        (Script::new(items, source, span), errors)
    }

    /// Parse a single standalone expression.
    pub fn expression(source: &str) -> Result<Expr, ParseErrors> {
        let mut parser = Parser::new(source);
        let result = parser
            .parse_expr(0)
            .and_then(|expr| parser.expect(TokenKind::Eof, "end of expression").map(|_| expr));

        let mut errors = ParseErrors::new();
        for error in std::mem::take(&mut parser.lex_errors) {
            errors.push(error);
        }
        match result {
            Ok(expr) if errors.is_empty() => Ok(expr),
            Ok(_) => Err(errors),
            Err(error) => {
                if errors.is_empty() {
                    errors.push(error);
                }
                Err(errors)
            }
        }
    }

    // =========================================
    // Token helpers
    // =========================================

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Token<'src> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead; past the end this is the EOF token.
    pub(super) fn peek_nth(&self, n: usize) -> Token<'src> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    /// Consume the current token. EOF is never consumed.
    pub(super) fn advance(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or report what was found instead.
    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        if found.kind == TokenKind::Eof {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                found.span,
                format!("expected {what}, found end of file"),
            ));
        }
        Err(ParseError::expected_token(found.span, what, &found.describe()))
    }

    pub(super) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(ParseError::expected_identifier(token.span, &token.describe()))
        }
    }

    /// Span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.peek().span
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Skip the rest of a broken item so parsing can resume at the next one.
    ///
    /// Restarts from the item's first token and stops after a `;` at brace
    /// depth zero or after the brace that closes the item's first block.
    fn synchronize(&mut self, item_start: usize) {
        self.pos = item_start;
        let mut depth = 0u32;

        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightBrace => {
                    self.advance();
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.eat(TokenKind::Semicolon);
                        break;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }

        if self.pos == item_start {
            self.advance();
        }
    }
}
