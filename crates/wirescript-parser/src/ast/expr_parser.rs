//! Expression parsing using Pratt parsing (precedence climbing).

use wirescript_core::{ParseError, ParseErrorKind, Span};

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::{AssignOp, BinaryOp, UnaryOp};
use crate::lexer::{Token, TokenKind};

/// Binding power of postfix call and index operators.
const POSTFIX_BP: u8 = 21;
/// Left binding power of the ternary operator.
const TERNARY_BP: u8 = 3;

impl<'src> Parser<'src> {
    /// Parse an expression with a minimum binding power.
    ///
    /// This is the core of the Pratt parser. It handles operator precedence
    /// by only consuming operators with sufficient binding power.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Function call
            if self.check(TokenKind::LeftParen) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_call(lhs)?;
                continue;
            }

            // Indexing
            if self.check(TokenKind::LeftBracket) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                let index = self.parse_expr(0)?;
                let end = self.expect(TokenKind::RightBracket, "']'")?.span;
                let span = lhs.span().merge(end);
                lhs = Expr::Index(Box::new(IndexExpr {
                    object: lhs,
                    index,
                    span,
                }));
                continue;
            }

            // Ternary operator (?:)
            if self.check(TokenKind::Question) {
                if TERNARY_BP < min_bp {
                    break;
                }
                self.advance();
                let then_expr = self.parse_expr(0)?;
                self.expect(TokenKind::Colon, "':' in conditional expression")?;
                let else_expr = self.parse_expr(TERNARY_BP)?;
                let span = lhs.span().merge(else_expr.span());
                lhs = Expr::Ternary(Box::new(TernaryExpr {
                    condition: lhs,
                    then_expr,
                    else_expr,
                    span,
                }));
                continue;
            }

            // Assignment operators
            if let Some(op) = AssignOp::from_token(self.peek().kind) {
                let (l_bp, r_bp) = AssignOp::binding_power();
                if l_bp < min_bp {
                    break;
                }
                if !matches!(lhs, Expr::Ident(_) | Expr::Index(_)) {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidAssignTarget,
                        lhs.span(),
                        "only variables and index expressions can be assigned",
                    ));
                }
                self.advance();
                let value = self.parse_expr(r_bp)?;
                let span = lhs.span().merge(value.span());
                lhs = Expr::Assign(Box::new(AssignExpr {
                    target: lhs,
                    op,
                    value,
                    span,
                }));
                continue;
            }

            // Binary operators
            if let Some(op) = BinaryOp::from_token(self.peek().kind) {
                let (l_bp, r_bp) = op.binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let right = self.parse_expr(r_bp)?;
                let span = lhs.span().merge(right.span());
                lhs = Expr::Binary(Box::new(BinaryExpr {
                    left: lhs,
                    op,
                    right,
                    span,
                }));
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    /// Parse a prefix expression (the start of an expression).
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value = parse_int(&token)?;
                Ok(literal(LiteralKind::Int(value), token.span))
            }

            TokenKind::FloatLiteral => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|e| {
                    ParseError::new(ParseErrorKind::InvalidLiteral, token.span, e.to_string())
                })?;
                Ok(literal(LiteralKind::Float(value), token.span))
            }

            TokenKind::StringLiteral => {
                self.advance();
                let value = unescape(&token)?;
                Ok(literal(LiteralKind::String(value), token.span))
            }

            TokenKind::True => {
                self.advance();
                Ok(literal(LiteralKind::Bool(true), token.span))
            }

            TokenKind::False => {
                self.advance();
                Ok(literal(LiteralKind::Bool(false), token.span))
            }

            TokenKind::Null => {
                self.advance();
                Ok(literal(LiteralKind::Null, token.span))
            }

            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Ident(Ident::new(token.lexeme, token.span)))
            }

            TokenKind::LeftParen => {
                let start = self.advance().span;
                let expr = self.parse_expr(0)?;
                let end = self.expect(TokenKind::RightParen, "')'")?.span;
                Ok(Expr::Paren(Box::new(ParenExpr {
                    expr,
                    span: start.merge(end),
                })))
            }

            TokenKind::LeftBrace => self.parse_init_list(),

            kind => {
                if let Some(op) = UnaryOp::from_token(kind) {
                    self.advance();
                    let operand = self.parse_expr(UnaryOp::binding_power())?;
                    let span = token.span.merge(operand.span());
                    return Ok(Expr::Unary(Box::new(UnaryExpr { op, operand, span })));
                }
                if kind == TokenKind::Eof {
                    return Err(ParseError::unexpected_eof(token.span));
                }
                Err(ParseError::expected_expression(token.span, &token.describe()))
            }
        }
    }

    /// Parse the argument list of a call. Only named functions are callable.
    fn parse_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let Expr::Ident(callee) = callee else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                self.peek().span,
                "only named functions can be called",
            ));
        };

        self.expect(TokenKind::LeftParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RightParen, "')' after arguments")?.span;
        let span = callee.span.merge(end);
        Ok(Expr::Call(CallExpr { callee, args, span }))
    }

    /// Parse an initializer list: `{}` / `{a, b}` arrays, `{:}` / `{"k": v}`
    /// dictionaries. Trailing commas are allowed.
    fn parse_init_list(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(TokenKind::LeftBrace, "'{'")?.span;

        if let Some(end) = self.eat(TokenKind::RightBrace) {
            return Ok(Expr::Array(ArrayExpr {
                elements: Vec::new(),
                span: start.merge(end.span),
            }));
        }

        if self.eat(TokenKind::Colon).is_some() {
            let end = self.expect(TokenKind::RightBrace, "'}' after '{:'")?.span;
            return Ok(Expr::Dict(DictExpr {
                entries: Vec::new(),
                span: start.merge(end),
            }));
        }

        let first = self.parse_expr(0)?;
        if self.eat(TokenKind::Colon).is_some() {
            let value = self.parse_expr(0)?;
            let mut entries = vec![(first, value)];
            while self.eat(TokenKind::Comma).is_some() {
                if self.check(TokenKind::RightBrace) {
                    break;
                }
                let key = self.parse_expr(0)?;
                self.expect(TokenKind::Colon, "':' after dictionary key")?;
                let value = self.parse_expr(0)?;
                entries.push((key, value));
            }
            let end = self.expect(TokenKind::RightBrace, "'}'")?.span;
            return Ok(Expr::Dict(DictExpr {
                entries,
                span: start.merge(end),
            }));
        }

        let mut elements = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            if self.check(TokenKind::RightBrace) {
                break;
            }
            elements.push(self.parse_expr(0)?);
        }
        let end = self.expect(TokenKind::RightBrace, "'}'")?.span;
        Ok(Expr::Array(ArrayExpr {
            elements,
            span: start.merge(end),
        }))
    }
}

fn literal(kind: LiteralKind, span: Span) -> Expr {
    Expr::Literal(LiteralExpr { kind, span })
}

fn parse_int(token: &Token<'_>) -> Result<i64, ParseError> {
    let lexeme = token.lexeme;
    let parsed = if let Some(hex) = lexeme
        .strip_prefix("0x")
        .or_else(|| lexeme.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else {
        lexeme.parse::<i64>()
    };
    parsed.map_err(|_| {
        ParseError::new(
            ParseErrorKind::InvalidLiteral,
            token.span,
            format!("integer literal '{lexeme}' is out of range"),
        )
    })
}

/// Decode the escapes of a quoted string lexeme (quotes included).
fn unescape(token: &Token<'_>) -> Result<String, ParseError> {
    let lexeme = token.lexeme;
    let inner = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    let invalid = |detail: String| {
        ParseError::new(ParseErrorKind::InvalidEscapeSequence, token.span, detail)
    };

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('u') => {
                if chars.next() != Some('{') {
                    return Err(invalid("expected '{' after \\u".to_string()));
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                        _ => return Err(invalid("malformed \\u{...} escape".to_string())),
                    }
                }
                let ch = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(format!("invalid code point \\u{{{hex}}}")))?;
                out.push(ch);
            }
            Some(other) => return Err(invalid(format!("unknown escape '\\{other}'"))),
            None => return Err(invalid("dangling backslash".to_string())),
        }
    }

    Ok(out)
}
