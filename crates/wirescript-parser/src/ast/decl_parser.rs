//! Top-level declaration parsing.

use wirescript_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::decl::*;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    /// Parse one top-level item: a function or a global variable.
    pub fn parse_item(&mut self) -> Result<Item, ParseError> {
        let start = self.peek().span;
        let attributes = self.parse_attributes()?;

        let ty = self.parse_type().map_err(|e| {
            ParseError::new(ParseErrorKind::ExpectedDeclaration, e.span, e.message)
        })?;
        let name = self.expect_ident()?;

        if self.check(TokenKind::LeftParen) {
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let span = start.merge(body.span);
            return Ok(Item::Function(FunctionDecl {
                attributes,
                return_type: ty,
                name,
                params,
                body,
                span,
            }));
        }

        if let Some(attr) = attributes.first() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedDeclaration,
                attr.span,
                format!("attributes only apply to functions, '{}' is a variable", name.name),
            ));
        }

        let init = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "'(' or ';' after declaration name")?;
        let span = start.merge(self.previous_span());
        Ok(Item::Global(GlobalDecl {
            ty,
            name,
            init,
            span,
        }))
    }

    /// Parse zero or more `[name, name]` attribute groups.
    fn parse_attributes(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes = Vec::new();
        while self.eat(TokenKind::LeftBracket).is_some() {
            loop {
                let name = self.expect_ident()?;
                let span = name.span;
                attributes.push(Attribute { name, span });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightBracket, "']' after attributes")?;
        }
        Ok(attributes)
    }

    /// Parse `( Type name (= default)?, ... )`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                let default = if self.eat(TokenKind::Equal).is_some() {
                    Some(self.parse_expr(0)?)
                } else {
                    None
                };
                let end = default.as_ref().map_or(name.span, |d| d.span());
                let span = ty.span.merge(end);
                params.push(Param {
                    ty,
                    name,
                    default,
                    span,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "')' after parameters")?;
        Ok(params)
    }
}
