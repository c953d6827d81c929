//! Statement parsing.

use wirescript_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::stmt::*;
use crate::ast::TypeExpr;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    /// Parse a braced block.
    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::LeftBrace {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedBlock,
                token.span,
                format!("expected '{{', found {}", token.describe()),
            ));
        }
        let start = self.advance().span;

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.check(TokenKind::Eof) {
                return Err(ParseError::unexpected_eof(self.peek().span));
            }
            stmts.push(self.parse_statement()?);
        }
        let end = self.advance().span;

        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    /// Parse a single statement.
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break | TokenKind::Continue => {
                self.advance();
                if self.loop_depth == 0 {
                    let (kind, word) = if token.kind == TokenKind::Break {
                        (ParseErrorKind::BreakOutsideLoop, "break")
                    } else {
                        (ParseErrorKind::ContinueOutsideLoop, "continue")
                    };
                    return Err(ParseError::new(
                        kind,
                        token.span,
                        format!("'{word}' is only allowed inside a loop"),
                    ));
                }
                let end = self.expect(TokenKind::Semicolon, "';'")?.span;
                let span = token.span.merge(end);
                Ok(if token.kind == TokenKind::Break {
                    Stmt::Break(span)
                } else {
                    Stmt::Continue(span)
                })
            }
            _ if self.at_declaration() => Ok(Stmt::VarDecl(self.parse_var_decl()?)),
            _ => {
                let expr = self.parse_expr(0)?;
                let end = self.expect(TokenKind::Semicolon, "';' after expression")?.span;
                let span = expr.span().merge(end);
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// Whether the upcoming tokens start a `Type name` declaration.
    ///
    /// `a b` and `a[] b` are declarations; `a[0] = b` is not.
    pub(super) fn at_declaration(&self) -> bool {
        if self.peek().kind != TokenKind::Identifier {
            return false;
        }
        let mut n = 1;
        while self.peek_nth(n).kind == TokenKind::LeftBracket
            && self.peek_nth(n + 1).kind == TokenKind::RightBracket
        {
            n += 2;
        }
        self.peek_nth(n).kind == TokenKind::Identifier
    }

    /// Parse a type annotation: identifier followed by `[]` suffixes.
    pub fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                token.span,
                format!("expected type, found {}", token.describe()),
            ));
        }
        self.advance();
        let mut span = token.span;
        let mut array_depth = 0;
        while self.check(TokenKind::LeftBracket) {
            self.advance();
            span = span.merge(self.expect(TokenKind::RightBracket, "']' in array type")?.span);
            array_depth += 1;
        }
        Ok(TypeExpr {
            name: token.lexeme.to_string(),
            array_depth,
            span,
        })
    }

    /// Parse `Type name (= init)? ;`.
    fn parse_var_decl(&mut self) -> Result<VarDeclStmt, ParseError> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let init = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let end = self.expect(TokenKind::Semicolon, "';' after variable declaration")?.span;
        let span = ty.span.merge(end);
        Ok(VarDeclStmt {
            ty,
            name,
            init,
            span,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        let end = self.expect(TokenKind::Semicolon, "';' after return")?.span;
        Ok(Stmt::Return(ReturnStmt {
            value,
            span: start.merge(end),
        }))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(TokenKind::LeftParen, "'(' after 'if'")?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen, "')' after condition")?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_statement()?)
        } else {
            None
        };
        let end = else_branch
            .as_ref()
            .map_or_else(|| then_branch.span(), Stmt::span);
        Ok(Stmt::If(Box::new(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: start.merge(end),
        })))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(TokenKind::LeftParen, "'(' after 'while'")?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen, "')' after condition")?;
        let body = self.parse_loop_body()?;
        let span = start.merge(body.span());
        Ok(Stmt::While(Box::new(WhileStmt {
            condition,
            body,
            span,
        })))
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(TokenKind::LeftParen, "'(' after 'for'")?;

        let init = if self.eat(TokenKind::Semicolon).is_some() {
            None
        } else if self.at_declaration() {
            Some(Stmt::VarDecl(self.parse_var_decl()?))
        } else {
            let expr = self.parse_expr(0)?;
            let end = self.expect(TokenKind::Semicolon, "';' after for initializer")?.span;
            let span = expr.span().merge(end);
            Some(Stmt::Expr(ExprStmt { expr, span }))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        self.expect(TokenKind::Semicolon, "';' after for condition")?;

        let mut update = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                update.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')' after for clauses")?;

        let body = self.parse_loop_body()?;
        let span = start.merge(body.span());
        Ok(Stmt::For(Box::new(ForStmt {
            init,
            condition,
            update,
            body,
            span,
        })))
    }

    fn parse_loop_body(&mut self) -> Result<Stmt, ParseError> {
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        body
    }
}
