//! Statement AST nodes.

use wirescript_core::Span;

use crate::ast::{Expr, Ident, TypeExpr};

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression evaluated for its effect
    Expr(ExprStmt),
    /// Local variable declaration
    VarDecl(VarDeclStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Block(Block),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    For(Box<ForStmt>),
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::VarDecl(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
        }
    }
}

/// A braced sequence of statements introducing a new scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `Type name = init;`; a missing initializer yields `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub ty: TypeExpr,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Stmt,
    pub span: Span,
}

/// `for (init; condition; update, ...) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// A variable declaration or expression statement.
    pub init: Option<Stmt>,
    pub condition: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Stmt,
    pub span: Span,
}
