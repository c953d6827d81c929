//! Expression AST nodes.
//!
//! # Expression Precedence
//!
//! The parser uses Pratt parsing with the following precedence levels:
//! 1. Assignment (=, +=, etc.) - right associative
//! 2. Ternary (?:) - right associative
//! 3. Logical OR (||)
//! 4. Logical AND (&&)
//! 5. Equality (==, !=)
//! 6. Relational (<, <=, >, >=)
//! 7. Additive (+, -)
//! 8. Multiplicative (*, /, %)
//! 9. Power (**) - right associative
//! 10. Prefix unary (-, +, !)
//! 11. Postfix (call, index)

use wirescript_core::Span;

use crate::ast::{AssignOp, BinaryOp, UnaryOp};

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(LiteralExpr),
    /// Identifier reference
    Ident(Ident),
    /// Binary operation
    Binary(Box<BinaryExpr>),
    /// Unary prefix operation
    Unary(Box<UnaryExpr>),
    /// Assignment
    Assign(Box<AssignExpr>),
    /// Ternary conditional (? :)
    Ternary(Box<TernaryExpr>),
    /// Function call
    Call(CallExpr),
    /// Array/dictionary indexing
    Index(Box<IndexExpr>),
    /// Array literal `{a, b}`
    Array(ArrayExpr),
    /// Dictionary literal `{"k": v}`
    Dict(DictExpr),
    /// Parenthesized expression
    Paren(Box<ParenExpr>),
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::Array(e) => e.span,
            Self::Dict(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Whether this expression is built only from literals.
    ///
    /// Unary signs on numbers count as literal (`-1`).
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Unary(e) => {
                matches!(e.op, UnaryOp::Neg | UnaryOp::Plus)
                    && matches!(
                        &e.operand,
                        Expr::Literal(LiteralExpr {
                            kind: LiteralKind::Int(_) | LiteralKind::Float(_),
                            ..
                        })
                    )
            }
            Self::Array(e) => e.elements.iter().all(Expr::is_constant),
            Self::Dict(e) => e
                .entries
                .iter()
                .all(|(k, v)| k.is_constant() && v.is_constant()),
            Self::Paren(e) => e.expr.is_constant(),
            _ => false,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// String literal with escapes already decoded
    String(String),
    Null,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub span: Span,
}

/// An assignment. The target is an identifier or an index expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Expr,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

/// A ternary conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub condition: Expr,
    pub then_expr: Expr,
    pub else_expr: Expr,
    pub span: Span,
}

/// A call of a named function with positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// An index operation `object[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub object: Expr,
    pub index: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictExpr {
    pub entries: Vec<(Expr, Expr)>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub expr: Expr,
    pub span: Span,
}
