//! Top-level declaration AST nodes.

use std::fmt;

use wirescript_core::Span;

use crate::ast::{Block, Expr, Ident};

/// A top-level item in a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDecl),
    Global(GlobalDecl),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Function(f) => f.span,
            Item::Global(g) => g.span,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Function(f) => &f.name.name,
            Item::Global(g) => &g.name.name,
        }
    }
}

/// A type annotation. Types are informational only: any identifier is
/// accepted, followed by zero or more `[]` suffixes.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub name: String,
    pub array_depth: u32,
    pub span: Span,
}

impl TypeExpr {
    /// The `auto` type, used where no declared type exists.
    pub fn auto(span: Span) -> Self {
        Self {
            name: "auto".to_string(),
            array_depth: 0,
            span,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for _ in 0..self.array_depth {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A metadata attribute written as `[name]` before a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeExpr,
    pub name: Ident,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A function declaration.
///
/// The span covers the declaration from its first attribute (or return type)
/// to the closing brace of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub attributes: Vec<Attribute>,
    pub return_type: TypeExpr,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

impl FunctionDecl {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name.name == name)
    }
}

/// A global variable: `Type name = init;`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    pub ty: TypeExpr,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}
