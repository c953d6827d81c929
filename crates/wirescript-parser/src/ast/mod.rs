//! Abstract Syntax Tree (AST) for wirescript.
//!
//! This module provides:
//! - AST node definitions for declarations, statements and expressions
//! - The [`Parser`] transforming tokens into AST
//!
//! # Example
//!
//! ```
//! use wirescript_parser::Parser;
//!
//! let source = r#"
//!     int f1(int x, int y = 2) { return x + y; }
//! "#;
//!
//! match Parser::parse(source) {
//!     Ok(script) => println!("Parsed successfully: {} items", script.items().len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

mod decl_parser;
mod expr_parser;
mod parser;
mod stmt_parser;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;

use wirescript_core::Span;

/// A parsed script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    items: Vec<Item>,
    source: String,
    span: Span,
}

impl Script {
    /// Create a new script from parsed items.
    pub(crate) fn new(items: Vec<Item>, source: &str, span: Span) -> Self {
        Self {
            items,
            source: source.to_string(),
            span,
        }
    }

    /// Get the top-level items in this script, in source order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterate over the function declarations.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            Item::Global(_) => None,
        })
    }

    /// Iterate over the global variable declarations.
    pub fn globals(&self) -> impl Iterator<Item = &GlobalDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Global(g) => Some(g),
            Item::Function(_) => None,
        })
    }

    /// The text this script was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The verbatim source text of an item.
    pub fn text_of(&self, item: &Item) -> &str {
        item.span().slice(&self.source).unwrap_or_default()
    }

    /// Get the source location span of this script.
    pub fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirescript_core::ParseErrorKind;

    #[test]
    fn parse_simple_function() {
        let script = Parser::parse("int foo() { return 1; }").unwrap();
        assert_eq!(script.items().len(), 1);
        let f = script.functions().next().unwrap();
        assert_eq!(f.name.name, "foo");
        assert!(f.params.is_empty());
    }

    #[test]
    fn parse_params_with_defaults() {
        let script = Parser::parse("int f1(int x, int y = 2) { return x + y; }").unwrap();
        let f = script.functions().next().unwrap();
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].name.name, "x");
        assert!(f.params[0].default.is_none());
        assert_eq!(f.params[1].ty.to_string(), "int");
        assert!(f.params[1].default.is_some());
    }

    #[test]
    fn parse_attributes_and_array_types() {
        let source = "[frozen]\nint[] values() { return {1, 2}; }";
        let script = Parser::parse(source).unwrap();
        let f = script.functions().next().unwrap();
        assert!(f.has_attribute("frozen"));
        assert_eq!(f.return_type.to_string(), "int[]");
        assert_eq!(f.span.slice(source), Some(source));
        assert_eq!(script.text_of(&script.items()[0]), source);
    }

    #[test]
    fn function_span_covers_declaration() {
        let source = "// header\nint a() { return 1; }\n\nint b(int a) { return a; }\n";
        let script = Parser::parse(source).unwrap();
        let spans: Vec<_> = script
            .functions()
            .map(|f| f.span.slice(source).unwrap())
            .collect();
        assert_eq!(spans, vec!["int a() { return 1; }", "int b(int a) { return a; }"]);
    }

    #[test]
    fn parse_globals() {
        let script = Parser::parse("int LIMIT = 10;\nstring name;\nint f() { return LIMIT; }").unwrap();
        assert_eq!(script.globals().count(), 2);
        assert_eq!(script.functions().count(), 1);
    }

    #[test]
    fn parse_statements() {
        let source = r#"
            int f(int n) {
                int total = 0;
                int[] seen = {};
                for (int i = 0; i < n; i += 1) {
                    if (i % 2 == 0) { continue; } else total += i;
                }
                while (total > 100) { total -= 1; break; }
                seen[0] = total;
                return total > 3 ? total : -total;
            }
        "#;
        let script = Parser::parse(source).unwrap();
        let f = script.functions().next().unwrap();
        assert_eq!(f.body.stmts.len(), 6);
        assert!(matches!(f.body.stmts[2], Stmt::For(_)));
        assert!(matches!(f.body.stmts[4], Stmt::Expr(_)));
    }

    #[test]
    fn break_outside_loop_is_rejected() {
        let errors = Parser::parse("int f() { break; }").unwrap_err();
        assert_eq!(errors.iter().next().unwrap().kind, ParseErrorKind::BreakOutsideLoop);
    }

    #[test]
    fn attributes_on_globals_are_rejected() {
        assert!(Parser::parse("[frozen] int x = 1;").is_err());
    }

    #[test]
    fn parse_with_errors() {
        let result = Parser::parse("int x = ;");
        assert!(result.is_err());
    }

    #[test]
    fn parse_lenient_recovers() {
        let source = r#"
            int x = ;
            int broken( { }
            int y = 42;
            int f() { return y; }
        "#;
        let (script, errors) = Parser::parse_lenient(source);
        assert!(!errors.is_empty());
        let names: Vec<_> = script.items().iter().map(Item::name).collect();
        assert!(names.contains(&"y"));
        assert!(names.contains(&"f"));
    }

    #[test]
    fn lexer_errors_are_reported() {
        let errors = Parser::parse("int f() { return 1 # 2; }").unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ParseErrorKind::InvalidToken));
    }

    #[test]
    fn parse_lenient_no_errors() {
        let (script, errors) = Parser::parse_lenient("int x = 42;");
        assert!(errors.is_empty());
        assert_eq!(script.items().len(), 1);
    }
}
