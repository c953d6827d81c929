//! Wirescript Parser crate.
//!
//! This crate provides the lexer and parser for wirescript source code.
//! It includes:
//! - Lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - Parser for transforming tokens into AST, with item-level error recovery
//!
//! # Example
//!
//! ```
//! use wirescript_parser::Parser;
//!
//! let source = r#"
//!     int z(int x) { return x * x; }
//!     int f2(int x, int z = 2) { return x + z; }
//! "#;
//!
//! match Parser::parse(source) {
//!     Ok(script) => println!("Parsed successfully: {} items", script.items().len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

// Lexer module
pub mod lexer;

// AST module
pub mod ast;

// Re-export commonly used types at crate root
pub use ast::{Parser, Script};
pub use lexer::{Lexer, Token, TokenKind, is_identifier};
