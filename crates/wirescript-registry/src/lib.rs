//! Wirescript Registry crate.
//!
//! This crate extracts the callable surface of a parsed script: every
//! top-level function with its ordered parameters, defaults and body.
//! Nothing is executed while loading.
//!
//! # Example
//!
//! ```
//! use wirescript_parser::Parser;
//! use wirescript_registry::SignatureRegistry;
//!
//! let script = Parser::parse("int f1(int x, int y = 2) { return x + y; }").unwrap();
//! let registry = SignatureRegistry::load(&script).unwrap();
//!
//! let f1 = registry.get("f1").unwrap();
//! assert_eq!(f1.params[0].name, "x");
//! assert!(f1.params[1].has_default());
//! ```

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::{FROZEN_ATTRIBUTE, FunctionDef, ParamSpec, SignatureRegistry};
