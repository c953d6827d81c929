//! Core types shared by the wirescript crates.
//!
//! This crate contains:
//! - [`Span`] for source locations
//! - [`Value`], the runtime value model, and the [`SerializableShapes`]
//!   whitelist that decides which values have a literal form
//! - The error types of every phase (lexing, parsing, evaluation)

mod error;
mod span;
mod value;

pub use error::{LexError, NonSerializable, ParseError, ParseErrorKind, ParseErrors, RuntimeError};
pub use span::Span;
pub use value::{ObjectHandle, SerializableShapes, Value};
