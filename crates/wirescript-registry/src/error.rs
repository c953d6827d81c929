//! Errors raised while building a [`SignatureRegistry`](crate::SignatureRegistry).

use thiserror::Error;
use wirescript_core::Span;

/// A function declaration that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same parameter name appears twice in one signature.
    #[error("duplicate parameter '{param}' in function '{function}' at {span}")]
    DuplicateParameter {
        /// The function declaring the parameter.
        function: String,
        /// The repeated parameter name.
        param: String,
        /// Location of the second occurrence.
        span: Span,
    },

    /// A `[frozen]` function declares parameters.
    #[error("frozen function '{function}' must not take parameters at {span}")]
    InvalidFrozen {
        /// The offending function.
        function: String,
        /// Location of the declaration.
        span: Span,
    },
}
