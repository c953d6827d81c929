//! Error types shared by the wirescript crates.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError         - Lexer/tokenization errors
//! ParseError       - Parser errors (with ParseErrorKind)
//! ParseErrors      - Every error reported while parsing one source
//! RuntimeError     - Errors raised while evaluating a function body
//! NonSerializable  - A cache entry cannot be written out (never surfaced to callers)
//! ```

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    /// A numeric literal could not be parsed.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedComment { span } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    // Token-level errors
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// The lexer rejected part of the input.
    InvalidToken,

    // Expression errors
    /// An expression was expected.
    ExpectedExpression,
    /// The expression is not valid as an assignment target.
    InvalidAssignTarget,

    // Type errors
    /// A type was expected.
    ExpectedType,

    // Statement errors
    /// A block was expected.
    ExpectedBlock,

    // Declaration errors
    /// A declaration was expected.
    ExpectedDeclaration,

    // Identifier errors
    /// An identifier was expected.
    ExpectedIdentifier,

    // Control flow errors
    /// `break` used outside of a loop.
    BreakOutsideLoop,
    /// `continue` used outside of a loop.
    ContinueOutsideLoop,

    // Literal errors
    /// Invalid escape sequence in string literal.
    InvalidEscapeSequence,
    /// A literal value could not be parsed.
    InvalidLiteral,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::InvalidToken => "invalid token",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::InvalidAssignTarget => "invalid assignment target",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedBlock => "expected block",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::BreakOutsideLoop => "break outside loop",
            ParseErrorKind::ContinueOutsideLoop => "continue outside loop",
            ParseErrorKind::InvalidEscapeSequence => "invalid escape sequence",
            ParseErrorKind::InvalidLiteral => "invalid literal",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEof, span, "unexpected end of file")
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Format the error with source context for display.
    ///
    /// Shows the offending source line with a caret under the error location.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();
        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth((line as usize).saturating_sub(1)) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat((column as usize).saturating_sub(1));
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        let kind = match error {
            LexError::InvalidNumber { .. } => ParseErrorKind::InvalidLiteral,
            _ => ParseErrorKind::InvalidToken,
        };
        ParseError::new(kind, error.span(), error.to_string())
    }
}

/// A collection of parse errors.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Format every error with source context.
    pub fn display_with_source(&self, source: &str) -> String {
        self.errors
            .iter()
            .map(|e| e.display_with_source(source))
            .collect()
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised while evaluating script code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A name was read that is neither a local, a parameter nor a global.
    #[error("undefined variable '{name}' at {span}")]
    UndefinedVariable { name: String, span: Span },

    /// Globals cannot be assigned from function bodies.
    #[error("cannot assign to global '{name}' at {span}")]
    ReadOnlyGlobal { name: String, span: Span },

    /// A call named neither a script function nor a builtin.
    #[error("unknown function '{name}' at {span}")]
    UnknownFunction { name: String, span: Span },

    /// A direct call supplied the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// An operation was applied to values of the wrong type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A binary operator does not support this operand combination.
    #[error("unsupported operands for '{op}': {left} and {right}")]
    UnsupportedOperands {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Checked integer arithmetic overflowed.
    #[error("integer overflow in '{op}'")]
    IntegerOverflow { op: String },

    /// Array index out of range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Dictionary key not present.
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    /// Direct calls nested deeper than the configured limit.
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    /// A value could not be converted by a builtin.
    #[error("cannot convert {value} to {target}")]
    InvalidConversion { value: String, target: &'static str },
}

// ============================================================================
// Serialization
// ============================================================================

/// Why a value has no trivial literal form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NonSerializable {
    /// Opaque object instances have no literal syntax.
    #[error("opaque {class} instance")]
    Opaque { class: String },

    /// NaN and infinities have no literal syntax.
    #[error("non-finite float {value}")]
    NonFinite { value: f64 },

    /// The shape is excluded by the configured whitelist.
    #[error("{shape} values are not in the serializable whitelist")]
    ShapeNotAllowed { shape: &'static str },

    /// The name cannot be written as a function name.
    #[error("'{name}' is not a valid function name")]
    InvalidName { name: String },
}
