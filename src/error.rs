//! Errors raised by the resolution engine.

use std::path::PathBuf;

use thiserror::Error;
use wirescript_core::{ParseErrors, RuntimeError};
use wirescript_registry::RegistryError;

use crate::overrides::OverrideError;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested name is neither a function nor an override.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A dependency chain revisited a function still being resolved.
    ///
    /// `path` runs from the top-level target to the revisited name.
    #[error("loop detected: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    /// Parameters that no override, dependency or default could bind.
    #[error("Can't call {function}, missing args: [{}] (requested by {caller})", quoted(.missing))]
    MissingArguments {
        function: String,
        caller: String,
        missing: Vec<String>,
    },

    /// Evaluating a function body, default or global failed.
    #[error("error in {function}: {source}")]
    Runtime {
        function: String,
        #[source]
        source: RuntimeError,
    },

    #[error("parse failed:\n{0}")]
    Parse(#[from] ParseErrors),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Override(#[from] OverrideError),

    /// Serialization would replace the script it was loaded from.
    #[error("refusing to overwrite source script {}", .0.display())]
    WouldOverwriteSource(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn runtime(function: impl Into<String>, source: RuntimeError) -> Self {
        Error::Runtime {
            function: function.into(),
            source,
        }
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = Error::CycleDetected {
            path: vec!["loop1".into(), "loop2".into(), "loop1".into()],
        };
        assert_eq!(err.to_string(), "loop detected: loop1 -> loop2 -> loop1");
    }

    #[test]
    fn missing_arguments_message() {
        let err = Error::MissingArguments {
            function: "f1".into(),
            caller: "test".into(),
            missing: vec!["x".into(), "y".into()],
        };
        assert_eq!(
            err.to_string(),
            "Can't call f1, missing args: ['x', 'y'] (requested by test)"
        );
    }

    #[test]
    fn runtime_error_keeps_source() {
        let err = Error::runtime("f", RuntimeError::DivisionByZero);
        assert_eq!(err.to_string(), "error in f: division by zero");
        assert!(std::error::Error::source(&err).is_some());
    }
}
