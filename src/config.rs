//! Engine configuration.

use wirescript_core::SerializableShapes;

/// Default limit for nested direct calls inside function bodies.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Tunables for a [`Module`](crate::Module).
///
/// ```
/// use wirescript::{EngineConfig, SerializableShapes};
///
/// let config = EngineConfig::new()
///     .with_serializable(SerializableShapes::SCALARS)
///     .with_max_call_depth(64);
/// assert_eq!(config.max_call_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Value shapes that `serialize` writes as frozen literals.
    pub serializable: SerializableShapes,
    /// Maximum nesting of direct calls before evaluation fails.
    pub max_call_depth: usize,
    /// Whether `[frozen]` functions are loaded into the cache at construction.
    pub seed_frozen: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            serializable: SerializableShapes::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            seed_frozen: true,
        }
    }

    pub fn with_serializable(mut self, shapes: SerializableShapes) -> Self {
        self.serializable = shapes;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_seed_frozen(mut self, seed: bool) -> Self {
        self.seed_frozen = seed;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.serializable, SerializableShapes::all());
        assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert!(config.seed_frozen);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = EngineConfig::new()
            .with_serializable(SerializableShapes::INT | SerializableShapes::STRING)
            .with_max_call_depth(8)
            .with_seed_frozen(false);
        assert!(!config.serializable.contains(SerializableShapes::FLOAT));
        assert_eq!(config.max_call_depth, 8);
        assert!(!config.seed_frozen);
    }
}
