//! Local variable storage for one function activation.
//!
//! Block scopes are tracked by depth in a single map. Shadowed bindings are
//! saved when an inner block redeclares a name and restored when that block
//! ends.

use rustc_hash::FxHashMap;
use wirescript_core::Value;

#[derive(Debug, Clone)]
struct Local {
    value: Value,
    depth: u32,
}

/// Locals of the function currently executing.
#[derive(Debug, Default)]
pub(crate) struct LocalScope {
    variables: FxHashMap<String, Local>,
    /// Current block depth (0 = parameter scope)
    depth: u32,
    /// (shadowing depth, name, shadowed binding)
    shadowed: Vec<(u32, String, Local)>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope with the function's parameters bound at depth 0.
    pub fn with_params<I>(params: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut scope = Self::new();
        for (name, value) in params {
            scope.declare(name, value);
        }
        scope
    }

    /// Enter a block.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave a block, dropping its locals and restoring what they shadowed.
    pub fn pop_scope(&mut self) {
        let depth = self.depth;
        self.variables.retain(|_, local| local.depth < depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != depth {
                break;
            }
            if let Some((_, name, local)) = self.shadowed.pop() {
                self.variables.insert(name, local);
            }
        }

        self.depth = depth.saturating_sub(1);
    }

    /// Declare a local in the current block.
    ///
    /// Redeclaring in the same block replaces the value.
    pub fn declare(&mut self, name: String, value: Value) {
        let local = Local {
            value,
            depth: self.depth,
        };
        if let Some(existing) = self.variables.insert(name.clone(), local) {
            if existing.depth < self.depth {
                self.shadowed.push((self.depth, name, existing));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).map(|local| &local.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.variables.get_mut(name).map(|local| &mut local.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_visible() {
        let scope = LocalScope::with_params([("x".to_string(), Value::Int(1))]);
        assert_eq!(scope.get("x"), Some(&Value::Int(1)));
        assert_eq!(scope.get("y"), None);
    }

    #[test]
    fn shadowing_is_restored() {
        let mut scope = LocalScope::with_params([("x".to_string(), Value::Int(1))]);
        scope.push_scope();
        scope.declare("x".to_string(), Value::Int(2));
        scope.declare("y".to_string(), Value::Int(3));
        assert_eq!(scope.get("x"), Some(&Value::Int(2)));
        scope.pop_scope();
        assert_eq!(scope.get("x"), Some(&Value::Int(1)));
        assert_eq!(scope.get("y"), None);
    }

    #[test]
    fn assignment_reaches_outer_binding() {
        let mut scope = LocalScope::with_params([("total".to_string(), Value::Int(0))]);
        scope.push_scope();
        *scope.get_mut("total").unwrap() = Value::Int(5);
        scope.pop_scope();
        assert_eq!(scope.get("total"), Some(&Value::Int(5)));
    }

    #[test]
    fn redeclaration_in_same_block_replaces() {
        let mut scope = LocalScope::new();
        scope.push_scope();
        scope.declare("a".to_string(), Value::Int(1));
        scope.declare("a".to_string(), Value::Int(2));
        assert_eq!(scope.get("a"), Some(&Value::Int(2)));
        scope.pop_scope();
        assert_eq!(scope.get("a"), None);
    }
}
