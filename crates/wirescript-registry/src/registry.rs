//! SignatureRegistry - the callable surface of a script.
//!
//! The registry is built once from a parsed [`Script`] and is read-only
//! afterwards. Functions are stored by name in declaration order; when a name
//! is declared more than once the last declaration wins and takes the later
//! position, as if the earlier one had never been written.
//!
//! Globals are not part of the registry. They are evaluated by the engine.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use wirescript_core::Span;
use wirescript_parser::Script;
use wirescript_parser::ast::{Block, Expr, FunctionDecl, Item, TypeExpr};

use crate::RegistryError;

/// Attribute marking a function whose body is a serialized result.
pub const FROZEN_ATTRIBUTE: &str = "frozen";

/// One parameter of a registered function.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name, which is also the dependency name it resolves to.
    pub name: String,
    /// Declared type. Informational only.
    pub ty: TypeExpr,
    /// Default expression, evaluated in global scope when used.
    pub default: Option<Expr>,
}

impl ParamSpec {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A registered function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<ParamSpec>,
    /// Declared return type. Informational only.
    pub return_type: TypeExpr,
    pub body: Block,
    /// Attribute names, in source order.
    pub attributes: Vec<String>,
    /// Verbatim text of the declaration, attributes included.
    pub source: String,
    /// Whether this is a `[frozen]` literal function.
    pub frozen: bool,
    pub span: Span,
}

impl FunctionDef {
    fn from_decl(decl: &FunctionDecl, script: &Script) -> Result<Self, RegistryError> {
        let mut seen = FxHashSet::default();
        for param in &decl.params {
            if !seen.insert(param.name.name.as_str()) {
                return Err(RegistryError::DuplicateParameter {
                    function: decl.name.name.clone(),
                    param: param.name.name.clone(),
                    span: param.name.span,
                });
            }
        }

        let frozen = decl.has_attribute(FROZEN_ATTRIBUTE);
        if frozen && !decl.params.is_empty() {
            return Err(RegistryError::InvalidFrozen {
                function: decl.name.name.clone(),
                span: decl.span,
            });
        }

        Ok(Self {
            name: decl.name.name.clone(),
            params: decl
                .params
                .iter()
                .map(|p| ParamSpec {
                    name: p.name.name.clone(),
                    ty: p.ty.clone(),
                    default: p.default.clone(),
                })
                .collect(),
            return_type: decl.return_type.clone(),
            body: decl.body.clone(),
            attributes: decl.attributes.iter().map(|a| a.name.name.clone()).collect(),
            source: decl
                .span
                .slice(script.source())
                .unwrap_or_default()
                .to_string(),
            frozen,
            span: decl.span,
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// Functions of one script, keyed by name in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    functions: IndexMap<String, FunctionDef, FxBuildHasher>,
}

impl SignatureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every top-level function of a script.
    pub fn load(script: &Script) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for item in script.items() {
            if let Item::Function(decl) = item {
                registry.insert(FunctionDef::from_decl(decl, script)?);
            }
        }
        Ok(registry)
    }

    /// Insert a function, replacing and moving past any earlier definition.
    ///
    /// Returns the replaced definition.
    pub fn insert(&mut self, def: FunctionDef) -> Option<FunctionDef> {
        let previous = self.functions.shift_remove(&def.name);
        self.functions.insert(def.name.clone(), def);
        previous
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All functions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionDef> {
        self.functions.values()
    }

    /// Function names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// The `[frozen]` functions in declaration order.
    pub fn frozen(&self) -> impl Iterator<Item = &FunctionDef> {
        self.iter().filter(|f| f.frozen)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirescript_parser::Parser;

    fn load(source: &str) -> Result<SignatureRegistry, RegistryError> {
        SignatureRegistry::load(&Parser::parse(source).unwrap())
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = SignatureRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("f").is_none());
    }

    #[test]
    fn load_extracts_functions_in_order() {
        let registry = load(
            r#"
            int f1(int x, int y = 2) { return x + y; }
            int LIMIT = 3;
            int z(int x) { return x * x; }
            auto obj() { return object(); }
        "#,
        )
        .unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["f1", "z", "obj"]);
        assert!(!registry.contains("LIMIT"));

        let f1 = registry.get("f1").unwrap();
        let names: Vec<_> = f1.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(!f1.params[0].has_default());
        assert!(f1.params[1].has_default());
        assert_eq!(f1.return_type.to_string(), "int");
        assert_eq!(f1.source, "int f1(int x, int y = 2) { return x + y; }");
        assert!(!f1.frozen);
    }

    #[test]
    fn last_definition_wins_and_moves() {
        let registry = load(
            r#"
            int a() { return 1; }
            int b() { return 2; }
            int a(int b) { return b; }
        "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(registry.get("a").unwrap().params.len(), 1);
    }

    #[test]
    fn frozen_functions() {
        let registry = load(
            r#"
            int f1(int x) { return x; }
            [frozen]
            int f1() { return 7; }
            [frozen, pure]
            string name() { return "w"; }
        "#,
        )
        .unwrap();

        let frozen: Vec<_> = registry.frozen().map(|f| f.name.as_str()).collect();
        assert_eq!(frozen, vec!["f1", "name"]);
        assert!(registry.get("name").unwrap().has_attribute("pure"));
        assert!(registry.get("f1").unwrap().source.starts_with("[frozen]"));
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = load("int f(int x, int x) { return x; }").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateParameter { ref function, ref param, .. }
                if function == "f" && param == "x"
        ));
    }

    #[test]
    fn frozen_with_params_is_rejected() {
        let err = load("[frozen] int f(int x) { return x; }").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidFrozen { ref function, .. } if function == "f"));
    }
}
