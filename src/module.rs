//! The user-facing engine.
//!
//! A [`Module`] owns one loaded script, its overrides and the resolution
//! cache of the current session.
//!
//! # Example
//!
//! ```
//! use wirescript::{Module, OverrideMap, Value};
//!
//! let source = r#"
//!     int z(int x) { return x * x; }
//!     int f2(int x, int z = 2) { return x + z; }
//! "#;
//!
//! let overrides = OverrideMap::parse(["x=3"]).unwrap();
//! let mut module = Module::from_source(source, overrides).unwrap();
//!
//! assert_eq!(module.call_fn("f2", "example").unwrap(), Value::Int(12));
//! assert_eq!(module.cache().keys().collect::<Vec<_>>(), vec!["z", "f2"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use wirescript_core::Value;
use wirescript_parser::{Parser, Script};
use wirescript_registry::SignatureRegistry;

use crate::interp::{Globals, Interpreter};
use crate::resolve::{Resolver, Session};
use crate::{EngineConfig, Error, OverrideMap, Result};

/// A loaded script ready for name-based calls.
#[derive(Debug)]
pub struct Module {
    /// File the script was read from, if any.
    path: Option<PathBuf>,
    script: Script,
    registry: SignatureRegistry,
    globals: Globals,
    overrides: OverrideMap,
    config: EngineConfig,
    session: Session,
}

impl Module {
    /// Load a script file.
    pub fn from_script(path: impl AsRef<Path>, overrides: OverrideMap) -> Result<Self> {
        Self::from_script_with_config(path, overrides, EngineConfig::default())
    }

    /// Load a script file with explicit configuration.
    pub fn from_script_with_config(
        path: impl AsRef<Path>,
        overrides: OverrideMap,
        config: EngineConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut module = Self::with_config(&source, overrides, config)?;
        module.path = Some(path.to_path_buf());
        Ok(module)
    }

    /// Load a script from source text.
    pub fn from_source(source: &str, overrides: OverrideMap) -> Result<Self> {
        Self::with_config(source, overrides, EngineConfig::default())
    }

    /// Load a script from source text with explicit configuration.
    ///
    /// Globals are evaluated in declaration order, then `[frozen]` functions
    /// are seeded into the cache unless an override names them.
    pub fn with_config(source: &str, overrides: OverrideMap, config: EngineConfig) -> Result<Self> {
        let script = Parser::parse(source)?;
        let registry = SignatureRegistry::load(&script)?;
        let globals = evaluate_globals(&script, &registry, &config)?;

        let mut module = Self {
            path: None,
            script,
            registry,
            globals,
            overrides,
            config,
            session: Session::default(),
        };
        if module.config.seed_frozen {
            module.seed_frozen()?;
        }

        debug!(
            functions = module.registry.len(),
            globals = module.globals.len(),
            overrides = module.overrides.len(),
            cached = module.session.cache.len(),
            "module loaded"
        );
        Ok(module)
    }

    fn seed_frozen(&mut self) -> Result<()> {
        let mut interp = Interpreter::new(&self.registry, &self.globals, self.config.max_call_depth);
        for function in self.registry.frozen() {
            if self.overrides.contains(&function.name) {
                debug!(function = %function.name, "frozen value shadowed by override");
                continue;
            }
            let value = interp
                .invoke(function, Vec::new())
                .map_err(|e| Error::runtime(&function.name, e))?;
            self.session.cache.insert(function.name.clone(), value);
        }
        Ok(())
    }

    /// Call `name`, resolving its parameters by name.
    ///
    /// `caller` labels the request in error messages. Results are memoized:
    /// a function runs at most once per module.
    pub fn call_fn(&mut self, name: &str, caller: &str) -> Result<Value> {
        let mut resolver = Resolver {
            registry: &self.registry,
            globals: &self.globals,
            overrides: &self.overrides,
            config: &self.config,
            session: &mut self.session,
        };
        resolver.call(name, caller)
    }

    /// Memoized results in call order.
    pub fn cache(&self) -> &IndexMap<String, Value> {
        &self.session.cache
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.session.cache.contains_key(name)
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// File the script was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Override names that have not bound anything so far.
    pub fn unconsumed_overrides(&self) -> Vec<&str> {
        let unused: Vec<&str> = self
            .overrides
            .names()
            .filter(|name| !self.session.consumed.contains(*name))
            .collect();
        for name in &unused {
            warn!(name, "override not used by any resolution");
        }
        unused
    }
}

fn evaluate_globals(
    script: &Script,
    registry: &SignatureRegistry,
    config: &EngineConfig,
) -> Result<Globals> {
    let mut globals = Globals::default();
    for global in script.globals() {
        let value = match &global.init {
            Some(init) => Interpreter::new(registry, &globals, config.max_call_depth)
                .eval_global(init)
                .map_err(|e| Error::runtime(format!("global {}", global.name.name), e))?,
            None => Value::Null,
        };
        globals.insert(global.name.name.clone(), value);
    }
    Ok(globals)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        int BASE = 10;
        int SCALED = BASE * 2;

        int a(int b) { return b + 1; }
        int b(int c = BASE) { return c * 2; }
        int uses_global() { return SCALED; }
        int boom() { return 1 / 0; }
        int needs_boom(int boom) { return boom; }
        int with_dep(int b) { return b; }
    "#;

    fn module(overrides: &[&str]) -> Module {
        Module::from_source(SCRIPT, OverrideMap::parse(overrides).unwrap()).unwrap()
    }

    #[test]
    fn defaults_may_read_globals() {
        let mut m = module(&[]);
        assert_eq!(m.call_fn("a", "test").unwrap(), Value::Int(21));
        assert_eq!(m.cache().keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.call_fn("uses_global", "test").unwrap(), Value::Int(20));
    }

    #[test]
    fn cached_function_is_not_reinvoked() {
        let mut m = module(&[]);
        m.call_fn("b", "test").unwrap();
        m.call_fn("with_dep", "test").unwrap();
        m.call_fn("a", "test").unwrap();
        assert_eq!(m.cache().keys().collect::<Vec<_>>(), vec!["b", "with_dep", "a"]);
    }

    #[test]
    fn unknown_function() {
        let mut m = module(&[]);
        assert!(matches!(m.call_fn("nope", "test"), Err(Error::UnknownFunction(ref n)) if n == "nope"));
    }

    #[test]
    fn override_makes_unknown_name_callable() {
        let mut m = module(&["nope=4"]);
        assert_eq!(m.call_fn("nope", "test").unwrap(), Value::Int(4));
        assert!(m.is_cached("nope"));
    }

    #[test]
    fn runtime_failure_leaves_no_entry() {
        let mut m = module(&[]);
        let err = m.call_fn("needs_boom", "test").unwrap_err();
        assert!(matches!(err, Error::Runtime { ref function, .. } if function == "boom"));
        assert!(m.cache().is_empty());
        assert!(m.session.active.is_empty());
    }

    #[test]
    fn unconsumed_overrides_are_reported() {
        let mut m = module(&["c=1", "unused=2"]);
        assert_eq!(m.unconsumed_overrides(), vec!["c", "unused"]);
        assert_eq!(m.call_fn("b", "test").unwrap(), Value::Int(2));
        assert_eq!(m.unconsumed_overrides(), vec!["unused"]);
    }

    #[test]
    fn global_errors_fail_construction() {
        let err = Module::from_source("int X = 1 / 0;", OverrideMap::new()).unwrap_err();
        assert!(matches!(err, Error::Runtime { ref function, .. } if function == "global X"));
    }

    #[test]
    fn parse_and_registry_errors_surface() {
        assert!(matches!(
            Module::from_source("int f( {", OverrideMap::new()),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            Module::from_source("int f(int a, int a) { return a; }", OverrideMap::new()),
            Err(Error::Registry(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Module::from_script("/nonexistent/dir/script.ws", OverrideMap::new()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
