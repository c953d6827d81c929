//! Name-based argument resolution.
//!
//! Each parameter binds to the first of: an override with its name, the
//! script function with its name (resolved recursively), its own default.
//! Functions still being resolved sit on an explicit stack so that a
//! dependency chain revisiting one of them is reported as a cycle.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use wirescript_core::Value;
use wirescript_parser::ast::Expr;
use wirescript_registry::{FunctionDef, ParamSpec, SignatureRegistry};

use crate::interp::{Globals, Interpreter};
use crate::{EngineConfig, Error, OverrideMap, Result};

/// Mutable state of one engine session.
#[derive(Debug, Default)]
pub(crate) struct Session {
    /// Results by function name, in call order.
    pub cache: IndexMap<String, Value>,
    /// Functions currently being resolved, outermost first.
    pub active: Vec<String>,
    /// Override names that bound something.
    pub consumed: FxHashSet<String>,
}

/// Where a parameter's value comes from.
#[derive(Debug)]
enum Binding<'m> {
    Override(&'m Value),
    Dependency(&'m FunctionDef),
    Default(&'m Expr),
}

/// Resolution over the read-only parts of a module and its session.
pub(crate) struct Resolver<'m> {
    pub registry: &'m SignatureRegistry,
    pub globals: &'m Globals,
    pub overrides: &'m OverrideMap,
    pub config: &'m EngineConfig,
    pub session: &'m mut Session,
}

impl<'m> Resolver<'m> {
    /// Return the cached result of `name`, computing it if needed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&mut self, name: &str, caller: &str) -> Result<Value> {
        if let Some(value) = self.session.cache.get(name) {
            trace!(function = name, "cache hit");
            return Ok(value.clone());
        }

        if let Some(value) = self.overrides.get(name) {
            debug!(function = name, %caller, "function replaced by override");
            self.session.consumed.insert(name.to_string());
            self.session.cache.insert(name.to_string(), value.clone());
            return Ok(value.clone());
        }

        let registry = self.registry;
        let function = registry
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;

        self.session.active.push(name.to_string());
        let result = self
            .bind(function, caller)
            .and_then(|args| self.invoke(function, args));
        self.session.active.pop();

        let value = result?;
        self.session.cache.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Bind every parameter of `function`, reporting all missing ones together.
    fn bind(&mut self, function: &'m FunctionDef, caller: &str) -> Result<Vec<Value>> {
        let mut args = Vec::with_capacity(function.params.len());
        let mut missing = Vec::new();

        for param in &function.params {
            let value = match self.binding(param) {
                Some(Binding::Override(value)) => {
                    trace!(function = %function.name, param = %param.name, "bound to override");
                    self.session.consumed.insert(param.name.clone());
                    value.clone()
                }
                Some(Binding::Dependency(dependency)) => {
                    if self.session.active.iter().any(|n| *n == dependency.name) {
                        let mut path = self.session.active.clone();
                        path.push(dependency.name.clone());
                        return Err(Error::CycleDetected { path });
                    }
                    trace!(function = %function.name, param = %param.name, "bound to dependency");
                    self.call(&dependency.name, &function.name)?
                }
                Some(Binding::Default(expr)) => {
                    trace!(function = %function.name, param = %param.name, "bound to default");
                    self.interpreter()
                        .eval_global(expr)
                        .map_err(|e| Error::runtime(&function.name, e))?
                }
                None => {
                    missing.push(param.name.clone());
                    continue;
                }
            };
            args.push(value);
        }

        if !missing.is_empty() {
            return Err(Error::MissingArguments {
                function: function.name.clone(),
                caller: caller.to_string(),
                missing,
            });
        }
        Ok(args)
    }

    fn binding(&self, param: &'m ParamSpec) -> Option<Binding<'m>> {
        if let Some(value) = self.overrides.get(&param.name) {
            return Some(Binding::Override(value));
        }
        if let Some(dependency) = self.registry.get(&param.name) {
            return Some(Binding::Dependency(dependency));
        }
        param.default.as_ref().map(Binding::Default)
    }

    fn invoke(&self, function: &FunctionDef, args: Vec<Value>) -> Result<Value> {
        debug!(function = %function.name, "invoking");
        self.interpreter()
            .invoke(function, args)
            .map_err(|e| Error::runtime(&function.name, e))
    }

    fn interpreter(&self) -> Interpreter<'m> {
        Interpreter::new(self.registry, self.globals, self.config.max_call_depth)
    }
}
