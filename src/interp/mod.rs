//! Tree-walking evaluation of function bodies, defaults and globals.
//!
//! Calls written inside a body are ordinary calls: arguments are positional,
//! missing trailing arguments take their defaults, and nothing goes through
//! the resolution cache.

mod builtins;
mod ops;
mod scope;

pub use builtins::BUILTINS;

use indexmap::IndexMap;
use wirescript_core::{RuntimeError, Value};
use wirescript_parser::ast::{
    AssignExpr, BinaryOp, Block, CallExpr, Expr, ForStmt, LiteralKind, Stmt, UnaryOp,
};
use wirescript_registry::{FunctionDef, SignatureRegistry};

use scope::LocalScope;

/// Evaluated global variables, in declaration order.
pub type Globals = IndexMap<String, Value>;

/// How a statement finished.
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Evaluator over one registry and one set of globals.
pub(crate) struct Interpreter<'m> {
    registry: &'m SignatureRegistry,
    globals: &'m Globals,
    max_depth: usize,
    depth: usize,
}

impl<'m> Interpreter<'m> {
    pub fn new(registry: &'m SignatureRegistry, globals: &'m Globals, max_depth: usize) -> Self {
        Self {
            registry,
            globals,
            max_depth,
            depth: 0,
        }
    }

    /// Run a function with fully bound arguments, in parameter order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke(&mut self, function: &FunctionDef, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.max_depth,
            });
        }

        let mut locals = LocalScope::with_params(
            function
                .params
                .iter()
                .map(|p| p.name.clone())
                .zip(args),
        );

        self.depth += 1;
        let flow = self.exec_block(&mut locals, &function.body);
        self.depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }

    /// Evaluate an expression with only globals in scope.
    pub fn eval_global(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        self.eval(&mut LocalScope::new(), expr)
    }

    // =========================================
    // Statements
    // =========================================

    fn exec_block(&mut self, locals: &mut LocalScope, block: &Block) -> Result<Flow, RuntimeError> {
        locals.push_scope();
        let flow = self.exec_stmts(locals, &block.stmts);
        locals.pop_scope();
        flow
    }

    fn exec_stmts(&mut self, locals: &mut LocalScope, stmts: &[Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            match self.exec_stmt(locals, stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, locals: &mut LocalScope, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expr(s) => {
                self.eval(locals, &s.expr)?;
                Ok(Flow::Normal)
            }
            Stmt::VarDecl(s) => {
                let value = match &s.init {
                    Some(init) => self.eval(locals, init)?,
                    None => Value::Null,
                };
                locals.declare(s.name.name.clone(), value);
                Ok(Flow::Normal)
            }
            Stmt::Return(s) => {
                let value = match &s.value {
                    Some(expr) => self.eval(locals, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Break(_) => Ok(Flow::Break),
            Stmt::Continue(_) => Ok(Flow::Continue),
            Stmt::Block(block) => self.exec_block(locals, block),
            Stmt::If(s) => {
                if self.eval(locals, &s.condition)?.is_truthy() {
                    self.exec_stmt(locals, &s.then_branch)
                } else if let Some(else_branch) = &s.else_branch {
                    self.exec_stmt(locals, else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While(s) => {
                while self.eval(locals, &s.condition)?.is_truthy() {
                    match self.exec_stmt(locals, &s.body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For(s) => {
                locals.push_scope();
                let flow = self.exec_for(locals, s);
                locals.pop_scope();
                flow
            }
        }
    }

    fn exec_for(&mut self, locals: &mut LocalScope, s: &ForStmt) -> Result<Flow, RuntimeError> {
        if let Some(init) = &s.init {
            self.exec_stmt(locals, init)?;
        }
        loop {
            if let Some(condition) = &s.condition {
                if !self.eval(locals, condition)?.is_truthy() {
                    break;
                }
            }
            match self.exec_stmt(locals, &s.body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
            for update in &s.update {
                self.eval(locals, update)?;
            }
        }
        Ok(Flow::Normal)
    }

    // =========================================
    // Expressions
    // =========================================

    fn eval(&mut self, locals: &mut LocalScope, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(literal(&lit.kind)),
            Expr::Ident(ident) => locals
                .get(&ident.name)
                .or_else(|| self.globals.get(&ident.name))
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: ident.name.clone(),
                    span: ident.span,
                }),
            Expr::Binary(e) => match e.op {
                BinaryOp::LogicalOr => {
                    let truthy = self.eval(locals, &e.left)?.is_truthy()
                        || self.eval(locals, &e.right)?.is_truthy();
                    Ok(Value::Bool(truthy))
                }
                BinaryOp::LogicalAnd => {
                    let truthy = self.eval(locals, &e.left)?.is_truthy()
                        && self.eval(locals, &e.right)?.is_truthy();
                    Ok(Value::Bool(truthy))
                }
                op => {
                    let left = self.eval(locals, &e.left)?;
                    let right = self.eval(locals, &e.right)?;
                    ops::binary(op, left, right)
                }
            },
            Expr::Unary(e) => {
                let operand = self.eval(locals, &e.operand)?;
                ops::unary(e.op, operand)
            }
            Expr::Assign(e) => self.assign(locals, e),
            Expr::Ternary(e) => {
                if self.eval(locals, &e.condition)?.is_truthy() {
                    self.eval(locals, &e.then_expr)
                } else {
                    self.eval(locals, &e.else_expr)
                }
            }
            Expr::Call(call) => self.call(locals, call),
            Expr::Index(e) => {
                let object = self.eval(locals, &e.object)?;
                let key = self.eval(locals, &e.index)?;
                ops::index(&object, &key)
            }
            Expr::Array(e) => e
                .elements
                .iter()
                .map(|element| self.eval(locals, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Dict(e) => {
                let mut entries = IndexMap::with_capacity(e.entries.len());
                for (key, value) in &e.entries {
                    let key = match self.eval(locals, key)? {
                        Value::String(s) => s,
                        other => {
                            return Err(RuntimeError::TypeMismatch {
                                expected: "string key".to_string(),
                                actual: other.type_name().to_string(),
                            });
                        }
                    };
                    let value = self.eval(locals, value)?;
                    entries.insert(key, value);
                }
                Ok(Value::Dict(entries))
            }
            Expr::Paren(e) => self.eval(locals, &e.expr),
        }
    }

    fn assign(&mut self, locals: &mut LocalScope, e: &AssignExpr) -> Result<Value, RuntimeError> {
        let value = self.eval(locals, &e.value)?;

        let mut keys = Vec::new();
        let mut target = &e.target;
        while let Expr::Index(index) = target {
            keys.push(&index.index);
            target = &index.object;
        }
        let Expr::Ident(root) = target else {
            return Err(RuntimeError::TypeMismatch {
                expected: "assignable variable".to_string(),
                actual: "expression".to_string(),
            });
        };
        let keys = keys
            .into_iter()
            .rev()
            .map(|key| self.eval(locals, key))
            .collect::<Result<Vec<_>, _>>()?;

        let globals = self.globals;
        let slot = locals.get_mut(&root.name).ok_or_else(|| {
            if globals.contains_key(&root.name) {
                RuntimeError::ReadOnlyGlobal {
                    name: root.name.clone(),
                    span: root.span,
                }
            } else {
                RuntimeError::UndefinedVariable {
                    name: root.name.clone(),
                    span: root.span,
                }
            }
        })?;
        let place = ops::index_mut(slot, &keys)?;

        let value = match e.op.binary_op() {
            Some(op) => ops::binary(op, place.clone(), value)?,
            None => value,
        };
        *place = value.clone();
        Ok(value)
    }

    fn call(&mut self, locals: &mut LocalScope, call: &CallExpr) -> Result<Value, RuntimeError> {
        let args = call
            .args
            .iter()
            .map(|arg| self.eval(locals, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let name = &call.callee.name;
        let registry = self.registry;
        if let Some(function) = registry.get(name) {
            tracing::trace!(function = %name, "direct call");
            return self.call_function(function, args);
        }
        builtins::call(name, args).unwrap_or_else(|| {
            Err(RuntimeError::UnknownFunction {
                name: name.clone(),
                span: call.callee.span,
            })
        })
    }

    /// Positional call; missing trailing arguments take their defaults.
    fn call_function(&mut self, function: &FunctionDef, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
        let total = function.params.len();
        let required = function
            .params
            .iter()
            .rposition(|p| !p.has_default())
            .map_or(0, |i| i + 1);
        let count_error = |actual| RuntimeError::ArgumentCount {
            function: function.name.clone(),
            expected: if required == total {
                total.to_string()
            } else {
                format!("{required} to {total}")
            },
            actual,
        };

        if args.len() > total {
            return Err(count_error(args.len()));
        }
        let given = args.len();
        for param in &function.params[given..] {
            match &param.default {
                Some(default) => args.push(self.eval_global(default)?),
                None => return Err(count_error(given)),
            }
        }
        self.invoke(function, args)
    }
}

/// Fold an expression made only of literals.
///
/// Returns `None` for anything that needs evaluation.
pub(crate) fn constant_value(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Literal(lit) => Some(literal(&lit.kind)),
        Expr::Unary(e) => match (e.op, constant_value(&e.operand)?) {
            (UnaryOp::Neg, Value::Int(i)) => i.checked_neg().map(Value::Int),
            (UnaryOp::Neg, Value::Float(f)) => Some(Value::float(-f.0)),
            (UnaryOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => Some(v),
            _ => None,
        },
        Expr::Array(e) => e
            .elements
            .iter()
            .map(constant_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        Expr::Dict(e) => {
            let mut entries = IndexMap::with_capacity(e.entries.len());
            for (key, value) in &e.entries {
                let Value::String(key) = constant_value(key)? else {
                    return None;
                };
                entries.insert(key, constant_value(value)?);
            }
            Some(Value::Dict(entries))
        }
        Expr::Paren(e) => constant_value(&e.expr),
        _ => None,
    }
}

fn literal(kind: &LiteralKind) -> Value {
    match kind {
        LiteralKind::Int(i) => Value::Int(*i),
        LiteralKind::Float(f) => Value::float(*f),
        LiteralKind::Bool(b) => Value::Bool(*b),
        LiteralKind::String(s) => Value::String(s.clone()),
        LiteralKind::Null => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirescript_parser::Parser;

    fn registry(source: &str) -> SignatureRegistry {
        SignatureRegistry::load(&Parser::parse(source).unwrap()).unwrap()
    }

    fn run(source: &str, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let registry = registry(source);
        let globals = Globals::default();
        let mut interp = Interpreter::new(&registry, &globals, 64);
        let function = registry.get(name).unwrap();
        interp.invoke(function, args)
    }

    #[test]
    fn arithmetic_and_return() {
        let source = "int f1(int x, int y = 2) { return x + y; }";
        assert_eq!(run(source, "f1", vec![Value::Int(3), Value::Int(5)]), Ok(Value::Int(8)));
    }

    #[test]
    fn missing_return_is_null() {
        assert_eq!(run("void f() { int a = 1; }", "f", vec![]), Ok(Value::Null));
    }

    #[test]
    fn loops_and_locals() {
        let source = r#"
            int sum(int n) {
                int total = 0;
                for (int i = 0; i < n; i += 1) {
                    if (i % 2 == 1) { continue; }
                    total += i;
                }
                int k = 0;
                while (true) {
                    k += 1;
                    if (k == 3) break;
                }
                return total + k;
            }
        "#;
        assert_eq!(run(source, "sum", vec![Value::Int(6)]), Ok(Value::Int(0 + 2 + 4 + 3)));
    }

    #[test]
    fn direct_calls_fill_defaults() {
        let source = r#"
            int add(int a, int b = 10) { return a + b; }
            int f() { return add(1) + add(1, 2); }
        "#;
        assert_eq!(run(source, "f", vec![]), Ok(Value::Int(14)));
    }

    #[test]
    fn direct_call_argument_count() {
        let source = r#"
            int add(int a, int b = 10) { return a + b; }
            int f() { return add(); }
            int g() { return add(1, 2, 3); }
        "#;
        let expected = RuntimeError::ArgumentCount {
            function: "add".to_string(),
            expected: "1 to 2".to_string(),
            actual: 0,
        };
        assert_eq!(run(source, "f", vec![]), Err(expected));
        assert!(matches!(run(source, "g", vec![]), Err(RuntimeError::ArgumentCount { actual: 3, .. })));
    }

    #[test]
    fn script_functions_shadow_builtins() {
        let source = r#"
            int len(auto v) { return 99; }
            int f() { return len("abc"); }
        "#;
        assert_eq!(run(source, "f", vec![]), Ok(Value::Int(99)));
    }

    #[test]
    fn collections_and_index_assignment() {
        let source = r#"
            auto f() {
                int[] xs = {1, 2, 3};
                xs[1] = 20;
                dictionary d = {"a": xs};
                d["b"] = len(d["a"]);
                d["a"][0] += 5;
                return d;
            }
        "#;
        let value = run(source, "f", vec![]).unwrap();
        let mut expected = IndexMap::new();
        expected.insert(
            "a".to_string(),
            Value::Array(vec![Value::Int(6), Value::Int(20), Value::Int(3)]),
        );
        expected.insert("b".to_string(), Value::Int(3));
        assert_eq!(value, Value::Dict(expected));
    }

    #[test]
    fn undefined_variable() {
        let result = run("int f() { return nope; }", "f", vec![]);
        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { ref name, .. }) if name == "nope"));
    }

    #[test]
    fn unknown_function() {
        let result = run("int f() { return nope(); }", "f", vec![]);
        assert!(matches!(result, Err(RuntimeError::UnknownFunction { ref name, .. }) if name == "nope"));
    }

    #[test]
    fn runaway_recursion_hits_depth_limit() {
        let source = "int f(int n) { return f(n + 1); }";
        assert_eq!(
            run(source, "f", vec![Value::Int(0)]),
            Err(RuntimeError::CallDepthExceeded { limit: 64 })
        );
    }

    #[test]
    fn recursion_within_limit() {
        let source = "int fact(int n) { return n <= 1 ? 1 : n * fact(n - 1); }";
        assert_eq!(run(source, "fact", vec![Value::Int(10)]), Ok(Value::Int(3_628_800)));
    }

    #[test]
    fn globals_are_read_only() {
        let registry = registry("int f() { LIMIT = 2; return LIMIT; }\nint g() { return LIMIT * 2; }");
        let mut globals = Globals::default();
        globals.insert("LIMIT".to_string(), Value::Int(5));
        let mut interp = Interpreter::new(&registry, &globals, 64);

        assert_eq!(interp.invoke(registry.get("g").unwrap(), vec![]), Ok(Value::Int(10)));
        assert!(matches!(
            interp.invoke(registry.get("f").unwrap(), vec![]),
            Err(RuntimeError::ReadOnlyGlobal { .. })
        ));
    }

    #[test]
    fn short_circuit_skips_right_side() {
        let source = "bool f() { return true || nope(); }";
        assert_eq!(run(source, "f", vec![]), Ok(Value::Bool(true)));
    }

    #[test]
    fn constant_folding() {
        let fold = |s: &str| constant_value(&Parser::expression(s).unwrap());
        assert_eq!(fold("-3"), Some(Value::Int(-3)));
        assert_eq!(fold("{1, -2.5}"), Some(Value::Array(vec![Value::Int(1), Value::float(-2.5)])));
        assert_eq!(fold("{:}"), Some(Value::Dict(IndexMap::new())));
        assert_eq!(fold("{1: 2}"), None);
        assert_eq!(fold("a + 1"), None);
    }
}
