//! Sandboxed Rhai engine creation and expression evaluation.
//!
//! Column metadata may carry two kinds of expressions: a "before display"
//! transform applied to each loaded cell, and a custom footer aggregate. Both
//! originate outside the program, so they run in an engine with hard limits on
//! operations, nesting, and allocation sizes, with `eval`, module imports and
//! printing switched off.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{Array, Engine, Map, Scope};
use tracing::{debug, warn};

use super::format::{format_dynamic, parse_number};
use super::{AST, Dynamic};
use crate::error::{Result, ScriptError};

const MAX_OPERATIONS: u64 = 100_000;
const MAX_EXPR_DEPTH: usize = 64;
const MAX_FUNCTION_EXPR_DEPTH: usize = 32;
const MAX_CALL_LEVELS: usize = 32;
const MAX_STRING_SIZE: usize = 64 * 1024;
const MAX_ARRAY_SIZE: usize = 100_000;
const MAX_MAP_SIZE: usize = 10_000;

/// Compiled expressions keyed by their source text.
/// DashMap is internally Arc-based, clones are cheap.
pub type AstCache = Arc<DashMap<String, AST>>;

/// Create a Rhai engine with limits applied and built-ins registered.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_FUNCTION_EXPR_DEPTH);
    engine.set_max_call_levels(MAX_CALL_LEVELS);
    engine.set_max_string_size(MAX_STRING_SIZE);
    engine.set_max_array_size(MAX_ARRAY_SIZE);
    engine.set_max_map_size(MAX_MAP_SIZE);
    engine.disable_symbol("eval");
    engine.set_module_resolver(DummyModuleResolver::new());
    engine.on_print(|_| {});
    engine.on_debug(|_, _, _| {});
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// Values in scope for a "before display" transform.
#[derive(Clone, Debug, Default)]
pub struct TransformContext {
    /// Normalized display text of the cell being transformed.
    pub value: String,
    /// Key of the cell's column.
    pub column: String,
    /// The whole row as `(column key, display text)` pairs.
    pub row: Vec<(String, String)>,
}

/// Shared, sandboxed expression evaluator with a compile cache.
#[derive(Clone)]
pub struct ScriptEngine {
    engine: Arc<Engine>,
    cache: AstCache,
}

impl fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("cached_expressions", &self.cache.len())
            .finish()
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngine {
    pub fn new() -> Self {
        ScriptEngine {
            engine: Arc::new(create_engine()),
            cache: AstCache::default(),
        }
    }

    /// Compile an expression, reusing a cached AST when the source was seen before.
    pub fn compile(&self, source: &str) -> Result<AST> {
        if let Some(ast) = self.cache.get(source) {
            return Ok(ast.clone());
        }
        let ast = self.engine.compile(source).map_err(|e| {
            warn!(target: "script", error = %e, "expression failed to compile");
            ScriptError::Compile(e.to_string())
        })?;
        debug!(target: "script", cached = self.cache.len() + 1, "compiled expression");
        self.cache.insert(source.to_string(), ast.clone());
        Ok(ast)
    }

    /// Check that an expression compiles without evaluating it.
    pub fn validate(&self, source: &str) -> Result<()> {
        self.compile(source).map(|_| ())
    }

    fn eval_with_scope(&self, source: &str, scope: &mut Scope) -> Result<Dynamic> {
        let ast = self.compile(source)?;
        let value = self.engine.eval_ast_with_scope::<Dynamic>(scope, &ast)?;
        Ok(value)
    }

    /// Evaluate a "before display" transform and render its result as text.
    pub fn eval_transform(&self, source: &str, ctx: &TransformContext) -> Result<String> {
        let mut row = Map::new();
        for (key, text) in &ctx.row {
            row.insert(key.as_str().into(), Dynamic::from(text.clone()));
        }

        let mut scope = Scope::new();
        scope.push("value", ctx.value.clone());
        scope.push("column", ctx.column.clone());
        scope.push("row", row);
        let value = self.eval_with_scope(source, &mut scope)?;
        Ok(format_dynamic(&value))
    }

    /// Evaluate a custom footer aggregate over the column's visible values.
    pub fn eval_aggregate(&self, source: &str, values: &[String]) -> Result<String> {
        let strings: Array = values.iter().cloned().map(Dynamic::from).collect();
        let numbers: Array = values
            .iter()
            .filter_map(|v| parse_number(v))
            .map(Dynamic::from)
            .collect();

        let mut scope = Scope::new();
        scope.push("values", strings);
        scope.push("numbers", numbers);
        let value = self.eval_with_scope(source, &mut scope)?;
        Ok(format_dynamic(&value))
    }

    /// Number of distinct expressions compiled so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
