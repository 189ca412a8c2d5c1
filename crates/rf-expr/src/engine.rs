use std::fmt;
use std::sync::Arc;

use orion_error::StructError;
use rf_core::{CoreError, CoreReason, CoreResult, Facts, Value};
use rhai::{AST, Dynamic, Engine, Scope};

/// Operation budget of a single script run.
pub const DEFAULT_MAX_OPERATIONS: u64 = 100_000;

/// Shared, pre-configured rhai engine used to compile and run rule scripts.
///
/// Cloning is cheap; clones share the same engine.
#[derive(Clone)]
pub struct ExprEngine {
    engine: Arc<Engine>,
}

impl Default for ExprEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprEngine {
    pub fn new() -> Self {
        Self::with_max_operations(DEFAULT_MAX_OPERATIONS)
    }

    pub fn with_max_operations(max_operations: u64) -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(max_operations);
        engine.on_print(|text| {
            rf_core::rf_info!(exec, "script: {text}");
        });
        engine.on_debug(|text, source, pos| {
            rf_core::rf_debug!(
                exec,
                source = source.unwrap_or("<rule>"),
                position = %pos,
                "script debug: {text}"
            );
        });
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a single expression (conditions).
    pub fn compile_expression(&self, expression: &str) -> CoreResult<AST> {
        self.engine
            .compile_expression(expression)
            .map_err(|e| definition_error(format!("invalid condition `{expression}`: {e}")))
    }

    /// Compile a statement script (actions).
    pub fn compile_script(&self, script: &str) -> CoreResult<AST> {
        self.engine
            .compile(script)
            .map_err(|e| definition_error(format!("invalid action `{script}`: {e}")))
    }
}

impl fmt::Debug for ExprEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprEngine").finish_non_exhaustive()
    }
}

pub(crate) fn definition_error(detail: String) -> CoreError {
    StructError::from(CoreReason::RuleDefinition).with_detail(detail)
}

// ---------------------------------------------------------------------------
// Facts <-> scope
// ---------------------------------------------------------------------------

/// One scope variable per fact.
pub(crate) fn scope_from_facts(facts: &Facts) -> anyhow::Result<Scope<'static>> {
    let mut scope = Scope::new();
    for (name, value) in facts.iter() {
        let dynamic = rhai::serde::to_dynamic(value)
            .map_err(|e| anyhow::anyhow!("fact '{name}' cannot be passed to a script: {e}"))?;
        scope.push_dynamic(name, dynamic);
    }
    Ok(scope)
}

pub(crate) fn value_from_dynamic(name: &str, value: &Dynamic) -> anyhow::Result<Value> {
    rhai::serde::from_dynamic(value).map_err(|e| {
        anyhow::anyhow!(
            "script variable '{name}' of type {} cannot be stored as a fact: {e}",
            value.type_name()
        )
    })
}
