use rf_core::{CoreResult, Facts};
use rhai::{AST, Dynamic, EvalAltResult};

use crate::engine::{ExprEngine, scope_from_facts};

/// A compiled boolean expression over the facts.
#[derive(Debug, Clone)]
pub struct ExprCondition {
    engine: ExprEngine,
    expression: String,
    ast: AST,
}

impl ExprCondition {
    pub fn parse(engine: &ExprEngine, expression: &str) -> CoreResult<Self> {
        let ast = engine.compile_expression(expression)?;
        Ok(Self {
            engine: engine.clone(),
            expression: expression.to_string(),
            ast,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate against `facts`.
    ///
    /// A variable that names no fact makes the condition false; any other
    /// failure, including a non-boolean result, is an error.
    pub fn evaluate(&self, facts: &Facts) -> anyhow::Result<bool> {
        let mut scope = scope_from_facts(facts)?;
        let result = self
            .engine
            .engine()
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast);
        match result {
            Ok(value) => value.as_bool().map_err(|type_name| {
                anyhow::anyhow!(
                    "condition `{}` returned {type_name}, expected a boolean",
                    self.expression
                )
            }),
            Err(err) => match *err {
                EvalAltResult::ErrorVariableNotFound(ref fact, _) => {
                    rf_core::rf_warn!(
                        eval,
                        condition = %self.expression,
                        fact = %fact,
                        "condition evaluated to false due to a missing fact"
                    );
                    Ok(false)
                }
                _ => Err(anyhow::anyhow!(
                    "condition `{}` failed: {err}",
                    self.expression
                )),
            },
        }
    }
}
