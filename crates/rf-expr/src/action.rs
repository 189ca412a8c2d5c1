use rf_core::{CoreResult, Facts};
use rhai::AST;

use crate::engine::{ExprEngine, scope_from_facts, value_from_dynamic};

/// A compiled script run for its effect on the facts.
#[derive(Debug, Clone)]
pub struct ExprAction {
    engine: ExprEngine,
    script: String,
    ast: AST,
}

impl ExprAction {
    pub fn parse(engine: &ExprEngine, script: &str) -> CoreResult<Self> {
        let ast = engine.compile_script(script)?;
        Ok(Self {
            engine: engine.clone(),
            script: script.to_string(),
            ast,
        })
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Run the script and store every top-level variable back into `facts`.
    ///
    /// Facts are only written once the script completed; a failing script
    /// leaves them untouched.
    pub fn execute(&self, facts: &mut Facts) -> anyhow::Result<()> {
        let mut scope = scope_from_facts(facts)?;
        self.engine
            .engine()
            .run_ast_with_scope(&mut scope, &self.ast)
            .map_err(|e| anyhow::anyhow!("action `{}` failed: {e}", self.script))?;

        let mut updates = Vec::with_capacity(scope.len());
        for (name, _, value) in scope.iter() {
            updates.push((name.to_string(), value_from_dynamic(name, &value)?));
        }
        for (name, value) in updates {
            facts.put(name, value);
        }
        Ok(())
    }
}
