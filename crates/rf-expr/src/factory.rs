use std::path::Path;

use rf_config::RulesSource;
use rf_core::{Action, Condition, CoreResult, RuleBuilder, RuleRef, Rules};
use rf_support::{RuleDefinition, load_definitions};

use crate::action::ExprAction;
use crate::condition::ExprCondition;
use crate::engine::{ExprEngine, definition_error};

/// Binds [`RuleDefinition`]s to executable rules.
///
/// Definitions go through [`RuleBuilder`], so expression rules are validated
/// like any other declared rule. The condition id is the expression itself and
/// each action id is its script, which makes the synthesized descriptions
/// readable.
#[derive(Debug, Clone, Default)]
pub struct ExprRuleFactory {
    engine: ExprEngine,
}

impl ExprRuleFactory {
    pub fn new(engine: ExprEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ExprEngine {
        &self.engine
    }

    pub fn create_rule(&self, definition: &RuleDefinition) -> CoreResult<RuleRef> {
        let condition = ExprCondition::parse(&self.engine, &definition.condition)?;
        let mut builder = RuleBuilder::new()
            .name(&definition.name)
            .description(&definition.description)
            .priority(definition.priority)
            .condition(Condition::new(
                definition.condition.clone(),
                move |facts, _| condition.evaluate(facts),
            ));
        for (idx, script) in definition.actions.iter().enumerate() {
            let action = ExprAction::parse(&self.engine, script)?;
            let order = i32::try_from(idx).map_err(|_| {
                definition_error(format!("rule '{}' declares too many actions", definition.name))
            })?;
            builder = builder.action(Action::new(script.clone(), order, move |facts, _| {
                action.execute(facts)
            }));
        }
        builder.build()
    }

    /// Create every rule; definitions that collide in the set keep the first one.
    pub fn create_rules<'a, I>(&self, definitions: I) -> CoreResult<Rules>
    where
        I: IntoIterator<Item = &'a RuleDefinition>,
    {
        let mut rules = Rules::new();
        for definition in definitions {
            if !rules.register(self.create_rule(definition)?)? {
                rf_core::rf_warn!(
                    conf,
                    rule = %definition.name,
                    priority = definition.priority,
                    "duplicate rule definition ignored"
                );
            }
        }
        Ok(rules)
    }

    /// Read `source` and create its rules.
    pub fn load_rules(&self, source: &RulesSource, base_dir: &Path) -> anyhow::Result<Rules> {
        let definitions = load_definitions(source, base_dir)?;
        Ok(self.create_rules(&definitions)?)
    }
}
