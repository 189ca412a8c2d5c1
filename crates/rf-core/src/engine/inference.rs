use std::sync::Arc;

use rf_config::EngineParameters;

use crate::error::CoreResult;
use crate::facts::Facts;
use crate::listener::{Listeners, RuleListener, RulesEngineListener};
use crate::rule::Rules;

use super::{CheckReport, DefaultRulesEngine, RulesEngine};

/// Fires rules until no rule matches any more.
///
/// Each round selects the rules whose condition currently holds, up to the
/// priority threshold in set order, and fires
/// them through an inner [`DefaultRulesEngine`] with the same parameters and
/// listeners. Engine listeners see one `before_rules` / `after_rules` pair
/// around the whole run. Rule actions must eventually falsify their own
/// conditions, or the run never ends.
#[derive(Debug, Clone, Default)]
pub struct InferenceRulesEngine {
    delegate: DefaultRulesEngine,
}

impl InferenceRulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(parameters: EngineParameters) -> Self {
        Self {
            delegate: DefaultRulesEngine::with_parameters(parameters),
        }
    }

    pub fn listeners(&self) -> &Listeners {
        self.delegate.listeners()
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners {
        self.delegate.listeners_mut()
    }

    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.delegate.register_rule_listener(listener);
    }

    pub fn register_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.delegate.register_engine_listener(listener);
    }

    /// Rules whose condition holds, up to the first rule above the priority
    /// threshold.
    fn select_candidates(&self, rules: &Rules, facts: &Facts) -> CoreResult<Rules> {
        let threshold = self.delegate.parameters().priority_threshold;
        let mut candidates = Rules::new();
        for rule in rules {
            if rule.priority() > threshold {
                break;
            }
            if rule.evaluate(facts)? {
                candidates.register(Arc::clone(rule))?;
            }
        }
        Ok(candidates)
    }
}

impl RulesEngine for InferenceRulesEngine {
    fn parameters(&self) -> &EngineParameters {
        self.delegate.parameters()
    }

    fn fire(&self, rules: &Rules, facts: &mut Facts) -> CoreResult<()> {
        let listeners = self.delegate.listeners();
        listeners.before_rules(rules, facts);
        let mut round = 0usize;
        loop {
            let candidates = self.select_candidates(rules, facts)?;
            if candidates.is_empty() {
                break;
            }
            round += 1;
            rf_debug!(eval, round, candidates = candidates.len(), "firing candidate rules");
            self.delegate.do_fire(&candidates, facts)?;
        }
        rf_debug!(eval, rounds = round, "no more candidate rules");
        listeners.after_rules(rules, facts);
        Ok(())
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> CoreResult<CheckReport> {
        self.delegate.check(rules, facts)
    }
}
