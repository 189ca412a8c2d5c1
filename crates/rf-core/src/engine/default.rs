use std::sync::Arc;

use rf_config::EngineParameters;

use crate::error::CoreResult;
use crate::facts::Facts;
use crate::listener::{Listeners, RuleListener, RulesEngineListener};
use crate::rule::Rules;

use super::{CheckReport, RulesEngine};

/// Single pass over the rule set in ascending `(priority, name)` order.
///
/// Per rule: threshold cutoff, listener gate, evaluate, then execute when the
/// condition holds. A failing action is reported to `on_failure` listeners and
/// does not stop later rules unless `skip_on_first_failed_rule` is set.
#[derive(Debug, Clone, Default)]
pub struct DefaultRulesEngine {
    parameters: EngineParameters,
    listeners: Listeners,
}

impl DefaultRulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(parameters: EngineParameters) -> Self {
        Self {
            parameters,
            listeners: Listeners::new(),
        }
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.listeners.add_rule_listener(listener);
    }

    pub fn register_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.listeners.add_engine_listener(listener);
    }

    pub(crate) fn do_fire(&self, rules: &Rules, facts: &mut Facts) -> CoreResult<()> {
        let threshold = self.parameters.priority_threshold;
        for rule in rules {
            let name = rule.name();
            let priority = rule.priority();
            if priority > threshold {
                rf_debug!(
                    eval,
                    threshold,
                    rule = name,
                    priority,
                    "priority threshold exceeded, next rules will be skipped"
                );
                break;
            }
            if !self.listeners.should_evaluate(rule.as_ref(), facts) {
                rf_debug!(eval, rule = name, "rule skipped before being evaluated");
                continue;
            }
            if rule.evaluate(facts)? {
                rf_debug!(eval, rule = name, "rule triggered");
                self.listeners.after_evaluate(rule.as_ref(), facts, true);
                self.listeners.before_execute(rule.as_ref(), facts);
                match rule.execute(facts) {
                    Ok(()) => {
                        rf_debug!(exec, rule = name, "rule executed successfully");
                        self.listeners.on_success(rule.as_ref(), facts);
                        if self.parameters.skip_on_first_applied_rule {
                            rf_debug!(
                                exec,
                                "next rules will be skipped since skip_on_first_applied_rule is set"
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        rf_debug!(exec, rule = name, error = %e, "rule execution failed");
                        self.listeners.on_failure(rule.as_ref(), facts, &e);
                        if self.parameters.skip_on_first_failed_rule {
                            rf_debug!(
                                exec,
                                "next rules will be skipped since skip_on_first_failed_rule is set"
                            );
                            break;
                        }
                    }
                }
            } else {
                rf_debug!(eval, rule = name, "rule evaluated to false");
                self.listeners.after_evaluate(rule.as_ref(), facts, false);
                if self.parameters.skip_on_first_non_triggered_rule {
                    rf_debug!(
                        eval,
                        "next rules will be skipped since skip_on_first_non_triggered_rule is set"
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn do_check(&self, rules: &Rules, facts: &Facts) -> CoreResult<CheckReport> {
        rf_debug!(eval, rules = rules.len(), "checking rules");
        let mut report = CheckReport::default();
        for rule in rules {
            if !self.listeners.should_evaluate(rule.as_ref(), facts) {
                continue;
            }
            let matched = rule.evaluate(facts)?;
            report.push(Arc::clone(rule), matched);
        }
        Ok(report)
    }
}

impl RulesEngine for DefaultRulesEngine {
    fn parameters(&self) -> &EngineParameters {
        &self.parameters
    }

    fn fire(&self, rules: &Rules, facts: &mut Facts) -> CoreResult<()> {
        if rules.is_empty() {
            rf_warn!(eval, "no rules registered, nothing to apply");
        }
        self.listeners.before_rules(rules, facts);
        self.do_fire(rules, facts)?;
        self.listeners.after_rules(rules, facts);
        Ok(())
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> CoreResult<CheckReport> {
        self.listeners.before_rules(rules, facts);
        let report = self.do_check(rules, facts)?;
        self.listeners.after_rules(rules, facts);
        Ok(report)
    }
}
