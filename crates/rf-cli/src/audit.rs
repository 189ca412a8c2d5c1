use rf_core::{CoreError, Facts, Rule, RuleListener, Rules, RulesEngineListener};

/// Logs every engine and rule hook. Never vetoes a rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditListener;

impl RuleListener for AuditListener {
    fn before_evaluate(&self, rule: &dyn Rule, _facts: &Facts) -> bool {
        rf_core::rf_trace!(eval, rule = rule.name(), priority = rule.priority(), "evaluating rule");
        true
    }

    fn after_evaluate(&self, rule: &dyn Rule, _facts: &Facts, matched: bool) {
        rf_core::rf_debug!(eval, rule = rule.name(), matched, "rule evaluated");
    }

    fn before_execute(&self, rule: &dyn Rule, _facts: &Facts) {
        rf_core::rf_debug!(exec, rule = rule.name(), "executing rule");
    }

    fn on_success(&self, rule: &dyn Rule, facts: &Facts) {
        rf_core::rf_info!(exec, rule = rule.name(), facts = %facts, "rule applied");
    }

    fn on_failure(&self, rule: &dyn Rule, _facts: &Facts, error: &CoreError) {
        rf_core::rf_error!(exec, rule = rule.name(), error = %error, "rule failed");
    }
}

impl RulesEngineListener for AuditListener {
    fn before_rules(&self, rules: &Rules, facts: &Facts) {
        rf_core::rf_info!(sys, rules = rules.len(), facts = %facts, "firing rules");
    }

    fn after_rules(&self, rules: &Rules, facts: &Facts) {
        rf_core::rf_info!(sys, rules = rules.len(), facts = %facts, "rules done");
    }
}
