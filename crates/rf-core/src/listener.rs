use std::sync::Arc;

use crate::error::CoreError;
use crate::facts::Facts;
use crate::rule::{Rule, Rules};

/// Per-rule observation hooks. Every hook has a no-op default.
///
/// Hooks take `&self`; listeners that record state use interior mutability.
/// A panicking hook is not caught by the engine and aborts the current call.
pub trait RuleListener: Send + Sync {
    /// Gate: returning `false` skips the rule without evaluating it.
    fn before_evaluate(&self, _rule: &dyn Rule, _facts: &Facts) -> bool {
        true
    }

    fn after_evaluate(&self, _rule: &dyn Rule, _facts: &Facts, _matched: bool) {}

    fn before_execute(&self, _rule: &dyn Rule, _facts: &Facts) {}

    fn on_success(&self, _rule: &dyn Rule, _facts: &Facts) {}

    fn on_failure(&self, _rule: &dyn Rule, _facts: &Facts, _error: &CoreError) {}
}

/// Hooks around a whole `fire` / `check` call.
pub trait RulesEngineListener: Send + Sync {
    fn before_rules(&self, _rules: &Rules, _facts: &Facts) {}

    fn after_rules(&self, _rules: &Rules, _facts: &Facts) {}
}

/// Engine-owned listener lists, invoked in registration order.
#[derive(Clone, Default)]
pub struct Listeners {
    rule: Vec<Arc<dyn RuleListener>>,
    engine: Vec<Arc<dyn RulesEngineListener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.rule.push(listener);
    }

    /// Remove `listener` (by identity). Returns whether it was registered.
    pub fn remove_rule_listener(&mut self, listener: &Arc<dyn RuleListener>) -> bool {
        match self.rule.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(idx) => {
                self.rule.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn add_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.engine.push(listener);
    }

    /// Remove `listener` (by identity). Returns whether it was registered.
    pub fn remove_engine_listener(&mut self, listener: &Arc<dyn RulesEngineListener>) -> bool {
        match self.engine.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(idx) => {
                self.engine.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn rule_listeners(&self) -> &[Arc<dyn RuleListener>] {
        &self.rule
    }

    pub fn engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>] {
        &self.engine
    }

    // -- dispatch ------------------------------------------------------------

    /// `true` unless some listener vetoes; stops asking at the first veto.
    pub(crate) fn should_evaluate(&self, rule: &dyn Rule, facts: &Facts) -> bool {
        self.rule.iter().all(|l| l.before_evaluate(rule, facts))
    }

    pub(crate) fn after_evaluate(&self, rule: &dyn Rule, facts: &Facts, matched: bool) {
        for l in &self.rule {
            l.after_evaluate(rule, facts, matched);
        }
    }

    pub(crate) fn before_execute(&self, rule: &dyn Rule, facts: &Facts) {
        for l in &self.rule {
            l.before_execute(rule, facts);
        }
    }

    pub(crate) fn on_success(&self, rule: &dyn Rule, facts: &Facts) {
        for l in &self.rule {
            l.on_success(rule, facts);
        }
    }

    pub(crate) fn on_failure(&self, rule: &dyn Rule, facts: &Facts, error: &CoreError) {
        for l in &self.rule {
            l.on_failure(rule, facts, error);
        }
    }

    pub(crate) fn before_rules(&self, rules: &Rules, facts: &Facts) {
        for l in &self.engine {
            l.before_rules(rules, facts);
        }
    }

    pub(crate) fn after_rules(&self, rules: &Rules, facts: &Facts) {
        for l in &self.engine {
            l.after_rules(rules, facts);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("rule_listeners", &self.rule.len())
            .field("engine_listeners", &self.engine.len())
            .finish()
    }
}
