use std::sync::{Arc, Mutex};

use rf_config::EngineParameters;

use crate::error::{CoreError, CoreReason, CoreResult, core_error};
use crate::facts::{Facts, Value};
use crate::listener::{RuleListener, RulesEngineListener};
use crate::rule::{Rule, Rules};

use super::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Journal = Arc<Mutex<Vec<String>>>;

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(j: &Journal) -> Vec<String> {
    j.lock().unwrap().clone()
}

#[derive(Clone, Copy)]
enum Outcome {
    Applies,
    Fails,
    NotTriggered,
}

/// Rule with a fixed outcome that writes what happened to a journal.
struct Scripted {
    name: String,
    priority: i32,
    outcome: Outcome,
    journal: Journal,
}

impl Rule for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn evaluate(&self, _facts: &Facts) -> CoreResult<bool> {
        self.journal.lock().unwrap().push(format!("evaluate {}", self.name));
        Ok(!matches!(self.outcome, Outcome::NotTriggered))
    }

    fn execute(&self, facts: &mut Facts) -> CoreResult<()> {
        self.journal.lock().unwrap().push(format!("execute {}", self.name));
        match self.outcome {
            Outcome::Fails => Err(core_error(
                CoreReason::RuleExecution,
                format!("{} exploded", self.name),
            )),
            _ => {
                facts.put(format!("{}_done", self.name), true);
                Ok(())
            }
        }
    }
}

fn scripted(j: &Journal, name: &str, priority: i32, outcome: Outcome) -> Scripted {
    Scripted {
        name: name.to_string(),
        priority,
        outcome,
        journal: Arc::clone(j),
    }
}

/// Listener that journals every hook and vetoes the named rules.
struct Recorder {
    journal: Journal,
    veto: Vec<&'static str>,
}

impl RuleListener for Recorder {
    fn before_evaluate(&self, rule: &dyn Rule, _facts: &Facts) -> bool {
        self.journal.lock().unwrap().push(format!("before_evaluate {}", rule.name()));
        !self.veto.iter().any(|v| *v == rule.name())
    }

    fn after_evaluate(&self, rule: &dyn Rule, _facts: &Facts, matched: bool) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("after_evaluate {} {matched}", rule.name()));
    }

    fn before_execute(&self, rule: &dyn Rule, _facts: &Facts) {
        self.journal.lock().unwrap().push(format!("before_execute {}", rule.name()));
    }

    fn on_success(&self, rule: &dyn Rule, _facts: &Facts) {
        self.journal.lock().unwrap().push(format!("on_success {}", rule.name()));
    }

    fn on_failure(&self, rule: &dyn Rule, _facts: &Facts, error: &CoreError) {
        self.journal.lock().unwrap().push(format!(
            "on_failure {} {:?}",
            rule.name(),
            error.reason()
        ));
    }
}

impl RulesEngineListener for Recorder {
    fn before_rules(&self, rules: &Rules, _facts: &Facts) {
        self.journal.lock().unwrap().push(format!("before_rules {}", rules.len()));
    }

    fn after_rules(&self, rules: &Rules, _facts: &Facts) {
        self.journal.lock().unwrap().push(format!("after_rules {}", rules.len()));
    }
}

fn engine_with_recorder(
    params: EngineParameters,
    j: &Journal,
    veto: Vec<&'static str>,
) -> DefaultRulesEngine {
    let recorder = Arc::new(Recorder {
        journal: Arc::clone(j),
        veto,
    });
    let mut engine = DefaultRulesEngine::with_parameters(params);
    engine.register_rule_listener(recorder.clone());
    engine.register_engine_listener(recorder);
    engine
}

// ===========================================================================
// fire: hook sequence
// ===========================================================================

#[test]
fn fire_hook_sequence_for_applied_failed_and_untriggered_rules() {
    let j = journal();
    let rules = Rules::from_rules([
        scripted(&j, "r1", 1, Outcome::Applies),
        scripted(&j, "r2", 2, Outcome::Fails),
        scripted(&j, "r3", 3, Outcome::NotTriggered),
    ])
    .unwrap();
    let engine = engine_with_recorder(EngineParameters::default(), &j, vec![]);
    let mut facts = Facts::new();

    engine.fire(&rules, &mut facts).unwrap();

    assert_eq!(
        entries(&j),
        vec![
            "before_rules 3",
            "before_evaluate r1",
            "evaluate r1",
            "after_evaluate r1 true",
            "before_execute r1",
            "execute r1",
            "on_success r1",
            "before_evaluate r2",
            "evaluate r2",
            "after_evaluate r2 true",
            "before_execute r2",
            "execute r2",
            "on_failure r2 RuleExecution",
            "before_evaluate r3",
            "evaluate r3",
            "after_evaluate r3 false",
            "after_rules 3",
        ]
    );
    assert_eq!(facts.get("r1_done"), Some(&Value::Bool(true)));
}

#[test]
fn vetoed_rule_is_neither_evaluated_nor_reported() {
    let j = journal();
    let rules = Rules::from_rules([
        scripted(&j, "r1", 1, Outcome::Applies),
        scripted(&j, "r2", 2, Outcome::Applies),
    ])
    .unwrap();
    let engine = engine_with_recorder(EngineParameters::default(), &j, vec!["r1"]);
    let mut facts = Facts::new();

    engine.fire(&rules, &mut facts).unwrap();

    let log = entries(&j);
    assert!(log.contains(&"before_evaluate r1".to_string()));
    assert!(!log.iter().any(|e| e == "evaluate r1" || e.starts_with("after_evaluate r1")));
    assert!(log.contains(&"execute r2".to_string()));
}

#[test]
fn gate_stops_asking_after_first_veto() {
    struct Veto;
    impl RuleListener for Veto {
        fn before_evaluate(&self, _rule: &dyn Rule, _facts: &Facts) -> bool {
            false
        }
    }
    let j = journal();
    let mut engine = DefaultRulesEngine::new();
    engine.register_rule_listener(Arc::new(Veto));
    engine.register_rule_listener(Arc::new(Recorder {
        journal: Arc::clone(&j),
        veto: vec![],
    }));
    let rules = Rules::from_rules([scripted(&j, "r1", 1, Outcome::Applies)]).unwrap();

    engine.fire(&rules, &mut Facts::new()).unwrap();

    assert!(entries(&j).is_empty());
}

#[test]
fn threshold_cutoff_never_reaches_listeners() {
    let j = journal();
    let rules = Rules::from_rules([
        scripted(&j, "low", 1, Outcome::Applies),
        scripted(&j, "high", 10, Outcome::Applies),
    ])
    .unwrap();
    let engine = engine_with_recorder(EngineParameters::new().priority_threshold(5), &j, vec![]);

    engine.fire(&rules, &mut Facts::new()).unwrap();

    let log = entries(&j);
    assert!(log.contains(&"execute low".to_string()));
    assert!(!log.iter().any(|e| e.ends_with(" high")));
    assert_eq!(log.last().map(String::as_str), Some("after_rules 2"));
}

#[test]
fn evaluation_error_aborts_fire() {
    struct Broken;
    impl Rule for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn evaluate(&self, _facts: &Facts) -> CoreResult<bool> {
            Err(core_error(CoreReason::RuleEvaluation, "bad input".to_string()))
        }
        fn execute(&self, _facts: &mut Facts) -> CoreResult<()> {
            Ok(())
        }
    }
    let j = journal();
    let rules = Rules::from_rules([Broken]).unwrap();
    let engine = engine_with_recorder(EngineParameters::default(), &j, vec![]);

    let err = engine.fire(&rules, &mut Facts::new()).unwrap_err();

    assert_eq!(err.reason(), &CoreReason::RuleEvaluation);
    assert!(!entries(&j).contains(&"after_rules 1".to_string()));
}

#[test]
fn fire_on_empty_rules_still_notifies_engine_listeners() {
    let j = journal();
    let engine = engine_with_recorder(EngineParameters::default(), &j, vec![]);
    engine.fire(&Rules::new(), &mut Facts::new()).unwrap();
    assert_eq!(entries(&j), vec!["before_rules 0", "after_rules 0"]);
}

#[test]
fn removed_listener_is_no_longer_called() {
    let j = journal();
    let recorder: Arc<dyn RuleListener> = Arc::new(Recorder {
        journal: Arc::clone(&j),
        veto: vec![],
    });
    let mut engine = DefaultRulesEngine::new();
    engine.register_rule_listener(Arc::clone(&recorder));
    assert!(engine.listeners_mut().remove_rule_listener(&recorder));
    assert!(!engine.listeners_mut().remove_rule_listener(&recorder));

    let rules = Rules::from_rules([scripted(&j, "r1", 1, Outcome::Applies)]).unwrap();
    engine.fire(&rules, &mut Facts::new()).unwrap();

    assert_eq!(entries(&j), vec!["evaluate r1", "execute r1"]);
}

#[test]
#[should_panic(expected = "listener blew up")]
fn listener_panic_propagates() {
    struct Panicky;
    impl RulesEngineListener for Panicky {
        fn before_rules(&self, _rules: &Rules, _facts: &Facts) {
            panic!("listener blew up");
        }
    }
    let mut engine = DefaultRulesEngine::new();
    engine.register_engine_listener(Arc::new(Panicky));
    let _ = engine.fire(&Rules::new(), &mut Facts::new());
}

// ===========================================================================
// check
// ===========================================================================

#[test]
fn check_reports_gate_passing_rules_and_runs_no_action() {
    let j = journal();
    let rules = Rules::from_rules([
        scripted(&j, "r1", 1, Outcome::Applies),
        scripted(&j, "r2", 2, Outcome::NotTriggered),
        scripted(&j, "r3", 3, Outcome::Applies),
    ])
    .unwrap();
    let engine = engine_with_recorder(EngineParameters::default(), &j, vec!["r3"]);
    let facts = Facts::new();

    let report = engine.check(&rules, &facts).unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.get("r1"), Some(true));
    assert_eq!(report.get("r2"), Some(false));
    assert_eq!(report.get("r3"), None);
    let matched: Vec<&str> = report.matched().map(|r| r.name()).collect();
    assert_eq!(matched, vec!["r1"]);
    let log = entries(&j);
    assert!(!log.iter().any(|e| e.starts_with("execute")
        || e.starts_with("after_evaluate")
        || e.starts_with("on_")));
    assert_eq!(log.first().map(String::as_str), Some("before_rules 3"));
    assert_eq!(log.last().map(String::as_str), Some("after_rules 3"));
}

#[test]
fn check_ignores_priority_threshold() {
    let j = journal();
    let rules = Rules::from_rules([scripted(&j, "r1", 100, Outcome::Applies)]).unwrap();
    let engine = DefaultRulesEngine::with_parameters(EngineParameters::new().priority_threshold(1));
    let report = engine.check(&rules, &Facts::new()).unwrap();
    assert_eq!(report.get("r1"), Some(true));
}

// ===========================================================================
// inference
// ===========================================================================

/// Decrements `temperature` while it is above 25.
struct Cooler;

impl Rule for Cooler {
    fn name(&self) -> &str {
        "cooler"
    }

    fn evaluate(&self, facts: &Facts) -> CoreResult<bool> {
        Ok(facts.get("temperature").and_then(Value::as_i64).unwrap_or(0) > 25)
    }

    fn execute(&self, facts: &mut Facts) -> CoreResult<()> {
        let t = facts.get("temperature").and_then(Value::as_i64).unwrap_or(0);
        facts.put("temperature", t - 1);
        Ok(())
    }
}

#[test]
fn inference_fires_until_no_rule_matches() {
    let rules = Rules::from_rules([Cooler]).unwrap();
    let mut facts: Facts = [("temperature", 30)].into_iter().collect();
    let engine = InferenceRulesEngine::new();

    engine.fire(&rules, &mut facts).unwrap();

    assert_eq!(facts.get("temperature"), Some(&Value::Int(25)));
}

#[test]
fn inference_notifies_engine_listeners_once() {
    let j = journal();
    let mut engine = InferenceRulesEngine::new();
    engine.register_engine_listener(Arc::new(Recorder {
        journal: Arc::clone(&j),
        veto: vec![],
    }));
    let rules = Rules::from_rules([Cooler]).unwrap();
    let mut facts: Facts = [("temperature", 27)].into_iter().collect();

    engine.fire(&rules, &mut facts).unwrap();

    assert_eq!(entries(&j), vec!["before_rules 1", "after_rules 1"]);
    assert_eq!(engine.parameters(), &EngineParameters::default());
}

/// Sets `done` once, matching only until then.
struct Latch;

impl Rule for Latch {
    fn name(&self) -> &str {
        "latch"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn evaluate(&self, facts: &Facts) -> CoreResult<bool> {
        Ok(!facts.get("done").and_then(Value::as_bool).unwrap_or(false))
    }

    fn execute(&self, facts: &mut Facts) -> CoreResult<()> {
        facts.put("done", true);
        Ok(())
    }
}

/// Always matches and counts its executions.
struct Counter;

impl Rule for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn evaluate(&self, _facts: &Facts) -> CoreResult<bool> {
        Ok(true)
    }

    fn execute(&self, facts: &mut Facts) -> CoreResult<()> {
        let n = facts.get("count").and_then(Value::as_i64).unwrap_or(0);
        facts.put("count", n + 1);
        Ok(())
    }
}

#[test]
fn inference_never_selects_rules_above_threshold() {
    let engine =
        InferenceRulesEngine::with_parameters(EngineParameters::new().priority_threshold(5));
    let mut rules = Rules::new();
    rules.register(Latch).unwrap();
    rules.register(Counter).unwrap();
    let mut facts = Facts::new();

    engine.fire(&rules, &mut facts).unwrap();

    assert_eq!(facts.get("done"), Some(&Value::Bool(true)));
    assert!(facts.get("count").is_none());
}
