use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rf_config::EngineParameters;
use rf_core::{DefaultRulesEngine, Facts, InferenceRulesEngine, Rules, RulesEngine};

use crate::audit::AuditListener;
use crate::session::{Session, load_facts};

/// Engine for `parameters`, with the audit listener registered.
pub fn build_engine(parameters: EngineParameters, inference: bool) -> Box<dyn RulesEngine> {
    let audit = Arc::new(AuditListener);
    if inference {
        let mut engine = InferenceRulesEngine::with_parameters(parameters);
        engine.register_rule_listener(audit.clone());
        engine.register_engine_listener(audit);
        Box::new(engine)
    } else {
        let mut engine = DefaultRulesEngine::with_parameters(parameters);
        engine.register_rule_listener(audit.clone());
        engine.register_engine_listener(audit);
        Box::new(engine)
    }
}

/// Fire `rules` and return the resulting facts.
pub fn fire_rules(
    rules: &Rules,
    mut facts: Facts,
    parameters: EngineParameters,
    inference: bool,
) -> Result<Facts> {
    let engine = build_engine(parameters, inference);
    engine.fire(rules, &mut facts)?;
    Ok(facts)
}

/// CLI entry point: load rules and facts, fire, print facts as JSON.
pub fn run(session: &Session, facts: &Path, inference: bool) -> Result<()> {
    let rules = session.load_rules()?;
    let facts = load_facts(facts)?;
    let facts = fire_rules(&rules, facts, session.config.engine, inference)?;
    println!("{}", serde_json::to_string_pretty(&facts)?);
    Ok(())
}
