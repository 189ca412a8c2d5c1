use std::io::Write;

use rf_config::RulesSource;
use rf_core::{DefaultRulesEngine, EngineParameters, Facts, InferenceRulesEngine, RulesEngine, Value};
use rf_expr::{ExprEngine, ExprRuleFactory};
use rf_support::{RuleDefinitionReader, YamlRuleDefinitionReader};

const WEATHER_RULES: &str = r#"
name: weather rule
description: if it rains then take an umbrella
priority: 1
condition: "rain == true"
actions:
  - "let umbrella = true;"
---
name: adult rule
description: mark adults
priority: 2
condition: "person.age > 18"
actions:
  - "person.adult = true;"
"#;

fn person(age: i64) -> Value {
    Value::Map(
        [
            ("name".to_string(), Value::from("tom")),
            ("age".to_string(), Value::from(age)),
        ]
        .into_iter()
        .collect(),
    )
}

#[test]
fn yaml_rules_fire_against_facts() {
    let defs = YamlRuleDefinitionReader.read(WEATHER_RULES).unwrap();
    let rules = ExprRuleFactory::default().create_rules(&defs).unwrap();
    let mut facts: Facts = [("rain", Value::Bool(true)), ("person", person(30))]
        .into_iter()
        .collect();

    DefaultRulesEngine::new().fire(&rules, &mut facts).unwrap();

    assert_eq!(facts.get("umbrella"), Some(&Value::Bool(true)));
    let Some(Value::Map(p)) = facts.get("person") else {
        panic!("person fact lost");
    };
    assert_eq!(p.get("adult"), Some(&Value::Bool(true)));
}

#[test]
fn missing_fact_skips_only_that_rule() {
    let defs = YamlRuleDefinitionReader.read(WEATHER_RULES).unwrap();
    let rules = ExprRuleFactory::default().create_rules(&defs).unwrap();
    let mut facts: Facts = [("person", person(30))].into_iter().collect();

    let report = DefaultRulesEngine::new().check(&rules, &facts).unwrap();
    assert_eq!(report.get("weather rule"), Some(false));
    assert_eq!(report.get("adult rule"), Some(true));

    DefaultRulesEngine::new().fire(&rules, &mut facts).unwrap();
    assert!(!facts.contains("umbrella"));
}

#[test]
fn skip_on_first_applied_with_expression_rules() {
    let defs = YamlRuleDefinitionReader.read(WEATHER_RULES).unwrap();
    let rules = ExprRuleFactory::default().create_rules(&defs).unwrap();
    let mut facts: Facts = [("rain", Value::Bool(true)), ("person", person(30))]
        .into_iter()
        .collect();
    let engine =
        DefaultRulesEngine::with_parameters(EngineParameters::new().skip_on_first_applied_rule(true));

    engine.fire(&rules, &mut facts).unwrap();

    let Some(Value::Map(p)) = facts.get("person") else {
        panic!("person fact lost");
    };
    assert!(!p.contains_key("adult"));
}

#[test]
fn inference_cools_down_the_room() {
    let defs = YamlRuleDefinitionReader
        .read(
            r#"
name: air conditioning
condition: "temperature > 25"
actions:
  - "temperature -= 1;"
"#,
        )
        .unwrap();
    let rules = ExprRuleFactory::new(ExprEngine::new())
        .create_rules(&defs)
        .unwrap();
    let mut facts: Facts = [("temperature", 30)].into_iter().collect();

    InferenceRulesEngine::new().fire(&rules, &mut facts).unwrap();

    assert_eq!(facts.get("temperature"), Some(&Value::Int(25)));
}

#[test]
fn load_rules_reads_a_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("rules.json")).unwrap();
    file.write_all(
        br#"[{"name": "big order", "condition": "total > 100", "actions": ["let discount = 10;"]}]"#,
    )
    .unwrap();

    let source = RulesSource::from_path("rules.json").unwrap();
    let rules = ExprRuleFactory::default().load_rules(&source, dir.path()).unwrap();
    let mut facts: Facts = [("total", 150)].into_iter().collect();
    DefaultRulesEngine::new().fire(&rules, &mut facts).unwrap();

    assert_eq!(facts.get("discount"), Some(&Value::Int(10)));
}
