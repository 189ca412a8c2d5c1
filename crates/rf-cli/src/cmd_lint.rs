use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::IsTerminal;

use anyhow::Result;
use rf_config::EngineParameters;
use rf_core::Rules;
use rf_expr::ExprRuleFactory;
use rf_support::RuleDefinition;

use crate::session::Session;

/// A definition that loads but will not behave as its author likely expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub rule: String,
    pub message: String,
}

/// Definitions-level checks that do not fail loading.
pub fn lint_definitions(
    definitions: &[RuleDefinition],
    parameters: &EngineParameters,
) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let mut seen: HashMap<(i32, &str), usize> = HashMap::new();
    let mut by_folded_name: HashMap<String, &str> = HashMap::new();

    for (idx, def) in definitions.iter().enumerate() {
        match seen.entry((def.priority, def.name.as_str())) {
            Entry::Occupied(first) => {
                warnings.push(LintWarning {
                    rule: def.name.clone(),
                    message: format!(
                        "same name and priority as definition #{}; this one is ignored",
                        first.get() + 1
                    ),
                });
                continue;
            }
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }

        let folded = def.name.to_ascii_lowercase();
        match by_folded_name.get(folded.as_str()).copied() {
            Some(other) if other != def.name => warnings.push(LintWarning {
                rule: def.name.clone(),
                message: format!(
                    "name differs from `{other}` only in case; removal by name may pick either"
                ),
            }),
            Some(_) => {}
            None => {
                by_folded_name.insert(folded, def.name.as_str());
            }
        }

        if def.priority > parameters.priority_threshold {
            warnings.push(LintWarning {
                rule: def.name.clone(),
                message: format!(
                    "priority {} is above the priority threshold {}; the rule never fires",
                    def.priority, parameters.priority_threshold
                ),
            });
        }
    }
    warnings
}

/// `priority  name  description` per rule, in firing order.
pub fn render_rules(rules: &Rules) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str(&format!(
            "{:>11}  {}  {}\n",
            rule.priority(),
            rule.name(),
            rule.description()
        ));
    }
    out
}

/// CLI entry point: build every rule, print the ordered set and any warnings.
pub fn run(session: &Session) -> Result<()> {
    let color = std::io::stderr().is_terminal();
    let definitions = session.load_definitions()?;
    let rules = ExprRuleFactory::default()
        .create_rules(&definitions)
        .map_err(|e| anyhow::anyhow!("{}: {e}", session.rules_path().display()))?;

    print!("{}", render_rules(&rules));

    let warnings = lint_definitions(&definitions, &session.config.engine);
    for w in &warnings {
        if color {
            eprintln!("\x1b[1;38;5;208mwarning\x1b[0m: rule `{}`: {}", w.rule, w.message);
        } else {
            eprintln!("warning: rule `{}`: {}", w.rule, w.message);
        }
    }
    eprintln!("---");
    eprintln!(
        "{} rule(s) loaded, {} warning(s)",
        rules.len(),
        warnings.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, priority: i32) -> RuleDefinition {
        RuleDefinition::new("true")
            .name(name)
            .priority(priority)
            .action("let x = 1;")
    }

    #[test]
    fn clean_definitions_have_no_warnings() {
        let defs = vec![def("a", 1), def("b", 2)];
        assert!(lint_definitions(&defs, &EngineParameters::default()).is_empty());
    }

    #[test]
    fn flags_duplicates() {
        let defs = vec![def("a", 1), def("a", 1)];
        let warnings = lint_definitions(&defs, &EngineParameters::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("definition #1"));
    }

    #[test]
    fn flags_case_only_name_differences() {
        let defs = vec![def("Weather", 1), def("weather", 2)];
        let warnings = lint_definitions(&defs, &EngineParameters::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, "weather");
    }

    #[test]
    fn same_name_with_other_priority_is_fine() {
        let defs = vec![def("a", 1), def("a", 2)];
        assert!(lint_definitions(&defs, &EngineParameters::default()).is_empty());
    }

    #[test]
    fn flags_rules_above_threshold() {
        let defs = vec![def("a", 1), def("b", 10)];
        let warnings = lint_definitions(&defs, &EngineParameters::new().priority_threshold(5));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, "b");
    }

    #[test]
    fn renders_in_firing_order() {
        let rules = ExprRuleFactory::default()
            .create_rules(&[def("late", 9), def("early", 1)])
            .unwrap();
        let out = render_rules(&rules);
        let names: Vec<&str> = out
            .lines()
            .map(|l| l.split_whitespace().nth(1).unwrap())
            .collect();
        assert_eq!(names, vec!["early", "late"]);
    }
}
