use serde::Deserialize;

use crate::definition::{RuleDefinition, RuleDefinitionRaw};

use super::{RuleDefinitionReader, resolve_all};

// ---------------------------------------------------------------------------
// YAML
// ---------------------------------------------------------------------------

/// One definition per YAML document:
///
/// ```yaml
/// name: adult rule
/// condition: "age > 18"
/// actions:
///   - "adult = true"
/// ---
/// name: ...
/// ```
///
/// Empty documents are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRuleDefinitionReader;

impl RuleDefinitionReader for YamlRuleDefinitionReader {
    fn read(&self, content: &str) -> anyhow::Result<Vec<RuleDefinition>> {
        let mut raws = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            if let Some(raw) = Option::<RuleDefinitionRaw>::deserialize(document)? {
                raws.push(raw);
            }
        }
        resolve_all(raws)
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// A JSON array of definition objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRuleDefinitionReader;

impl RuleDefinitionReader for JsonRuleDefinitionReader {
    fn read(&self, content: &str) -> anyhow::Result<Vec<RuleDefinition>> {
        let raws: Vec<RuleDefinitionRaw> = serde_json::from_str(content)?;
        resolve_all(raws)
    }
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RuleTablesRaw {
    #[serde(default)]
    rule: Vec<RuleDefinitionRaw>,
}

/// An array of `[[rule]]` tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlRuleDefinitionReader;

impl RuleDefinitionReader for TomlRuleDefinitionReader {
    fn read(&self, content: &str) -> anyhow::Result<Vec<RuleDefinition>> {
        let raw: RuleTablesRaw = toml::from_str(content)?;
        resolve_all(raw.rule)
    }
}
