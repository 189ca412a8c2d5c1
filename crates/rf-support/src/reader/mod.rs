//! Readers turning rule definition files into [`RuleDefinition`]s.

mod formats;


use std::path::Path;

use anyhow::Context;
use rf_config::{RuleFormat, RulesSource};

use crate::definition::{RuleDefinition, RuleDefinitionRaw};

pub use formats::{JsonRuleDefinitionReader, TomlRuleDefinitionReader, YamlRuleDefinitionReader};

/// Parses the rule definitions held in one document or file.
///
/// Definitions come back in file order; ordering between rules is the rule
/// set's business.
pub trait RuleDefinitionReader {
    fn read(&self, content: &str) -> anyhow::Result<Vec<RuleDefinition>>;

    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<RuleDefinition>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.read(&content)
            .with_context(|| format!("invalid rule definitions in {}", path.display()))
    }
}

/// Reader for `format`.
pub fn reader_for(format: RuleFormat) -> Box<dyn RuleDefinitionReader> {
    match format {
        RuleFormat::Yaml => Box::new(YamlRuleDefinitionReader),
        RuleFormat::Json => Box::new(JsonRuleDefinitionReader),
        RuleFormat::Toml => Box::new(TomlRuleDefinitionReader),
    }
}

/// Read every definition of `source`, resolving a relative file against `base_dir`.
pub fn load_definitions(source: &RulesSource, base_dir: &Path) -> anyhow::Result<Vec<RuleDefinition>> {
    let path = source.resolved_file(base_dir);
    let definitions = reader_for(source.format).read_file(&path)?;
    rf_core::rf_debug!(
        conf,
        file = %path.display(),
        format = %source.format,
        rules = definitions.len(),
        "rule definitions loaded"
    );
    Ok(definitions)
}

/// Resolve raw entries, tagging a failure with the 1-based position of the
/// offending definition.
fn resolve_all(raws: Vec<RuleDefinitionRaw>) -> anyhow::Result<Vec<RuleDefinition>> {
    raws.into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            RuleDefinition::try_from(raw).with_context(|| format!("rule definition #{}", idx + 1))
        })
        .collect()
}
