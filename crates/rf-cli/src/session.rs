use std::path::{Path, PathBuf};

use anyhow::Result;
use rf_config::{RuleFireConfig, RulesSource};
use rf_core::{Facts, Rules};
use rf_expr::ExprRuleFactory;
use rf_support::{RuleDefinition, load_definitions};

/// Configuration and rule source shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: RuleFireConfig,
    /// Directory relative paths in the config are resolved against.
    pub base_dir: PathBuf,
    pub rules: RulesSource,
}

impl Session {
    /// Load `config` (defaults when absent) and pick the rules file: `rules`
    /// wins over the `[rules]` section.
    pub fn open(config: Option<&Path>, rules: Option<&Path>) -> Result<Self> {
        let (config, base_dir) = match config {
            Some(path) => {
                let path = path
                    .canonicalize()
                    .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
                let config = RuleFireConfig::load(&path)?;
                let base_dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .ok_or_else(|| anyhow::anyhow!("config path has no parent directory"))?;
                (config, base_dir)
            }
            None => (RuleFireConfig::default(), std::env::current_dir()?),
        };

        let rules = match rules {
            Some(path) => RulesSource::from_path(std::env::current_dir()?.join(path))?,
            None => config.rules.clone().ok_or_else(|| {
                anyhow::anyhow!("no rules file: pass --rules or set [rules] file in the config")
            })?,
        };

        Ok(Self {
            config,
            base_dir,
            rules,
        })
    }

    pub fn rules_path(&self) -> PathBuf {
        self.rules.resolved_file(&self.base_dir)
    }

    pub fn load_definitions(&self) -> Result<Vec<RuleDefinition>> {
        load_definitions(&self.rules, &self.base_dir)
    }

    pub fn load_rules(&self) -> Result<Rules> {
        ExprRuleFactory::default().load_rules(&self.rules, &self.base_dir)
    }
}

/// Read facts from a JSON object file.
pub fn load_facts(path: &Path) -> Result<Facts> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("facts file {} must hold a JSON object: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rf_core::Value;

    use super::*;

    #[test]
    fn rules_come_from_config_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rulefire.toml"),
            "[rules]\nfile = \"rules/weather.yml\"\n",
        )
        .unwrap();

        let session = Session::open(Some(&dir.path().join("rulefire.toml")), None).unwrap();

        assert_eq!(session.rules.format, rf_config::RuleFormat::Yaml);
        assert!(session.rules_path().ends_with("rules/weather.yml"));
        assert_eq!(session.base_dir, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn missing_rules_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("rulefire.toml");
        std::fs::write(&cfg, "[engine]\nskip_on_first_applied_rule = true\n").unwrap();

        let err = Session::open(Some(&cfg), None).unwrap_err();
        assert!(err.to_string().contains("--rules"));
    }

    #[test]
    fn facts_load_from_json_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rain": true, "age": 20, "name": "tom"}}"#).unwrap();

        let facts = load_facts(file.path()).unwrap();
        assert_eq!(facts.get("rain"), Some(&Value::Bool(true)));
        assert_eq!(facts.get("age"), Some(&Value::Int(20)));
        assert_eq!(facts.len(), 3);
    }

    #[test]
    fn facts_must_be_an_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(load_facts(file.path()).is_err());
    }
}
