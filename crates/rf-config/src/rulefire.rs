use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::format::RuleFormat;
use crate::logging::LoggingConfig;
use crate::params::EngineParameters;
use crate::validate;

// ---------------------------------------------------------------------------
// Raw TOML structure (intermediate representation)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RuleFireConfigRaw {
    #[serde(default)]
    engine: EngineParameters,
    #[serde(default)]
    rules: Option<RulesSourceRaw>,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
struct RulesSourceRaw {
    file: PathBuf,
    /// Falls back to detection from `file`'s extension.
    format: Option<RuleFormat>,
}

// ---------------------------------------------------------------------------
// RuleFireConfig (resolved, validated)
// ---------------------------------------------------------------------------

/// Where the rule definitions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesSource {
    pub file: PathBuf,
    pub format: RuleFormat,
}

impl RulesSource {
    /// Build a source from a path alone, detecting the format from its extension.
    pub fn from_path(file: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let file = file.into();
        let format = RuleFormat::from_path(&file).ok_or_else(|| {
            anyhow::anyhow!(
                "cannot infer rule format from {:?}; use a .yaml/.yml/.json/.toml extension",
                file.display().to_string()
            )
        })?;
        Ok(Self { file, format })
    }

    /// `file` resolved against `base_dir` when relative.
    pub fn resolved_file(&self, base_dir: &Path) -> PathBuf {
        if self.file.is_relative() {
            base_dir.join(&self.file)
        } else {
            self.file.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleFireConfig {
    pub engine: EngineParameters,
    pub rules: Option<RulesSource>,
    pub logging: LoggingConfig,
}

impl Default for RuleFireConfig {
    fn default() -> Self {
        Self {
            engine: EngineParameters::default(),
            rules: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl RuleFireConfig {
    /// Read and parse a `rulefire.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for RuleFireConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a resolved, validated [`RuleFireConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let raw: RuleFireConfigRaw = toml::from_str(toml_str)?;

        let rules = match raw.rules {
            Some(RulesSourceRaw {
                file,
                format: Some(format),
            }) => Some(RulesSource { file, format }),
            Some(RulesSourceRaw { file, format: None }) => Some(RulesSource::from_path(file)?),
            None => None,
        };

        let config = RuleFireConfig {
            engine: raw.engine,
            rules,
            logging: raw.logging,
        };

        validate::validate(&config)?;

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
