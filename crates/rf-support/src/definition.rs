use serde::{Deserialize, Serialize};

use rf_core::{DEFAULT_DESCRIPTION, DEFAULT_NAME, DEFAULT_PRIORITY};

// ---------------------------------------------------------------------------
// Raw structure (as written in a rules file)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RuleDefinitionRaw {
    name: Option<String>,
    description: Option<String>,
    priority: Option<i32>,
    condition: Option<String>,
    #[serde(default)]
    actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// RuleDefinition (resolved)
// ---------------------------------------------------------------------------

/// A rule as written in a definition file: metadata plus a condition
/// expression and ordered action scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub condition: String,
    pub actions: Vec<String>,
}

impl RuleDefinition {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            priority: DEFAULT_PRIORITY,
            condition: condition.into(),
            actions: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }
}

impl TryFrom<RuleDefinitionRaw> for RuleDefinition {
    type Error = anyhow::Error;

    fn try_from(raw: RuleDefinitionRaw) -> anyhow::Result<Self> {
        let condition = match raw.condition {
            Some(c) if !c.trim().is_empty() => c,
            _ => anyhow::bail!("the rule condition must be specified"),
        };
        if raw.actions.is_empty() || raw.actions.iter().all(|a| a.trim().is_empty()) {
            anyhow::bail!("the rule action(s) must be specified");
        }
        Ok(Self {
            name: raw.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: raw
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            priority: raw.priority.unwrap_or(DEFAULT_PRIORITY),
            condition,
            actions: raw.actions,
        })
    }
}
