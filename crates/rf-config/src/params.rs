use serde::{Deserialize, Serialize};

/// Threshold that never cuts anything off.
pub const DEFAULT_PRIORITY_THRESHOLD: i32 = i32::MAX;

/// Per-call knobs consumed by the engines on every `fire` / `check`.
///
/// The threshold and the three skip flags are independent and combine freely.
/// Maps to the `[engine]` section of `rulefire.toml`; every field may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineParameters {
    /// Iteration stops at the first rule whose priority is strictly greater.
    pub priority_threshold: i32,
    /// Stop after the first rule whose actions complete successfully.
    pub skip_on_first_applied_rule: bool,
    /// Stop after the first rule whose actions fail.
    pub skip_on_first_failed_rule: bool,
    /// Stop after the first rule whose condition is false.
    pub skip_on_first_non_triggered_rule: bool,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            priority_threshold: DEFAULT_PRIORITY_THRESHOLD,
            skip_on_first_applied_rule: false,
            skip_on_first_failed_rule: false,
            skip_on_first_non_triggered_rule: false,
        }
    }
}

impl EngineParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn priority_threshold(mut self, threshold: i32) -> Self {
        self.priority_threshold = threshold;
        self
    }

    pub fn skip_on_first_applied_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_applied_rule = skip;
        self
    }

    pub fn skip_on_first_failed_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_failed_rule = skip;
        self
    }

    pub fn skip_on_first_non_triggered_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_non_triggered_rule = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_never_cut_off_or_skip() {
        let p = EngineParameters::default();
        assert_eq!(p.priority_threshold, i32::MAX);
        assert!(!p.skip_on_first_applied_rule);
        assert!(!p.skip_on_first_failed_rule);
        assert!(!p.skip_on_first_non_triggered_rule);
    }

    #[test]
    fn builder_setters_chain() {
        let p = EngineParameters::new()
            .priority_threshold(10)
            .skip_on_first_failed_rule(true);
        assert_eq!(p.priority_threshold, 10);
        assert!(p.skip_on_first_failed_rule);
        assert!(!p.skip_on_first_applied_rule);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let p: EngineParameters = toml::from_str("skip_on_first_non_triggered_rule = true").unwrap();
        assert!(p.skip_on_first_non_triggered_rule);
        assert_eq!(p.priority_threshold, DEFAULT_PRIORITY_THRESHOLD);
    }
}
