//! Rule engines: the single-pass [`DefaultRulesEngine`] and the
//! fixed-point [`InferenceRulesEngine`].

mod default;
mod inference;

#[cfg(test)]
mod tests;

use rf_config::EngineParameters;

use crate::error::CoreResult;
use crate::facts::Facts;
use crate::rule::{RuleRef, Rules};

pub use default::DefaultRulesEngine;
pub use inference::InferenceRulesEngine;

/// Fires or checks a rule set against facts.
///
/// Both calls are synchronous and assume exclusive access to `rules` and
/// `facts` for their duration. Rule-level failures never surface as errors;
/// an `Err` means a condition failed for a reason other than a missing fact.
pub trait RulesEngine {
    fn parameters(&self) -> &EngineParameters;

    /// Execute the actions of matching rules in set order.
    fn fire(&self, rules: &Rules, facts: &mut Facts) -> CoreResult<()>;

    /// Evaluate every rule that passes the listener gate without running any
    /// action.
    fn check(&self, rules: &Rules, facts: &Facts) -> CoreResult<CheckReport>;
}

// ---------------------------------------------------------------------------
// CheckReport
// ---------------------------------------------------------------------------

/// Result of [`RulesEngine::check`]: one entry per evaluated rule, in set
/// order. Rules vetoed by a listener are absent.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    entries: Vec<(RuleRef, bool)>,
}

impl CheckReport {
    pub(crate) fn push(&mut self, rule: RuleRef, matched: bool) {
        self.entries.push((rule, matched));
    }

    /// Outcome for the rule named exactly `name`.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(r, _)| r.name() == name)
            .map(|(_, m)| *m)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleRef, bool)> {
        self.entries.iter().map(|(r, m)| (r, *m))
    }

    /// Rules whose condition held.
    pub fn matched(&self) -> impl Iterator<Item = &RuleRef> {
        self.entries.iter().filter(|(_, m)| *m).map(|(r, _)| r)
    }
}
