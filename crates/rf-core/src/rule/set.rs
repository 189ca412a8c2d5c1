use crate::error::CoreResult;

use super::{IntoRule, Rule, RuleRef};

/// A namespace of rules kept in ascending [`Rule::compare`] order.
///
/// The comparison is also the identity: registering a rule that compares
/// equal to a member (same priority and name under the natural order) keeps
/// the member and drops the newcomer.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<RuleRef>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from anything convertible into rules, stopping at the
    /// first definition error.
    pub fn from_rules<I>(rules: I) -> CoreResult<Self>
    where
        I: IntoIterator,
        I::Item: IntoRule,
    {
        let mut set = Self::new();
        for rule in rules {
            set.register(rule)?;
        }
        Ok(set)
    }

    /// Adapt and insert `rule`. Returns `false` when an equal entry was
    /// already present.
    pub fn register(&mut self, rule: impl IntoRule) -> CoreResult<bool> {
        let rule = rule.into_rule()?;
        match self.position(rule.as_ref()) {
            Ok(_) => {
                rf_debug!(
                    conf,
                    rule = rule.name(),
                    priority = rule.priority(),
                    "rule already registered, keeping the existing entry"
                );
                Ok(false)
            }
            Err(idx) => {
                self.rules.insert(idx, rule);
                Ok(true)
            }
        }
    }

    /// Remove the member comparing equal to `rule`.
    pub fn unregister(&mut self, rule: impl IntoRule) -> CoreResult<Option<RuleRef>> {
        let rule = rule.into_rule()?;
        Ok(self
            .position(rule.as_ref())
            .ok()
            .map(|idx| self.rules.remove(idx)))
    }

    /// Remove the first rule, in set order, whose name matches `name`
    /// ignoring ASCII case.
    ///
    /// Note the asymmetry: ordering and identity compare names
    /// case-sensitively, so two rules differing only in case can both be
    /// members, and only the first is removed here.
    pub fn unregister_by_name(&mut self, name: &str) -> Option<RuleRef> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.name().eq_ignore_ascii_case(name))?;
        Some(self.rules.remove(idx))
    }

    /// First rule, in set order, whose name matches `name` ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&RuleRef> {
        self.rules
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, rule: &dyn Rule) -> bool {
        self.position(rule).is_ok()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleRef> {
        self.rules.iter()
    }

    /// Search with the comparator of `rule`, so a rule carrying its own
    /// ordering is placed by that ordering.
    fn position(&self, rule: &dyn Rule) -> Result<usize, usize> {
        self.rules
            .binary_search_by(|member| rule.compare(member.as_ref()).reverse())
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a RuleRef;
    type IntoIter = std::slice::Iter<'a, RuleRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
