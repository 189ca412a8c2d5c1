use std::sync::Arc;

use crate::error::CoreResult;

use super::declared::RuleBuilder;
use super::{Rule, RuleRef};

/// Conversion into the shared rule capability.
///
/// A value that already is a rule is wrapped once and never re-adapted; a
/// [`RuleBuilder`] is validated and built. This is the only path by which a
/// [`Rules`](super::Rules) set accepts rules.
pub trait IntoRule {
    fn into_rule(self) -> CoreResult<RuleRef>;
}

impl<T: Rule + 'static> IntoRule for T {
    fn into_rule(self) -> CoreResult<RuleRef> {
        Ok(Arc::new(self))
    }
}

impl IntoRule for RuleRef {
    fn into_rule(self) -> CoreResult<RuleRef> {
        Ok(self)
    }
}

impl IntoRule for RuleBuilder {
    fn into_rule(self) -> CoreResult<RuleRef> {
        self.build()
    }
}

impl IntoRule for &RuleRef {
    fn into_rule(self) -> CoreResult<RuleRef> {
        Ok(Arc::clone(self))
    }
}
