//! The rule capability and everything that produces or holds one.
//!
//! A rule is anything implementing [`Rule`]. Callers either implement the
//! trait directly or describe a rule declaratively with [`RuleBuilder`];
//! both are turned into a shared [`RuleRef`] by [`IntoRule`] and kept in a
//! [`Rules`] set ordered by [`Rule::compare`].

mod adapter;
mod declared;
mod set;


use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::facts::Facts;

pub use adapter::IntoRule;
pub use declared::{Action, Condition, FactArgs, RuleBuilder};
pub use set::Rules;

/// Name given to a rule that does not declare one.
pub const DEFAULT_NAME: &str = "rule";
/// Description given to a rule that does not declare one.
pub const DEFAULT_DESCRIPTION: &str = "description";
/// The lowest precedence a rule can declare.
pub const DEFAULT_PRIORITY: i32 = i32::MAX - 1;

/// Shared handle to a rule, as stored in [`Rules`] and reported by engines.
pub type RuleRef = Arc<dyn Rule>;

/// The capability every rule provides to the engines.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        DEFAULT_DESCRIPTION
    }

    /// Lower values fire first.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Decide whether the actions should run against `facts`.
    fn evaluate(&self, facts: &Facts) -> CoreResult<bool>;

    /// Run the actions. An error is reported to the engine's listeners.
    fn execute(&self, facts: &mut Facts) -> CoreResult<()>;

    /// Sort and identity key inside a [`Rules`] set. Override to replace the
    /// natural `(priority, name)` order.
    fn compare(&self, other: &dyn Rule) -> Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.name().cmp(other.name()))
    }
}

/// `(priority ascending, name ascending)`, names compared case-sensitively.
pub fn natural_order(a: &dyn Rule, b: &dyn Rule) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| a.name().cmp(b.name()))
}

impl PartialEq for dyn Rule + '_ {
    /// Rules are equal when name, priority and description all match.
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
            && self.name() == other.name()
            && self.description() == other.description()
    }
}

impl fmt::Debug for dyn Rule + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("description", &self.description())
            .finish()
    }
}
