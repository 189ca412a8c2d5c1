#[macro_use]
mod log_macros;

pub mod engine;
pub mod error;
pub mod facts;
pub mod listener;
pub mod rule;

#[doc(hidden)]
pub use tracing as __tracing;

pub use engine::{CheckReport, DefaultRulesEngine, InferenceRulesEngine, RulesEngine};
pub use error::{CoreError, CoreReason, CoreResult};
pub use facts::{Facts, Value};
pub use listener::{Listeners, RuleListener, RulesEngineListener};
pub use rf_config::EngineParameters;
pub use rule::{
    Action, Condition, DEFAULT_DESCRIPTION, DEFAULT_NAME, DEFAULT_PRIORITY, FactArgs, IntoRule,
    Rule, RuleBuilder, RuleRef, Rules, natural_order,
};
