pub mod format;
pub mod logging;
pub mod params;
pub mod rulefire;
mod validate;

pub use format::RuleFormat;
pub use logging::{LogFormat, LoggingConfig};
pub use params::{DEFAULT_PRIORITY_THRESHOLD, EngineParameters};
pub use rulefire::{RuleFireConfig, RulesSource};
