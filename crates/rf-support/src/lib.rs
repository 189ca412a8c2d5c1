//! Rule definition files: the data a rule factory binds to executable rules.

pub mod definition;
pub mod reader;

pub use definition::RuleDefinition;
pub use reader::{
    JsonRuleDefinitionReader, RuleDefinitionReader, TomlRuleDefinitionReader,
    YamlRuleDefinitionReader, load_definitions, reader_for,
};
pub use rf_config::RuleFormat;
