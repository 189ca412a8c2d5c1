//! Rules whose conditions and actions are [rhai](https://rhai.rs) scripts.
//!
//! Every fact is visible to a script as a variable of the same name. A
//! condition is a single expression that must yield a boolean; an action is a
//! script whose top-level variables are written back to the facts once it
//! finishes, so `let discount = 10;` adds a fact and `total -= 5;` updates one.

mod action;
mod condition;
mod engine;
mod factory;

pub use action::ExprAction;
pub use condition::ExprCondition;
pub use engine::{DEFAULT_MAX_OPERATIONS, ExprEngine};
pub use factory::ExprRuleFactory;
