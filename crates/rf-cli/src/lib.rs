pub mod audit;
pub mod cmd_check;
pub mod cmd_fire;
pub mod cmd_lint;
pub mod session;
pub mod tracing_init;
