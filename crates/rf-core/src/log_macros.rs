//! Domain-aware logging macros.
//!
//! Each macro injects a `domain` field automatically so callers never need to
//! remember the string literal. Domains used across the workspace:
//! `eval` (conditions), `exec` (actions), `conf` (rule loading), `sys`.
//!
//! # Usage
//!
//! ```ignore
//! rf_debug!(eval, rule = rule.name(), "rule skipped by listener");
//! rf_warn!(eval, rule = name, fact = %missing, "missing fact, rule evaluated to false");
//! ```
//!
//! The domain identifier is **not** a string; it is a bare identifier that the
//! macro converts to a `&str` literal. The macros are exported so the other
//! RuleFire crates log with the same field layout.

/// Internal helper. Do not call directly; use `rf_error!` … `rf_trace!`.
#[doc(hidden)]
#[macro_export]
macro_rules! rf_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        $crate::__tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

/// Log at ERROR level with an automatic `domain` field.
#[macro_export]
macro_rules! rf_error {
    ($domain:ident, $($rest:tt)*) => {
        $crate::rf_log!(error, $domain, $($rest)*)
    };
}

/// Log at WARN level with an automatic `domain` field.
#[macro_export]
macro_rules! rf_warn {
    ($domain:ident, $($rest:tt)*) => {
        $crate::rf_log!(warn, $domain, $($rest)*)
    };
}

/// Log at INFO level with an automatic `domain` field.
#[macro_export]
macro_rules! rf_info {
    ($domain:ident, $($rest:tt)*) => {
        $crate::rf_log!(info, $domain, $($rest)*)
    };
}

/// Log at DEBUG level with an automatic `domain` field.
#[macro_export]
macro_rules! rf_debug {
    ($domain:ident, $($rest:tt)*) => {
        $crate::rf_log!(debug, $domain, $($rest)*)
    };
}

/// Log at TRACE level with an automatic `domain` field.
#[macro_export]
macro_rules! rf_trace {
    ($domain:ident, $($rest:tt)*) => {
        $crate::rf_log!(trace, $domain, $($rest)*)
    };
}
