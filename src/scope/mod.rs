//! Scope-aware settings loading
//!
//! `ScopeResolver` reads and writes the settings file behind each
//! [`ConfigScope`](crate::core::ConfigScope) and produces the merged
//! effective view. File reads and writes are async so one slow disk
//! never blocks concurrent request handlers.

mod resolver;

pub use resolver::{ScopeResolver, ScopeStatus};
