//! Structural settings validation
//!
//! Checks a settings snapshot for problems the dashboard should surface
//! before writing it to disk: conflicting permission rules, out-of-range
//! sandbox ports, malformed env names, and the like. Warnings never make
//! a snapshot invalid; errors do.

mod validator;

pub use validator::{validate_settings, Severity, ValidationIssue, ValidationReport};
