//! Permission rule engine
//!
//! Parses permission rules from settings, evaluates tool invocations
//! against them, and detects allow/deny conflicts.
//!
//! ## Rule shapes
//!
//! - `Bash(git:*)` - scoped rule: a tool name plus an argument pattern
//!   interpreted by that tool's matcher
//! - `Read(/etc/passwd)` - scoped rule with an exact pattern
//! - anything that does not fit `Tool(pattern)` - including bare text
//!   like `*` - becomes a catch-all rule matching every invocation
//!
//! ## Evaluation
//!
//! Rules are checked in insertion order and the first match wins; a
//! matching deny short-circuits. A call that no rule matches is allowed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use claude_devtools_core::permissions::PermissionService;
//! use serde_json::{json, Map};
//!
//! let service = PermissionService::new(&settings);
//! let mut args = Map::new();
//! args.insert("command".into(), json!("git status"));
//!
//! let check = service.check("Bash", &args);
//! if !check.allowed { /* reject the tool call */ }
//! ```

mod conflict;
mod engine;
mod matcher;
mod rule;

pub use conflict::rules_conflict;
pub use engine::{PermissionCheck, PermissionService};
pub use matcher::{match_text_pattern, pattern_matches};
pub use rule::{PermissionRule, RuleAction, RuleTarget};
