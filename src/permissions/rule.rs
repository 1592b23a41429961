//! Permission rule model and parsing

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::matcher::pattern_matches;

/// Grammar for scoped rules: a tool name followed by a parenthesized
/// pattern spanning the rest of the text.
static RULE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\((.*)\)$").unwrap());

/// What a matching rule decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Auto-approve the call
    Allow,
    /// Approve, but require user confirmation first
    Ask,
    /// Reject the call
    Deny,
}

impl RuleAction {
    /// Action name as it appears in settings files
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Allow => "allow",
            RuleAction::Ask => "ask",
            RuleAction::Deny => "deny",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    /// Matches every tool invocation
    Global,
    /// Matches one tool, optionally narrowed by an argument pattern
    Scoped {
        /// Tool name the rule applies to
        tool: String,
        /// Argument pattern; `None` matches every invocation of the tool
        pattern: Option<String>,
    },
}

/// A parsed permission rule
///
/// Serializes to the flat wire shape the dashboard and settings tooling
/// exchange: `{"type", "tool"?, "pattern"?, "original"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleRepr", into = "RuleRepr")]
pub struct PermissionRule {
    /// What a match decides
    pub action: RuleAction,
    /// What the rule applies to
    pub target: RuleTarget,
    /// Verbatim source text, preserved for export
    pub original: String,
}

impl PermissionRule {
    /// Parse rule source text
    ///
    /// Text matching `Tool(pattern)` yields a scoped rule; an empty
    /// pattern (`Tool()`) matches every invocation of the tool. Any
    /// other text - `*`, free prose - yields a catch-all rule matching
    /// every invocation of every tool. Parsing never fails.
    pub fn parse(text: impl Into<String>, action: RuleAction) -> Self {
        let original = text.into();

        let target = match RULE_GRAMMAR.captures(&original) {
            Some(caps) => {
                let pattern = &caps[2];
                RuleTarget::Scoped {
                    tool: caps[1].to_string(),
                    pattern: (!pattern.is_empty()).then(|| pattern.to_string()),
                }
            }
            None => RuleTarget::Global,
        };

        Self {
            action,
            target,
            original,
        }
    }

    /// Tool name for scoped rules
    pub fn tool(&self) -> Option<&str> {
        match &self.target {
            RuleTarget::Scoped { tool, .. } => Some(tool),
            RuleTarget::Global => None,
        }
    }

    /// Argument pattern for scoped rules that carry one
    pub fn pattern(&self) -> Option<&str> {
        match &self.target {
            RuleTarget::Scoped { pattern, .. } => pattern.as_deref(),
            RuleTarget::Global => None,
        }
    }

    /// Check whether this rule matches a tool invocation
    ///
    /// A catch-all rule matches anything. A scoped rule requires the
    /// tool name to match, then defers to the tool's argument matcher
    /// when a pattern is present.
    pub fn matches(&self, tool: &str, args: &Map<String, Value>) -> bool {
        match &self.target {
            RuleTarget::Global => true,
            RuleTarget::Scoped {
                tool: rule_tool,
                pattern,
            } => {
                if rule_tool != tool {
                    return false;
                }
                match pattern {
                    Some(pattern) => pattern_matches(tool, pattern, args),
                    None => true,
                }
            }
        }
    }
}

/// Flat wire representation of a rule
#[derive(Serialize, Deserialize)]
struct RuleRepr {
    #[serde(rename = "type")]
    action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    original: String,
}

impl From<RuleRepr> for PermissionRule {
    fn from(repr: RuleRepr) -> Self {
        let target = match repr.tool {
            Some(tool) => RuleTarget::Scoped {
                tool,
                pattern: repr.pattern,
            },
            None => RuleTarget::Global,
        };
        Self {
            action: repr.action,
            target,
            original: repr.original,
        }
    }
}

impl From<PermissionRule> for RuleRepr {
    fn from(rule: PermissionRule) -> Self {
        let (tool, pattern) = match rule.target {
            RuleTarget::Scoped { tool, pattern } => (Some(tool), pattern),
            RuleTarget::Global => (None, None),
        };
        Self {
            action: rule.action,
            tool,
            pattern,
            original: rule.original,
        }
    }
}
