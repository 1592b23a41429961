//! Permission evaluation service
//!
//! A `PermissionService` is built fresh from a settings snapshot, owns
//! its rule list for its lifetime, and is never shared across request
//! handlers. Evaluation is first-match-wins over insertion order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::settings::{PermissionSettings, Settings};

use super::rule::{PermissionRule, RuleAction};

/// Result of checking one tool invocation
///
/// Produced fresh per check; `rule` is the rule that decided the
/// outcome, absent when no rule matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionCheck {
    /// Whether the call may proceed
    pub allowed: bool,
    /// Whether the user must confirm first
    #[serde(skip_serializing_if = "is_false")]
    pub ask: bool,
    /// Human-readable explanation when a rule decided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The deciding rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<PermissionRule>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl PermissionCheck {
    /// Allowed by an explicit rule
    pub fn allowed_by(rule: PermissionRule) -> Self {
        Self {
            allowed: true,
            ask: false,
            reason: None,
            rule: Some(rule),
        }
    }

    /// Allowed, but the user must confirm
    pub fn ask_for(rule: PermissionRule) -> Self {
        Self {
            allowed: true,
            ask: true,
            reason: Some("Requires confirmation".to_string()),
            rule: Some(rule),
        }
    }

    /// Rejected by an explicit rule
    pub fn denied_by(rule: PermissionRule) -> Self {
        Self {
            allowed: false,
            ask: false,
            reason: Some("Denied by permission rule".to_string()),
            rule: Some(rule),
        }
    }

    /// No rule matched; calls are allowed by default
    pub fn default_allow() -> Self {
        Self {
            allowed: true,
            ask: false,
            reason: None,
            rule: None,
        }
    }
}

/// Parses and evaluates the permission rules of a settings snapshot
#[derive(Debug, Clone, Default)]
pub struct PermissionService {
    rules: Vec<PermissionRule>,
}

impl PermissionService {
    /// Build a service from the `permissions` section of settings
    pub fn new(settings: &Settings) -> Self {
        Self::from_permissions(&settings.permissions())
    }

    /// Build a service from a typed permissions view
    ///
    /// Rules load in array order, allow before ask before deny; that
    /// order is the evaluation order.
    pub fn from_permissions(permissions: &PermissionSettings) -> Self {
        let mut rules = Vec::new();

        for text in &permissions.allow {
            rules.push(PermissionRule::parse(text.as_str(), RuleAction::Allow));
        }
        for text in &permissions.ask {
            rules.push(PermissionRule::parse(text.as_str(), RuleAction::Ask));
        }
        for text in &permissions.deny {
            rules.push(PermissionRule::parse(text.as_str(), RuleAction::Deny));
        }

        Self { rules }
    }

    /// Evaluate a tool invocation against the rule list
    ///
    /// The first matching rule decides: deny rejects immediately, ask
    /// allows with a confirmation requirement, allow approves. When no
    /// rule matches, the call is allowed.
    pub fn check(&self, tool: &str, args: &Map<String, Value>) -> PermissionCheck {
        for rule in &self.rules {
            if rule.matches(tool, args) {
                return match rule.action {
                    RuleAction::Deny => PermissionCheck::denied_by(rule.clone()),
                    RuleAction::Ask => PermissionCheck::ask_for(rule.clone()),
                    RuleAction::Allow => PermissionCheck::allowed_by(rule.clone()),
                };
            }
        }

        PermissionCheck::default_allow()
    }

    /// Snapshot of the current rules
    pub fn rules(&self) -> Vec<PermissionRule> {
        self.rules.clone()
    }

    /// Append a rule
    pub fn add_rule(&mut self, rule: PermissionRule) {
        tracing::debug!("Adding {} rule: {}", rule.action, rule.original);
        self.rules.push(rule);
    }

    /// Remove the first rule whose source text matches exactly
    ///
    /// Returns whether a rule was removed.
    pub fn remove_rule(&mut self, original: &str) -> bool {
        match self.rules.iter().position(|r| r.original == original) {
            Some(index) => {
                let removed = self.rules.remove(index);
                tracing::debug!("Removed {} rule: {}", removed.action, removed.original);
                true
            }
            None => false,
        }
    }

    /// Drop all rules
    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Rules grouped back into the three-array settings form
    ///
    /// Relative order within each array matches the current rule order.
    pub fn export(&self) -> PermissionSettings {
        let originals = |action: RuleAction| -> Vec<String> {
            self.rules
                .iter()
                .filter(|r| r.action == action)
                .map(|r| r.original.clone())
                .collect()
        };

        PermissionSettings {
            allow: originals(RuleAction::Allow),
            ask: originals(RuleAction::Ask),
            deny: originals(RuleAction::Deny),
            ..PermissionSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_with(allow: &[&str], ask: &[&str], deny: &[&str]) -> PermissionService {
        PermissionService::from_permissions(&PermissionSettings {
            allow: allow.iter().map(|s| s.to_string()).collect(),
            ask: ask.iter().map(|s| s.to_string()).collect(),
            deny: deny.iter().map(|s| s.to_string()).collect(),
            ..PermissionSettings::default()
        })
    }

    fn command_args(command: &str) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("command".to_string(), json!(command));
        args
    }

    #[test]
    fn test_empty_rule_set_defaults_to_allow() {
        let service = PermissionService::default();
        let check = service.check("Bash", &command_args("rm -rf /"));

        assert!(check.allowed);
        assert!(!check.ask);
        assert_eq!(check.rule, None);
        assert_eq!(check.reason, None);
    }

    #[test]
    fn test_deny_rule_rejects_with_reason() {
        let service = service_with(&[], &[], &["Bash(rm:*)"]);
        let check = service.check("Bash", &command_args("rm -rf /tmp/x"));

        assert!(!check.allowed);
        assert_eq!(check.reason.as_deref(), Some("Denied by permission rule"));
        assert_eq!(
            check.rule.as_ref().map(|r| r.original.as_str()),
            Some("Bash(rm:*)")
        );
    }

    #[test]
    fn test_ask_rule_allows_with_confirmation() {
        let service = service_with(&[], &["Bash(git push:*)"], &[]);
        let check = service.check("Bash", &command_args("git push origin main"));

        assert!(check.allowed);
        assert!(check.ask);
        assert_eq!(check.reason.as_deref(), Some("Requires confirmation"));
    }

    #[test]
    fn test_first_match_wins_over_later_deny() {
        // allow loads before deny, so the allow shadows the broader deny
        let service = service_with(&["Bash(git:*)"], &[], &["Bash(*)"]);
        let check = service.check("Bash", &command_args("git status"));

        assert!(check.allowed);
        assert!(!check.ask);
        assert_eq!(
            check.rule.as_ref().map(|r| r.original.as_str()),
            Some("Bash(git:*)")
        );
    }

    #[test]
    fn test_deny_short_circuits_for_unshadowed_commands() {
        let service = service_with(&["Bash(git:*)"], &[], &["Bash(*)"]);
        let check = service.check("Bash", &command_args("cargo publish"));

        assert!(!check.allowed);
    }

    #[test]
    fn test_catch_all_rule_applies_to_every_tool() {
        let service = service_with(&[], &[], &["block-everything"]);

        assert!(!service.check("Bash", &command_args("ls")).allowed);
        assert!(!service.check("WebFetch", &Map::new()).allowed);
    }

    #[test]
    fn test_rules_returns_snapshot_not_live_state() {
        let mut service = service_with(&["Bash(git:*)"], &[], &[]);

        let mut snapshot = service.rules();
        snapshot.clear();
        assert_eq!(service.rules().len(), 1);

        service.clear_rules();
        assert!(service.rules().is_empty());
    }

    #[test]
    fn test_remove_rule_by_original_text() {
        let mut service = service_with(&["Bash(git:*)", "Read(/tmp/*)"], &[], &[]);

        assert!(service.remove_rule("Bash(git:*)"));
        assert!(!service.remove_rule("Bash(git:*)"));
        assert_eq!(service.rules().len(), 1);
    }

    #[test]
    fn test_export_groups_by_action_in_order() {
        let mut service = service_with(&["Bash(git:*)", "Read(*)"], &["Bash(git push:*)"], &[]);
        service.add_rule(PermissionRule::parse("Write(/etc/*)", RuleAction::Deny));

        let exported = service.export();
        assert_eq!(exported.allow, vec!["Bash(git:*)", "Read(*)"]);
        assert_eq!(exported.ask, vec!["Bash(git push:*)"]);
        assert_eq!(exported.deny, vec!["Write(/etc/*)"]);
    }

    #[test]
    fn test_new_reads_permissions_section() {
        let settings: Settings = serde_json::from_value(json!({
            "permissions": {"deny": ["Bash(rm:*)"]}
        }))
        .unwrap();

        let service = PermissionService::new(&settings);
        assert!(!service.check("Bash", &command_args("rm -rf /")).allowed);
    }

    #[test]
    fn test_check_serializes_without_empty_fields() {
        let service = PermissionService::default();
        let wire = serde_json::to_value(service.check("Bash", &command_args("ls"))).unwrap();
        assert_eq!(wire, json!({"allowed": true}));
    }
}
