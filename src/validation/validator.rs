//! Settings validation checks

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::core::settings::Settings;
use crate::permissions::rules_conflict;

/// Permission modes a settings file may declare
const VALID_DEFAULT_MODES: &[&str] = &["plan", "acceptEdits", "bypassPermissions"];

/// Hook events the assistant dispatches
const VALID_HOOK_EVENTS: &[&str] = &[
    "prompt:before",
    "prompt:after",
    "tool:before",
    "tool:after",
    "response:before",
    "response:after",
];

static ENV_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// How bad a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth surfacing, does not invalidate the settings
    Warning,
    /// The settings should not be written as-is
    Error,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending section or key
    pub path: String,
    /// What is wrong
    pub message: String,
    /// Whether this finding invalidates the settings
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Outcome of validating one settings snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Whether no error-severity issues were found
    pub valid: bool,
    /// All findings, in section order
    pub issues: Vec<ValidationIssue>,
}

/// Validate a settings snapshot
///
/// Sections this crate does not know are passed over silently; only the
/// known sections are inspected.
pub fn validate_settings(settings: &Settings) -> ValidationReport {
    let mut issues = Vec::new();

    check_permissions(settings, &mut issues);
    check_sandbox(settings, &mut issues);
    check_mcp_servers(settings, &mut issues);
    check_env(settings, &mut issues);
    check_hooks(settings, &mut issues);
    check_plugins(settings, &mut issues);

    ValidationReport {
        valid: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

fn check_permissions(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let permissions = settings.permissions();

    for deny in &permissions.deny {
        if permissions
            .allow
            .iter()
            .any(|allow| rules_conflict(allow, deny))
        {
            issues.push(ValidationIssue::warning(
                "permissions",
                format!("Permission rule \"{}\" conflicts with allow rules", deny),
            ));
        }
    }

    if let Some(mode) = &permissions.default_mode {
        if !VALID_DEFAULT_MODES.contains(&mode.as_str()) {
            issues.push(ValidationIssue::error(
                "permissions.defaultMode",
                format!("Invalid default mode: {}", mode),
            ));
        }
    }
}

fn check_sandbox(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let Some(network) = settings.get("sandbox").and_then(|s| s.get("network")) else {
        return;
    };

    for (key, label) in [
        ("httpProxyPort", "HTTP proxy port"),
        ("socksProxyPort", "SOCKS proxy port"),
    ] {
        if let Some(port) = network.get(key).and_then(Value::as_i64) {
            if !(1..=65535).contains(&port) {
                issues.push(ValidationIssue::error(
                    format!("sandbox.network.{}", key),
                    format!("{} must be between 1 and 65535", label),
                ));
            }
        }
    }
}

fn check_mcp_servers(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let Some(servers) = settings.get("mcpServers").and_then(Value::as_object) else {
        return;
    };

    for (name, server) in servers {
        let command = server.get("command").and_then(Value::as_str).unwrap_or("");
        if command.trim().is_empty() {
            issues.push(ValidationIssue::error(
                format!("mcpServers.{}.command", name),
                format!("MCP server \"{}\" has no command specified", name),
            ));
        }
    }
}

fn check_env(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let Some(env) = settings.get("env").and_then(Value::as_object) else {
        return;
    };

    for key in env.keys() {
        if !ENV_NAME.is_match(key) {
            issues.push(ValidationIssue::error(
                format!("env.{}", key),
                format!("Invalid environment variable name: {}", key),
            ));
        }
    }
}

fn check_hooks(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let Some(hooks) = settings.get("hooks").and_then(Value::as_object) else {
        return;
    };

    for event in hooks.keys() {
        if !VALID_HOOK_EVENTS.contains(&event.as_str()) {
            issues.push(ValidationIssue::warning(
                format!("hooks.{}", event),
                format!("Unknown hook type: {}", event),
            ));
        }
    }
}

fn check_plugins(settings: &Settings, issues: &mut Vec<ValidationIssue>) {
    let Some(plugins) = settings.get("enabledPlugins").and_then(Value::as_object) else {
        return;
    };

    for (name, enabled) in plugins {
        if !enabled.is_boolean() {
            issues.push(ValidationIssue::error(
                format!("enabledPlugins.{}", name),
                format!("Plugin \"{}\" must be a boolean", name),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings_from(value: Value) -> Settings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_settings_are_valid() {
        let report = validate_settings(&Settings::new());
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_conflicting_deny_rule_warns() {
        let settings = settings_from(json!({
            "permissions": {
                "allow": ["Bash(git:*)"],
                "deny": ["Bash(git push:*)", "Read(/tmp/notes)"]
            }
        }));

        let report = validate_settings(&settings);

        // Warnings do not invalidate the settings
        assert!(report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Warning);
        assert!(report.issues[0].message.contains("Bash(git push:*)"));
    }

    #[test]
    fn test_invalid_default_mode_is_error() {
        let settings = settings_from(json!({
            "permissions": {"defaultMode": "yolo"}
        }));

        let report = validate_settings(&settings);
        assert!(!report.valid);
        assert_eq!(report.issues[0].path, "permissions.defaultMode");
    }

    #[test]
    fn test_known_default_modes_pass() {
        for mode in ["plan", "acceptEdits", "bypassPermissions"] {
            let settings = settings_from(json!({
                "permissions": {"defaultMode": mode}
            }));
            assert!(validate_settings(&settings).valid);
        }
    }

    #[test]
    fn test_sandbox_port_range() {
        let settings = settings_from(json!({
            "sandbox": {"network": {"httpProxyPort": 70000, "socksProxyPort": 1080}}
        }));

        let report = validate_settings(&settings);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "sandbox.network.httpProxyPort");
    }

    #[test]
    fn test_mcp_server_requires_command() {
        let settings = settings_from(json!({
            "mcpServers": {
                "db": {"command": "  "},
                "files": {"command": "npx mcp-files"}
            }
        }));

        let report = validate_settings(&settings);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "mcpServers.db.command");
    }

    #[test]
    fn test_env_name_grammar() {
        let settings = settings_from(json!({
            "env": {"GOOD_NAME": "1", "1BAD": "2", "ALSO-BAD": "3"}
        }));

        let report = validate_settings(&settings);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_unknown_hook_event_warns() {
        let settings = settings_from(json!({
            "hooks": {"tool:before": [], "tool:during": []}
        }));

        let report = validate_settings(&settings);
        assert!(report.valid);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].message.contains("tool:during"));
    }

    #[test]
    fn test_plugin_flags_must_be_boolean() {
        let settings = settings_from(json!({
            "enabledPlugins": {"linter": true, "themes": "yes"}
        }));

        let report = validate_settings(&settings);
        assert!(!report.valid);
        assert_eq!(report.issues[0].path, "enabledPlugins.themes");
    }
}
