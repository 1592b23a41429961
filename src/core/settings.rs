//! Settings model
//!
//! A `Settings` value is the parsed contents of one scope file (or the
//! merged effective view): a map of named top-level sections such as
//! `permissions`, `sandbox`, `env`, `hooks`, and `mcpServers`. Sections
//! are carried as raw JSON; only `permissions` gets a typed view, since
//! it is the one section this crate interprets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ConfigResult;

/// Parsed settings for one scope, or the merged effective view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    sections: Map<String, Value>,
}

impl Settings {
    /// Create empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a top-level section
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.sections.get(section)
    }

    /// Set a top-level section, replacing any existing value
    pub fn insert(&mut self, section: impl Into<String>, value: Value) {
        self.sections.insert(section.into(), value);
    }

    /// Remove a top-level section
    pub fn remove(&mut self, section: &str) -> Option<Value> {
        self.sections.remove(section)
    }

    /// Whether no sections are defined
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections, in insertion order
    pub fn sections(&self) -> &Map<String, Value> {
        &self.sections
    }

    /// Shallow merge: each section defined in `other` replaces this
    /// value's whole section
    ///
    /// Nested objects are not merged recursively. If both sides define
    /// `permissions`, the incoming `permissions` object wins entirely.
    pub fn merge_from(&mut self, other: Settings) {
        for (section, value) in other.sections {
            self.sections.insert(section, value);
        }
    }

    /// Typed view of the `permissions` section
    ///
    /// A missing or malformed section yields the empty view.
    pub fn permissions(&self) -> PermissionSettings {
        let Some(value) = self.sections.get("permissions") else {
            return PermissionSettings::default();
        };

        match serde_json::from_value(value.clone()) {
            Ok(permissions) => permissions,
            Err(err) => {
                tracing::warn!("Malformed permissions section ignored: {}", err);
                PermissionSettings::default()
            }
        }
    }

    /// Replace the `permissions` section
    pub fn set_permissions(&mut self, permissions: &PermissionSettings) -> ConfigResult<()> {
        let value = serde_json::to_value(permissions)?;
        self.sections.insert("permissions".to_string(), value);
        Ok(())
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(sections: Map<String, Value>) -> Self {
        Self { sections }
    }
}

/// The `permissions` section of a settings file
///
/// Rule arrays hold rule source text (`"Bash(git:*)"`); parsing them is
/// the permission engine's job. Unknown keys survive a round-trip via
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionSettings {
    /// Rules that auto-approve matching tool calls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,

    /// Rules that require user confirmation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ask: Vec<String>,

    /// Rules that reject matching tool calls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,

    /// Permission mode applied when no rule matches
    #[serde(
        default,
        rename = "defaultMode",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_mode: Option<String>,

    /// Keys this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PermissionSettings {
    /// Whether no rules and no other keys are present
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty()
            && self.ask.is_empty()
            && self.deny.is_empty()
            && self.default_mode.is_none()
            && self.extra.is_empty()
    }
}
