//! Configuration scopes and their on-disk locations
//!
//! Claude Code layers settings across four scopes. Each scope maps to
//! exactly one file, and later scopes override earlier ones when the
//! effective view is merged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// A configuration scope tier
///
/// Variants are listed in merge precedence order: a section defined in a
/// later scope replaces the same section from an earlier scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    /// Machine-wide managed settings (platform-specific system directory)
    Enterprise,
    /// Per-user settings under `~/.claude`
    User,
    /// Project settings, usually checked into version control
    Project,
    /// Project-local overrides, usually gitignored
    Local,
}

impl ConfigScope {
    /// All scopes in merge precedence order (lowest to highest)
    pub const ALL: [ConfigScope; 4] = [
        ConfigScope::Enterprise,
        ConfigScope::User,
        ConfigScope::Project,
        ConfigScope::Local,
    ];

    /// Scope name as it appears in API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigScope::Enterprise => "enterprise",
            ConfigScope::User => "user",
            ConfigScope::Project => "project",
            ConfigScope::Local => "local",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enterprise" => Ok(ConfigScope::Enterprise),
            "user" => Ok(ConfigScope::User),
            "project" => Ok(ConfigScope::Project),
            "local" => Ok(ConfigScope::Local),
            other => Err(ConfigError::UnknownScope(other.to_string())),
        }
    }
}

/// Settings file locations for each scope
///
/// Computed once from the host environment and passed by reference into
/// the resolver; there is no global path state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    enterprise: PathBuf,
    user: PathBuf,
    project: PathBuf,
    local: PathBuf,
}

impl ConfigPaths {
    /// Compute paths from explicit inputs
    ///
    /// `os` takes the values of `std::env::consts::OS` ("macos",
    /// "windows", "linux", ...). Unrecognized platforms use the Linux
    /// enterprise location.
    pub fn new(home_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>, os: &str) -> Self {
        let home_dir = home_dir.into();
        let project_dir = project_dir.into();

        let enterprise_dir = match os {
            "macos" => PathBuf::from("/Library/Application Support/ClaudeCode"),
            "windows" => PathBuf::from(r"C:\Program Files\ClaudeCode"),
            _ => PathBuf::from("/etc/claude-code"),
        };

        Self {
            enterprise: enterprise_dir.join("managed-settings.json"),
            user: home_dir.join(".claude").join("settings.json"),
            project: project_dir.join(".claude").join("settings.json"),
            local: project_dir.join(".claude").join("settings.local.json"),
        }
    }

    /// Override the enterprise settings location
    ///
    /// Deployments that relocate managed settings can point the resolver
    /// elsewhere; everything else about the path table is unchanged.
    pub fn with_enterprise_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.enterprise = path.into();
        self
    }

    /// Compute paths for a project directory using the host environment
    pub fn discover(project_dir: impl Into<PathBuf>) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home, project_dir, std::env::consts::OS)
    }

    /// Compute paths using the current working directory as the project
    pub fn from_env() -> std::io::Result<Self> {
        Ok(Self::discover(std::env::current_dir()?))
    }

    /// The settings file path for a scope
    pub fn for_scope(&self, scope: ConfigScope) -> &Path {
        match scope {
            ConfigScope::Enterprise => &self.enterprise,
            ConfigScope::User => &self.user,
            ConfigScope::Project => &self.project,
            ConfigScope::Local => &self.local,
        }
    }

    /// Iterate `(scope, path)` pairs in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (ConfigScope, &Path)> {
        ConfigScope::ALL
            .into_iter()
            .map(move |scope| (scope, self.for_scope(scope)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trip() {
        for scope in ConfigScope::ALL {
            let parsed: ConfigScope = scope.as_str().parse().unwrap();
            assert_eq!(parsed, scope);
        }
    }

    #[test]
    fn test_scope_rejects_unknown_name() {
        let err = "global".parse::<ConfigScope>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScope(name) if name == "global"));
    }

    #[test]
    fn test_scope_serde_lowercase() {
        let json = serde_json::to_string(&ConfigScope::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");

        let scope: ConfigScope = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(scope, ConfigScope::Local);
    }

    #[test]
    fn test_paths_linux() {
        let paths = ConfigPaths::new("/home/dev", "/work/app", "linux");

        assert_eq!(
            paths.for_scope(ConfigScope::Enterprise),
            Path::new("/etc/claude-code/managed-settings.json")
        );
        assert_eq!(
            paths.for_scope(ConfigScope::User),
            Path::new("/home/dev/.claude/settings.json")
        );
        assert_eq!(
            paths.for_scope(ConfigScope::Project),
            Path::new("/work/app/.claude/settings.json")
        );
        assert_eq!(
            paths.for_scope(ConfigScope::Local),
            Path::new("/work/app/.claude/settings.local.json")
        );
    }

    #[test]
    fn test_paths_macos_enterprise() {
        let paths = ConfigPaths::new("/Users/dev", "/work/app", "macos");
        assert_eq!(
            paths.for_scope(ConfigScope::Enterprise),
            Path::new("/Library/Application Support/ClaudeCode/managed-settings.json")
        );
    }

    #[test]
    fn test_paths_windows_enterprise() {
        let paths = ConfigPaths::new(r"C:\Users\dev", r"C:\work\app", "windows");
        assert_eq!(
            paths.for_scope(ConfigScope::Enterprise),
            Path::new(r"C:\Program Files\ClaudeCode\managed-settings.json")
        );
    }

    #[test]
    fn test_enterprise_override() {
        let paths = ConfigPaths::new("/home/dev", "/work/app", "linux")
            .with_enterprise_file("/srv/claude/managed-settings.json");

        assert_eq!(
            paths.for_scope(ConfigScope::Enterprise),
            Path::new("/srv/claude/managed-settings.json")
        );
        // Other scopes are untouched
        assert_eq!(
            paths.for_scope(ConfigScope::User),
            Path::new("/home/dev/.claude/settings.json")
        );
    }

    #[test]
    fn test_paths_deterministic() {
        let a = ConfigPaths::new("/home/dev", "/work/app", "linux");
        let b = ConfigPaths::new("/home/dev", "/work/app", "linux");
        assert_eq!(a, b);
    }

    #[test]
    fn test_iter_precedence_order() {
        let paths = ConfigPaths::new("/home/dev", "/work/app", "linux");
        let scopes: Vec<ConfigScope> = paths.iter().map(|(scope, _)| scope).collect();
        assert_eq!(scopes.as_slice(), &ConfigScope::ALL);
    }
}
