//! Settings loading and persistence across scopes
//!
//! Handles reading and writing the per-scope settings files and the
//! shallow merge that produces the effective view.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use futures::future::join_all;
use serde::Serialize;
use tokio::fs;

use crate::core::error::ConfigResult;
use crate::core::paths::{ConfigPaths, ConfigScope};
use crate::core::settings::Settings;

/// Existence probe result for one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeStatus {
    /// Whether the scope's settings file exists
    pub exists: bool,
    /// Where the scope's settings file lives
    pub path: PathBuf,
}

/// Loads, merges, and persists settings across config scopes
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    paths: ConfigPaths,
}

impl ScopeResolver {
    /// Create a resolver over the given path table
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// Create a resolver rooted at the current working directory
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self::new(ConfigPaths::from_env()?))
    }

    /// The path table this resolver reads from
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Raw file contents for a scope, `None` if the file does not exist
    pub async fn read_raw(&self, scope: ConfigScope) -> ConfigResult<Option<String>> {
        match fs::read_to_string(self.paths.for_scope(scope)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write raw file contents for a scope, creating parent directories
    pub async fn write_raw(&self, scope: ConfigScope, content: &str) -> ConfigResult<()> {
        let path = self.paths.for_scope(scope);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        tracing::debug!("Wrote {} settings to {}", scope, path.display());
        Ok(())
    }

    /// Settings for one scope
    ///
    /// A missing file yields empty settings. A file that fails to parse
    /// also yields empty settings so one corrupt scope cannot block the
    /// others; the parse failure is logged. Any other IO failure
    /// propagates.
    pub async fn load_scope(&self, scope: ConfigScope) -> ConfigResult<Settings> {
        let Some(content) = self.read_raw(scope).await? else {
            return Ok(Settings::new());
        };

        match serde_json::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {} settings at {}: {}",
                    scope,
                    self.paths.for_scope(scope).display(),
                    err
                );
                Ok(Settings::new())
            }
        }
    }

    /// Merged effective settings across all scopes
    ///
    /// Scopes are loaded concurrently and merged in precedence order:
    /// enterprise, then user, then project, then local. The merge is
    /// shallow; a section defined in a later scope replaces the earlier
    /// scope's section wholesale.
    pub async fn load_effective(&self) -> ConfigResult<Settings> {
        let loads = ConfigScope::ALL.map(|scope| self.load_scope(scope));

        let mut merged = Settings::new();
        for loaded in join_all(loads).await {
            merged.merge_from(loaded?);
        }
        Ok(merged)
    }

    /// Settings for a specific scope, or the merged view when `None`
    pub async fn load(&self, scope: Option<ConfigScope>) -> ConfigResult<Settings> {
        match scope {
            Some(scope) => self.load_scope(scope).await,
            None => self.load_effective().await,
        }
    }

    /// Persist settings for a scope as pretty-printed JSON
    pub async fn save(&self, scope: ConfigScope, settings: &Settings) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(settings)?;
        self.write_raw(scope, &content).await
    }

    /// Delete a scope's settings file
    ///
    /// A file that is already absent is not an error.
    pub async fn delete(&self, scope: ConfigScope) -> ConfigResult<()> {
        match fs::remove_file(self.paths.for_scope(scope)).await {
            Ok(()) => {
                tracing::debug!("Deleted {} settings file", scope);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Existence probe for every scope's settings file
    pub async fn status(&self) -> BTreeMap<ConfigScope, ScopeStatus> {
        let mut status = BTreeMap::new();
        for scope in ConfigScope::ALL {
            let path = self.paths.for_scope(scope).to_path_buf();
            let exists = fs::try_exists(&path).await.unwrap_or(false);
            status.insert(scope, ScopeStatus { exists, path });
        }
        status
    }
}
