//! Core types for the configuration engine
//!
//! This module provides the fundamental types used throughout the crate:
//! - `ConfigScope` / `ConfigPaths` - scope tiers and their file locations
//! - `Settings` - parsed settings for one scope or the merged view
//! - `ConfigError` - error types

pub mod error;
pub mod paths;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use paths::{ConfigPaths, ConfigScope};
pub use settings::{PermissionSettings, Settings};
