//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rwire/rwire.toml`
//! 3. Local config: `<dir>/.rwire.toml`
//! 4. Environment variables: `RWIRE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Resolution syntax and caching policy used by a registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Prefix marking a string argument as a reference to a registry entry (`$color`)
    pub reference_marker: String,
    /// Separator between a type and a parameter name in qualified keys (`Engine$left`)
    pub qualifier_separator: String,
    /// Separator between a type and a method in invocation targets (`Engine::start`)
    pub method_separator: String,
    /// Method called when an instance or type is invoked without naming one
    pub default_method: String,
    /// Freeze an entry once its factory has been resolved
    pub freeze_on_resolve: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            reference_marker: "$".into(),
            qualifier_separator: "$".into(),
            method_separator: "::".into(),
            default_method: "call".into(),
            freeze_on_resolve: true,
        }
    }
}

/// Raw resolution config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawResolutionConfig {
    pub reference_marker: Option<String>,
    pub qualifier_separator: Option<String>,
    pub method_separator: Option<String>,
    pub default_method: Option<String>,
    pub freeze_on_resolve: Option<bool>,
}

impl ResolutionConfig {
    /// Overlay wins where specified, otherwise keep self.
    pub fn merge(&self, overlay: &RawResolutionConfig) -> Self {
        Self {
            reference_marker: overlay
                .reference_marker
                .clone()
                .unwrap_or_else(|| self.reference_marker.clone()),
            qualifier_separator: overlay
                .qualifier_separator
                .clone()
                .unwrap_or_else(|| self.qualifier_separator.clone()),
            method_separator: overlay
                .method_separator
                .clone()
                .unwrap_or_else(|| self.method_separator.clone()),
            default_method: overlay
                .default_method
                .clone()
                .unwrap_or_else(|| self.default_method.clone()),
            freeze_on_resolve: overlay.freeze_on_resolve.unwrap_or(self.freeze_on_resolve),
        }
    }

    /// Reject settings the engine cannot parse keys or targets with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let required = [
            ("reference_marker", &self.reference_marker),
            ("qualifier_separator", &self.qualifier_separator),
            ("method_separator", &self.method_separator),
            ("default_method", &self.default_method),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ApplicationError::Config {
                    message: format!("resolution.{name} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub resolution: RawResolutionConfig,
}

/// Unified configuration for rwire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Registry resolution settings
    pub resolution: ResolutionConfig,
}

/// Get the XDG config directory for rwire.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rwire").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rwire.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".rwire.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            resolution: self.resolution.merge(&overlay.resolution),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.rwire.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.resolution.validate()?;

        Ok(current)
    }

    /// Apply RWIRE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `RWIRE_RESOLUTION__DEFAULT_METHOD=run`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RWIRE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let resolution = &mut settings.resolution;
        if let Ok(val) = config.get_string("resolution.reference_marker") {
            resolution.reference_marker = val;
        }
        if let Ok(val) = config.get_string("resolution.qualifier_separator") {
            resolution.qualifier_separator = val;
        }
        if let Ok(val) = config.get_string("resolution.method_separator") {
            resolution.method_separator = val;
        }
        if let Ok(val) = config.get_string("resolution.default_method") {
            resolution.default_method = val;
        }
        if let Ok(val) = config.get_bool("resolution.freeze_on_resolve") {
            resolution.freeze_on_resolve = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rwire configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rwire/rwire.toml
#   Local:  <dir>/.rwire.toml
#   Env:    RWIRE_* environment variables, e.g. RWIRE_RESOLUTION__DEFAULT_METHOD

[resolution]
# Prefix turning a string argument into a registry lookup ("$color")
# reference_marker = "$"

# Separator for parameter-qualified keys ("Engine$left")
# qualifier_separator = "$"

# Separator for method targets ("Engine::start")
# method_separator = "::"

# Method invoked when a target names no method
# default_method = "call"

# Freeze entries after their factory has been resolved
# freeze_on_resolve = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
