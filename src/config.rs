//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mobject/mobject.toml`
//! 3. Project config: `<project_dir>/.mobject.toml`
//! 4. Environment variables: `MOBJECT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::KeySyntax;

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid settings: {message}")]
    Invalid { message: String },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

fn config_err(e: config::ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}

/// Naming conventions used when building objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Leading character marking private names, never treated as a delimiter
    pub privacy_prefix: char,
    /// Separator between path segments in flat keys
    pub delimiter: String,
    /// Name shown for the receiver parameter of methods
    pub self_param: String,
    /// Kind reported by objects not built from a template
    pub default_kind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            privacy_prefix: '_',
            delimiter: "__".into(),
            self_param: "self".into(),
            default_kind: "MObject".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub privacy_prefix: Option<char>,
    pub delimiter: Option<String>,
    pub self_param: Option<String>,
    pub default_kind: Option<String>,
}

/// Get the XDG config directory for mobject.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mobject").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mobject.toml"))
}

/// Get the path to the project config file in a directory.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".mobject.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Key syntax view used by the parser.
    pub fn syntax(&self) -> KeySyntax<'_> {
        KeySyntax {
            prefix: self.privacy_prefix,
            delimiter: &self.delimiter,
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            privacy_prefix: overlay.privacy_prefix.unwrap_or(self.privacy_prefix),
            delimiter: overlay
                .delimiter
                .clone()
                .unwrap_or_else(|| self.delimiter.clone()),
            self_param: overlay
                .self_param
                .clone()
                .unwrap_or_else(|| self.self_param.clone()),
            default_kind: overlay
                .default_kind
                .clone()
                .unwrap_or_else(|| self.default_kind.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a `.mobject.toml`
    pub fn load(project_dir: Option<&Path>) -> SettingsResult<Self> {
        Self::load_from(global_config_path().as_deref(), project_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config path.
    pub fn load_from(global: Option<&Path>, project_dir: Option<&Path>) -> SettingsResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Project config
        if let Some(dir) = project_dir {
            let local_path = project_config_path(dir);
            if local_path.exists() {
                debug!("load: project config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, "MOBJECT")?;

        current.validate()?;
        Ok(current)
    }

    /// Apply `<prefix>_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, prefix: &str) -> SettingsResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("privacy_prefix") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => settings.privacy_prefix = c,
                _ => {
                    return Err(SettingsError::Invalid {
                        message: format!("privacy_prefix must be a single character, got {val:?}"),
                    })
                }
            }
        }
        if let Ok(val) = config.get_string("delimiter") {
            settings.delimiter = val;
        }
        if let Ok(val) = config.get_string("self_param") {
            settings.self_param = val;
        }
        if let Ok(val) = config.get_string("default_kind") {
            settings.default_kind = val;
        }

        Ok(settings)
    }

    /// Parse settings from a TOML document; missing fields keep defaults.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let raw: RawSettings = toml::from_str(content).map_err(|e| SettingsError::Config {
            message: format!("parse: {e}"),
        })?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a TOML document.
    pub fn to_toml(&self) -> SettingsResult<String> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize: {e}"),
        })
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let invalid = |message: &str| {
            Err(SettingsError::Invalid {
                message: message.to_string(),
            })
        };
        if self.delimiter.is_empty() {
            return invalid("delimiter must not be empty");
        }
        if self.self_param.is_empty() {
            return invalid("self_param must not be empty");
        }
        if self.default_kind.is_empty() {
            return invalid("default_kind must not be empty");
        }
        Ok(())
    }
}
