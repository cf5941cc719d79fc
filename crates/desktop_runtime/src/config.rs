//! Desktop configuration loaded from TOML.
//!
//! The bundled `config/desktop.toml` is compiled in and backs [`DesktopConfig::default`]. Hosts
//! can replace it with [`DesktopConfig::from_toml_str`] or [`DesktopConfig::load`].

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Application;

/// Supported configuration document version.
pub const DESKTOP_CONFIG_SCHEMA_VERSION: u32 = 1;

const BUNDLED_CONFIG: &str = include_str!("../config/desktop.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse desktop config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config schema mismatch: expected {expected} found {found}")]
    SchemaMismatch { expected: u32, found: u32 },
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

/// Window geometry and stacking defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDefaults {
    pub default_width: f64,
    pub default_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub initial_z_index: u64,
    pub cascade_origin_x: f64,
    pub cascade_origin_y: f64,
    pub cascade_step: f64,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            default_height: 300.0,
            min_width: 400.0,
            min_height: 300.0,
            initial_z_index: 100,
            cascade_origin_x: 100.0,
            cascade_origin_y: 50.0,
            cascade_step: 30.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesktopSection {
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopConfig {
    pub schema_version: u32,
    #[serde(default)]
    pub windows: WindowDefaults,
    #[serde(default)]
    pub desktop: DesktopSection,
    #[serde(default)]
    pub apps: Vec<Application>,
}

impl DesktopConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document does not parse or fails validation.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`DesktopConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), apps = config.apps.len(), "loaded desktop config");
        Ok(config)
    }

    /// The compiled-in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only if the bundled document is malformed.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUNDLED_CONFIG)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != DESKTOP_CONFIG_SCHEMA_VERSION {
            return Err(ConfigError::SchemaMismatch {
                expected: DESKTOP_CONFIG_SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        let windows = &self.windows;
        if windows.min_width <= 0.0 || windows.min_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "minimum window size must be positive".to_string(),
            ));
        }
        if windows.default_width < windows.min_width || windows.default_height < windows.min_height
        {
            return Err(ConfigError::Invalid(format!(
                "default window size {}x{} is below the minimum {}x{}",
                windows.default_width, windows.default_height, windows.min_width, windows.min_height
            )));
        }
        let mut seen = BTreeSet::new();
        for app in &self.apps {
            if app.id.trim().is_empty() {
                return Err(ConfigError::Invalid("app id must not be empty".to_string()));
            }
            if !seen.insert(app.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate app id `{}`", app.id)));
            }
        }
        Ok(())
    }
}

impl Default for DesktopConfig {
    fn default() -> Self {
        match Self::bundled() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "bundled desktop config rejected; using empty catalog");
                Self {
                    schema_version: DESKTOP_CONFIG_SCHEMA_VERSION,
                    windows: WindowDefaults::default(),
                    desktop: DesktopSection::default(),
                    apps: Vec::new(),
                }
            }
        }
    }
}
