use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyrisyncConfig {
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingConfig {
    /// Seconds moved by a single nudge
    #[serde(default = "default_nudge_step")]
    pub nudge_step_secs: f64,
}

const fn default_nudge_step() -> f64 {
    0.1
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            nudge_step_secs: default_nudge_step(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write imported ID tags ahead of the timed lines
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_metadata: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to ~/.config/lyrisync/lyrisync.log
    #[serde(default)]
    pub enabled: bool,
}

impl LyrisyncConfig {
    /// Get the configuration directory path (~/.config/lyrisync/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/lyrisync/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default path or create the template on first run
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Load config from `config_path` or create the template there
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create_at(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(config_path, CONFIG_TEMPLATE)?;
            info!("Wrote config template to {}", config_path.display());

            return Err(CoreError::ConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(config_path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges serde cannot express
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigInvalid`] for a non-positive or non-finite nudge step.
    pub fn validate(&self) -> Result<()> {
        let step = self.editing.nudge_step_secs;
        if !step.is_finite() || step <= 0.0 {
            return Err(CoreError::ConfigInvalid {
                message: format!("editing.nudge_step_secs must be a positive number, got {step}"),
            });
        }

        Ok(())
    }
}

pub const CONFIG_TEMPLATE: &str = r#"# Lyrisync Configuration
# ~/.config/lyrisync/config.toml

[editing]
# Seconds every marker moves per nudge
nudge_step_secs = 0.1

[export]
# Write ID tags ([ar:...], [ti:...]) from imported files ahead of the lyrics
include_metadata = true

[logging]
# Also write logs to ~/.config/lyrisync/lyrisync.log
enabled = false
"#;
