//! Planner configuration
//!
//! Read once per invocation from a TOML file and passed explicitly into the
//! engine entry points. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name inside the wiki directory
pub const CONFIG_FILE_NAME: &str = "planner-config.toml";

/// Whether a check fails the operation or is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckingMode {
    #[default]
    Strict,
    Lax,
}

impl CheckingMode {
    pub fn is_strict(&self) -> bool {
        *self == CheckingMode::Strict
    }
}

/// Whether blocked tasks are normalized and moved to SCHEDULED before an
/// advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    #[default]
    Standard,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Require NOTES in every log that is about to be superseded
    pub completion_checking: CheckingMode,
    /// Require at least one task under TOMORROW when a day rolls over
    pub tomorrow_checking: CheckingMode,
    /// Bullet used for forward-reference entries
    pub preferred_bullet_char: char,
    pub schedule_mode: ScheduleMode,
    /// Commit written documents when the wiki is in a git repository
    pub git_snapshot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            completion_checking: CheckingMode::Strict,
            tomorrow_checking: CheckingMode::Strict,
            preferred_bullet_char: '*',
            schedule_mode: ScheduleMode::Standard,
            git_snapshot: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Configuration file; defaults are used if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Copy of this configuration with completion checking relaxed
    pub fn lax_completion(&self) -> Self {
        Self {
            completion_checking: CheckingMode::Lax,
            ..self.clone()
        }
    }

    /// Copy of this configuration with the TOMORROW check relaxed
    pub fn lax_tomorrow(&self) -> Self {
        Self {
            tomorrow_checking: CheckingMode::Lax,
            ..self.clone()
        }
    }
}
