//! Configuration file support (`.nbkit.toml`)
//!
//! Configuration files can be placed in:
//! - User home directory: ~/.nbkit.toml (user defaults)
//! - Project directory: ./.nbkit.toml (project defaults)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments
//! 2. Project config
//! 3. User config
//! 4. Built-in defaults

use anyhow::{Context, Result};
use nbkit_notebook::{BackupMode, FixOptions, MergeOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file in the home and working directories
pub const CONFIG_FILE_NAME: &str = ".nbkit.toml";

/// Contents of a `.nbkit.toml` file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for `nbfix`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixConfig>,

    /// Defaults for `nbmerge`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeConfig>,
}

/// `[fix]` table: defaults for `nbfix`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixConfig {
    /// Write a backup before rewriting a notebook
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,

    /// Suffix appended to the notebook path for the backup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_suffix: Option<String>,

    /// Copy the original bytes instead of re-serializing the notebook
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_backup: Option<bool>,
}

/// `[merge]` table: defaults for `nbmerge`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Suffix appended to the merged notebook's name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_suffix: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load user and project configs and merge them
    ///
    /// A config file that cannot be loaded is reported and skipped.
    #[must_use]
    pub fn discover() -> Self {
        let user = dirs::home_dir().and_then(|home| Self::load_optional(&home.join(CONFIG_FILE_NAME)));
        let project = Self::load_optional(&PathBuf::from(CONFIG_FILE_NAME));
        Self::merge(user, project)
    }

    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("ignoring config {}: {e:#}", path.display());
                None
            }
        }
    }

    /// Merge configs with precedence: project config > user config > defaults
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = user_config.unwrap_or_default();

        if let Some(project) = project_config {
            if let Some(fix) = project.fix {
                let base = merged.fix.get_or_insert_with(FixConfig::default);
                base.backup = fix.backup.or(base.backup);
                base.backup_suffix = fix.backup_suffix.or(base.backup_suffix.take());
                base.raw_backup = fix.raw_backup.or(base.raw_backup);
            }
            if let Some(merge) = project.merge {
                let base = merged.merge.get_or_insert_with(MergeConfig::default);
                base.name_suffix = merge.name_suffix.or(base.name_suffix.take());
            }
        }

        merged
    }

    /// Fix options from this config, built-in defaults for unset keys
    #[must_use]
    pub fn fix_options(&self) -> FixOptions {
        let mut options = FixOptions::default();
        if let Some(fix) = &self.fix {
            if let Some(backup) = fix.backup {
                options.backup = backup;
            }
            if let Some(suffix) = &fix.backup_suffix {
                options.backup_suffix.clone_from(suffix);
            }
            if fix.raw_backup == Some(true) {
                options.backup_mode = BackupMode::Raw;
            }
        }
        options
    }

    /// Merge options from this config, built-in defaults for unset keys
    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        let mut options = MergeOptions::default();
        if let Some(suffix) = self.merge.as_ref().and_then(|m| m.name_suffix.as_ref()) {
            options.name_suffix.clone_from(suffix);
        }
        options
    }
}
