//! Configuration module for droid-doctor
//! Handles loading and parsing of `.droid-doctor.toml` configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::DEFAULT_COMMAND_TIMEOUT;

/// Default configuration file name
pub const CONFIG_FILE: &str = ".droid-doctor.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorConfig {
    /// Android SDK location settings
    #[serde(default)]
    pub sdk: SdkConfig,

    /// Check configuration (disabled checks, timeouts)
    #[serde(default)]
    pub checks: ChecksConfig,
}

/// Where to find the SDK and its tools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Path to the `sdkmanager` executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<PathBuf>,

    /// Android SDK root, overrides ANDROID_HOME
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
}

/// Configuration for checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksConfig {
    /// Labels of checks to skip
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Timeout for external commands in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_COMMAND_TIMEOUT.as_secs()
}

impl DoctorConfig {
    /// Load configuration from a specific path, defaults when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: DoctorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `.droid-doctor.toml` from `dir` if it exists
    pub fn load_if_exists(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load_from(&path)?))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let header = "# droid-doctor configuration\n\n";
        let full_content = format!("{}{}", header, content);

        fs::write(path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn create_default(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn is_check_disabled(&self, check_name: &str) -> bool {
        self.checks
            .disabled
            .iter()
            .any(|name| name.eq_ignore_ascii_case(check_name))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.checks.timeout_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.checks.timeout_seconds == 0 {
            anyhow::bail!("checks.timeout_seconds must be greater than 0");
        }

        if let Some(manager) = &self.sdk.manager {
            if !manager.is_file() {
                anyhow::bail!("sdk.manager does not exist: {}", manager.display());
            }
        }

        if let Some(home) = &self.sdk.home {
            if !home.is_dir() {
                anyhow::bail!("sdk.home is not a directory: {}", home.display());
            }
        }

        Ok(())
    }
}
