//! Configuration types, defaults, loading, and validation.

use crate::onboarding::SubmissionTargets;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Hosted backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Collection, catalog and event names used by the wizard
    #[serde(default)]
    pub collections: CollectionsConfig,

    /// Wizard behaviour
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted backend connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend (REST under `/rest/v1`, functions under `/functions/v1`)
    #[serde(default)]
    pub url: String,

    /// Public API key sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Use the in-memory backend instead of the network
    #[serde(default)]
    pub offline: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            offline: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_signups")]
    pub signups: String,

    #[serde(default = "default_claims")]
    pub claims: String,

    /// Catalog query returning the public picklist
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Hosted function that relays notifications
    #[serde(default = "default_notify_function")]
    pub notify_function: String,

    #[serde(default = "default_event_type")]
    pub event_type: String,
}

fn default_signups() -> String {
    "new_neighbor_signups".to_string()
}

fn default_claims() -> String {
    "coupon_claims".to_string()
}

fn default_catalog() -> String {
    "get_public_coupons".to_string()
}

fn default_notify_function() -> String {
    crate::services::rest::DEFAULT_NOTIFY_FUNCTION.to_string()
}

fn default_event_type() -> String {
    "new_neighbor_signup".to_string()
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            signups: default_signups(),
            claims: default_claims(),
            catalog: default_catalog(),
            notify_function: default_notify_function(),
            event_type: default_event_type(),
        }
    }
}

impl CollectionsConfig {
    pub fn submission_targets(&self) -> SubmissionTargets {
        SubmissionTargets {
            signups: self.signups.clone(),
            claims: self.claims.clone(),
            event_type: self.event_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Delay between closing the dialog and clearing its contents
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
}

fn default_reset_delay_ms() -> u64 {
    300
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}

impl WizardConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Base directory: `~/.neighborhub/`
///
/// Holds the user config file and the debug logs.
pub fn neighborhub_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".neighborhub")
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. User config: ~/.neighborhub/config.toml
    /// 3. Local config: ./neighborhub.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        let user_config_path = Self::user_config_path();
        if user_config_path.exists() {
            tracing::debug!("Loading user config from: {:?}", user_config_path);
            config = Self::read_file(&user_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::read_file(&local_config_path)?;
        }

        config.apply_env_overrides();

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply environment overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();

        Ok(config)
    }

    /// `~/.neighborhub/config.toml`
    pub fn user_config_path() -> PathBuf {
        neighborhub_home().join("config.toml")
    }

    /// `./neighborhub.toml`
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("./neighborhub.toml")
    }

    /// Parse a TOML file; sections it omits take their defaults
    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `NEIGHBORHUB_*` overrides from `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("NEIGHBORHUB_BACKEND_URL") {
            self.backend.url = url;
        }

        if let Some(key) = lookup("NEIGHBORHUB_API_KEY") {
            self.backend.api_key = Some(key);
        }

        if let Some(offline) = lookup("NEIGHBORHUB_OFFLINE") {
            self.backend.offline = offline.parse().unwrap_or(self.backend.offline);
        }

        if let Some(level) = lookup("NEIGHBORHUB_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(file) = lookup("NEIGHBORHUB_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        if !self.backend.offline && self.backend.url.trim().is_empty() {
            anyhow::bail!(
                "backend.url is empty. Set NEIGHBORHUB_BACKEND_URL, edit the config, or pass --offline"
            );
        }

        if self.backend.timeout_secs == 0 {
            anyhow::bail!("backend.timeout_secs must be greater than zero");
        }

        if self.wizard.reset_delay_ms == 0 {
            anyhow::bail!("wizard.reset_delay_ms must be greater than zero");
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Copy of this config safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.backend.api_key.is_some() {
            copy.backend.api_key = Some("********".to_string());
        }
        copy
    }

    /// Keep the previous file as `<name>.backup` before overwriting it
    fn backup_config(path: &Path) {
        if !path.exists() {
            return;
        }
        let Some(name) = path.file_name() else {
            return;
        };
        let backup = path.with_file_name(format!("{}.backup", name.to_string_lossy()));
        if let Err(e) = fs::copy(path, &backup) {
            tracing::warn!("Failed to back up config before write: {e}");
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        Self::backup_config(path);

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
