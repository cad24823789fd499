//! Configuration management for blinkguard.
//!
//! Loads configuration from ${BLINKGUARD_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tracker::{BlinkEventLog, EvictionPolicy, StatusTracker};

/// How the terminal sink acknowledges alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
    /// Wait for the user to answer OK or EXIT.
    #[default]
    Prompt,
    /// Dismiss immediately (unattended runs).
    Auto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub ack: AckMode,
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for blinkguard configuration and data.
    //!
    //! BLINKGUARD_HOME resolution order:
    //! 1. BLINKGUARD_HOME environment variable (if set)
    //! 2. ~/.config/blinkguard (default)
    //! 3. ./.blinkguard when no home directory can be determined

    use std::path::PathBuf;

    pub fn blinkguard_home() -> PathBuf {
        if let Ok(home) = std::env::var("BLINKGUARD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".blinkguard"),
            |h| h.join(".config").join("blinkguard"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        blinkguard_home().join("config.toml")
    }

    /// Returns the path to the alert history file.
    pub fn alerts_path() -> PathBuf {
        blinkguard_home().join("alerts.jsonl")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retention window in seconds
    pub keep_seconds: f64,

    /// Blinks per minute at or above which status is safe
    pub safe_boundary: u32,

    /// Eviction policy for stale observations
    pub eviction: EvictionPolicy,

    /// Observation input path, or "-" for stdin
    pub source: String,

    /// Replay at recorded spacing
    pub pace: bool,

    /// Failed reads to retry before stopping
    pub max_read_retries: u32,

    /// Append alerts to the history file
    pub record_alerts: bool,

    /// Alert presentation
    #[serde(default)]
    pub alert: AlertConfig,
}

impl Config {
    const DEFAULT_SAFE_BOUNDARY: u32 = 25;
    const DEFAULT_SOURCE: &str = "-";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.keep_seconds.is_finite() || self.keep_seconds <= 0.0 {
            anyhow::bail!(
                "keep_seconds must be a positive number of seconds, got {}",
                self.keep_seconds
            );
        }
        if self.safe_boundary == 0 {
            anyhow::bail!("safe_boundary must be at least 1 blink per minute");
        }
        Ok(())
    }

    /// Builds a fresh tracker from the configured window, boundary and policy.
    pub fn tracker(&self) -> StatusTracker {
        StatusTracker::with_policy(self.keep_seconds, self.safe_boundary, self.eviction)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// This is used by `xtask update-default-config` to keep
    /// `default_config.toml` in sync with Rust default values.
    /// Comments come from the embedded template; values from `Config::default()`.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

/// Recursively merges values from source into target, keeping target's
/// comments and layout.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                // Keep the template's decoration (comments) on the key.
                let decor = target
                    .get(key)
                    .and_then(Item::as_value)
                    .map(|existing| existing.decor().clone());
                let mut v = v.clone();
                if let Some(decor) = decor {
                    *v.decor_mut() = decor;
                }
                target[key] = Item::Value(v);
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keep_seconds: BlinkEventLog::DEFAULT_KEEP_SECONDS,
            safe_boundary: Self::DEFAULT_SAFE_BOUNDARY,
            eviction: EvictionPolicy::default(),
            source: Self::DEFAULT_SOURCE.to_string(),
            pace: false,
            max_read_retries: 0,
            record_alerts: true,
            alert: AlertConfig::default(),
        }
    }
}
