//! Configuration loading, persistence, and validation.
//!
//! The configuration lives at `$XDG_CONFIG_HOME/brightr/config.json` (via
//! the `dirs` crate, so the platform convention is respected). The file
//! holds the brightness schedule plus a small number of optional knobs:
//!
//! ```json
//! {
//!   "backend": "auto",
//!   "poll_interval": 60,
//!   "schedule": [
//!     { "time": "07:00", "brightness": 70 },
//!     { "time": "22:00", "brightness": 30 }
//!   ]
//! }
//! ```
//!
//! `time` is a zero-padded 24-hour "HH:MM" string; `brightness` an integer
//! 0-100. Optional fields are omitted on save, so a file that only ever
//! contained a schedule round-trips without gaining keys.
//!
//! ## Validation
//!
//! Schedule entries are validated during deserialization (range and time
//! format); the remaining fields are checked here. Invalid configurations
//! fail loading with a descriptive message and never replace the previous
//! in-memory state.
//!
//! When no configuration exists, a default file is generated from the
//! built-in schedule table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::logger::Log;
use crate::schedule::{Schedule, format_time_of_day};

/// Actuation backend selection.
///
/// Determines which external mechanism is used to apply brightness
/// changes. `Auto` probes for the first available one at startup and
/// keeps the rest as fallbacks.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Probe in order: Lunar → MonitorControl → brightness tool.
    Auto,
    /// The Lunar app, driven over AppleScript.
    Lunar,
    /// The MonitorControl menu-bar app, driven via System Events.
    MonitorControl,
    /// The `brightness` command-line tool.
    BrightnessTool,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::Lunar => "lunar",
            BackendKind::MonitorControl => "monitor-control",
            BackendKind::BrightnessTool => "brightness-tool",
        }
    }
}

/// Application configuration: the schedule plus optional daemon knobs.
///
/// Optional fields fall back to the defaults in [`crate::constants`] and
/// are skipped on serialization when unset.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Which actuation backend to use. Defaults to auto-detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendKind>,

    /// Seconds between schedule checks in the daemon loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// The time → brightness table. May be empty; the daemon then falls
    /// back to a fixed default level and says so.
    pub schedule: Schedule,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("brightr").join("config.json"))
    }

    /// Write a default configuration file built from the built-in table.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let config = Config {
            backend: None,
            poll_interval: None,
            schedule: Schedule::default_table(),
        };
        config.save_to_path(path)?;

        Log::log_block_start(&format!(
            "Created default configuration at {}",
            path.display()
        ));
        Ok(())
    }

    /// Load configuration from a specific path.
    ///
    /// Unlike [`Config::load`], this never creates a default file; a
    /// missing path is an error. Tests and scripted callers use this to
    /// avoid touching the real config directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the configuration, generating a default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
    }

    /// Persist this configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::get_config_path()?)
    }

    /// Persist this configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let mut content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        content.push('\n');

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Check the fields the schedule deserializer doesn't cover.
    pub fn validate(&self) -> Result<()> {
        if let Some(interval) = self.poll_interval {
            if !(MINIMUM_POLL_INTERVAL..=MAXIMUM_POLL_INTERVAL).contains(&interval) {
                anyhow::bail!(
                    "Poll interval must be between {} and {} seconds",
                    MINIMUM_POLL_INTERVAL,
                    MAXIMUM_POLL_INTERVAL
                );
            }
        }
        Ok(())
    }

    /// Backend selection, defaulted.
    pub fn backend(&self) -> BackendKind {
        self.backend.unwrap_or(DEFAULT_BACKEND)
    }

    /// Poll interval in seconds, defaulted.
    pub fn poll_interval(&self) -> u64 {
        self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    pub fn log_config(&self) {
        let config_path = Self::get_config_path()
            .unwrap_or_else(|_| PathBuf::from("~/.config/brightr/config.json"));

        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            config_path.display()
        ));
        Log::log_indented(&format!("Backend: {}", self.backend().as_str()));
        Log::log_indented(&format!("Poll interval: {} seconds", self.poll_interval()));

        if self.schedule.is_empty() {
            Log::log_indented(&format!(
                "Schedule: empty (using {}% fallback)",
                FALLBACK_BRIGHTNESS
            ));
        } else {
            Log::log_indented(&format!("Schedule: {} entries", self.schedule.len()));
            for entry in self.schedule.entries() {
                Log::log_indented(&format!(
                    "  {} → {}%",
                    format_time_of_day(entry.time),
                    entry.brightness
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::parse_time_of_day;
    use tempfile::tempdir;

    fn write_config_file(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("brightr").join("config.json");
        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::write(&config_path, content).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_minimal_schedule_only_config() {
        let (_tmp, path) = write_config_file(
            r#"{"schedule": [{"time": "07:00", "brightness": 70}, {"time": "22:00", "brightness": 30}]}"#,
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.schedule.len(), 2);
        assert_eq!(config.backend(), BackendKind::Auto);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_load_full_config() {
        let (_tmp, path) = write_config_file(
            r#"{
                "backend": "lunar",
                "poll_interval": 120,
                "schedule": [{"time": "09:00", "brightness": 60}]
            }"#,
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.backend(), BackendKind::Lunar);
        assert_eq!(config.poll_interval(), 120);
    }

    #[test]
    fn test_load_rejects_out_of_range_brightness() {
        let (_tmp, path) =
            write_config_file(r#"{"schedule": [{"time": "07:00", "brightness": 150}]}"#);

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("out of range"));
    }

    #[test]
    fn test_load_rejects_malformed_time() {
        let (_tmp, path) =
            write_config_file(r#"{"schedule": [{"time": "7 o'clock", "brightness": 50}]}"#);

        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_load_rejects_bad_poll_interval() {
        let (_tmp, path) = write_config_file(
            r#"{"poll_interval": 5, "schedule": [{"time": "07:00", "brightness": 70}]}"#,
        );

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Poll interval"));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nope.json");
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("brightr").join("config.json");

        let mut config = Config {
            backend: None,
            poll_interval: None,
            schedule: Schedule::default_table(),
        };
        config
            .schedule
            .add_or_replace(parse_time_of_day("23:45").unwrap(), 15)
            .unwrap();

        config.save_to_path(&path).unwrap();
        let reloaded = Config::load_from_path(&path).unwrap();

        assert_eq!(reloaded.schedule, config.schedule);
    }

    #[test]
    fn test_optional_fields_are_not_serialized_when_unset() {
        let config = Config {
            backend: None,
            poll_interval: None,
            schedule: Schedule::default_table(),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("backend"));
        assert!(!json.contains("poll_interval"));
    }

    #[test]
    fn test_create_default_config_is_loadable() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("brightr").join("config.json");

        Log::set_enabled(false);
        Config::create_default_config(&path).unwrap();
        Log::set_enabled(true);

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.schedule, Schedule::default_table());
    }
}
