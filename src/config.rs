//! Configuration handling for the form tool

use crate::persistence::{DEFAULT_QUIET_WINDOW, MAX_QUIET_WINDOW};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// User configuration, read from `config.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FormConfig {
    /// Where saved form data and the log file live
    pub data_dir: Option<PathBuf>,
    /// Where exported reports are written
    pub export_dir: Option<PathBuf>,
    /// Quiet window before a typed edit is saved
    pub autosave_quiet_ms: Option<u64>,
    /// Set to false to keep form data in memory only
    pub persistence_enabled: Option<bool>,
}

impl FormConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("ph", "deped", "monitoring-form")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn quiet_window(&self) -> Duration {
        self.autosave_quiet_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_QUIET_WINDOW)
            .min(MAX_QUIET_WINDOW)
    }

    pub fn persistence_enabled(&self) -> bool {
        self.persistence_enabled.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert_eq!(config.quiet_window(), Duration::from_millis(500));
        assert!(config.persistence_enabled());
    }

    #[test]
    fn test_explicit_values_win() {
        let config = FormConfig {
            data_dir: Some(PathBuf::from("/var/lib/monitoring")),
            autosave_quiet_ms: Some(250),
            persistence_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(config.data_dir(), Some(PathBuf::from("/var/lib/monitoring")));
        assert_eq!(config.quiet_window(), Duration::from_millis(250));
        assert!(!config.persistence_enabled());
    }

    #[test]
    fn test_huge_quiet_window_is_clamped() {
        let parsed: FormConfig =
            serde_json::from_str(r#"{"autosave_quiet_ms": 18446744073709551615}"#).unwrap();
        assert_eq!(parsed.quiet_window(), MAX_QUIET_WINDOW);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: FormConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, FormConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"export_dir": "/tmp/reports", "theme": "dark"}"#;
        let parsed: FormConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.export_dir(), PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = FormConfig {
            export_dir: Some(PathBuf::from("reports")),
            autosave_quiet_ms: Some(800),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FormConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_path_is_json_file() {
        if let Some(path) = FormConfig::config_path() {
            assert!(path.ends_with("config.json"));
        }
    }
}
