//! Config persistence and path-resolution methods for `AttentionConfig`.
//!
//! Covers:
//! - `from_yaml` / `to_yaml` (string round-trip)
//! - `load_from` / `save_to` (YAML file I/O with atomic write)
//! - `load` / `save` against the XDG-style default path
//! - Path helpers (`config_dir`, `config_path`)

use super::config_struct::AttentionConfig;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the attention config inside the par-term config directory.
pub const CONFIG_FILE_NAME: &str = "attention.yaml";

impl AttentionConfig {
    /// Parse a config from YAML text, sanitising providers and logging any
    /// validation warnings.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid "all defaults" config.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: AttentionConfig = serde_yaml_ng::from_str(contents)?;
        config.sanitize();
        for warning in config.validate() {
            log::warn!("Attention config: {}", warning);
        }
        Ok(config)
    }

    /// Serialize to YAML text.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading attention config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Save configuration to an explicit path.
    ///
    /// Writes to a temp file then renames it so a crash mid-write never
    /// leaves a truncated config behind.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = self.to_yaml()?;
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Load configuration from the default path, creating it with defaults
    /// on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Attention config path: {:?}", config_path);

        if config_path.exists() {
            let config = Self::load_from(&config_path).with_context(|| {
                format!("Failed to load attention config {}", config_path.display())
            })?;
            Ok(config)
        } else {
            log::info!(
                "Attention config not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default attention config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        self.save_to(&config_path).with_context(|| {
            format!("Failed to save attention config {}", config_path.display())
        })
    }

    /// Get the configuration directory (using XDG convention on all
    /// platforms except Windows).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("par-term")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/par-term, matching the main terminal config
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("par-term")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WatchMode;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_from() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = AttentionConfig {
            auto_focus_attention: true,
            auto_focus_attention_idle_ms: 750,
            auto_focus_attention_watch_mode: WatchMode::Agents,
            ..AttentionConfig::default()
        };
        config.save_to(&path).expect("save should succeed");
        assert!(path.exists());
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = AttentionConfig::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = AttentionConfig::load_from(&temp_dir.path().join("missing.yaml"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_from_yaml_invalid_is_parse_error() {
        let err = AttentionConfig::from_yaml("auto_focus_attention: [not, a, bool]")
            .expect_err("invalid yaml must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        let config = AttentionConfig::from_yaml("  \n").unwrap();
        assert_eq!(config, AttentionConfig::default());
    }

    #[test]
    fn test_from_yaml_sanitizes_providers() {
        let config =
            AttentionConfig::from_yaml("attention_watch_providers: [Claude, ' claude ', Codex]")
                .unwrap();
        assert_eq!(config.attention_watch_providers, vec!["claude", "codex"]);
    }

    #[test]
    fn test_config_path_file_name() {
        assert!(AttentionConfig::config_path().ends_with(CONFIG_FILE_NAME));
    }
}
