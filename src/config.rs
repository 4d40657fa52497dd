//! Scanner configuration persistence
//!
//! Stores user preferences in `~/.config/loupe/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config_paths::ConfigPaths;
use crate::diagnostics::{DetectorOptions, IndentStyle};
use crate::palette::ThemeKind;

/// Default quiet period before a debounced scan runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 130;
/// Allowed debounce range; values outside are clamped on load
pub const MIN_DEBOUNCE_MS: u64 = 120;
pub const MAX_DEBOUNCE_MS: u64 = 150;

/// Scanner configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Start with scanning switched on
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Palette used when the host does not report a theme
    #[serde(default)]
    pub theme: ThemeKind,

    /// `auto`, `tabs` or `spaces:N`
    #[serde(default)]
    pub indent_style: IndentStyle,

    #[serde(default = "default_true")]
    pub check_terminators: bool,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            theme: ThemeKind::default(),
            indent_style: IndentStyle::default(),
            check_terminators: true,
        }
    }
}

impl ScanConfig {
    /// Load the user's config, or return defaults if not found
    pub fn load() -> Self {
        match ConfigPaths::discover() {
            Some(paths) => Self::load_in(&paths),
            None => {
                tracing::debug!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load `config.yaml` under `paths`. Missing or broken files give defaults.
    pub fn load_in(paths: &ConfigPaths) -> Self {
        let path = paths.config_file();
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file, clamping out-of-range values
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let mut config: ScanConfig = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        let clamped = self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        if clamped != self.debounce_ms {
            tracing::warn!(
                "debounce_ms {} out of range, using {}",
                self.debounce_ms,
                clamped
            );
            self.debounce_ms = clamped;
        }
    }

    /// Write the config as YAML, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS))
    }

    pub fn detector_options(&self) -> DetectorOptions {
        DetectorOptions {
            indent_style: self.indent_style,
            check_terminators: self.check_terminators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = ScanConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_debounce_is_clamped() {
        let config = ScanConfig::from_yaml("debounce_ms: 5").unwrap();
        assert_eq!(config.debounce_ms, MIN_DEBOUNCE_MS);
        let config = ScanConfig::from_yaml("debounce_ms: 900").unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(MAX_DEBOUNCE_MS));
    }

    #[test]
    fn test_indent_style_field() {
        let config = ScanConfig::from_yaml("indent_style: \"spaces:2\"\ntheme: light").unwrap();
        assert_eq!(config.indent_style, IndentStyle::Spaces(2));
        assert_eq!(config.theme, ThemeKind::Light);
        assert!(ScanConfig::from_yaml("indent_style: sideways").is_err());
    }
}
