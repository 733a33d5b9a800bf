use livemark_engine::{LinkScanScope, Mode, OpenModifier, PreviewSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "LIVEMARK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Viewer settings. Every field is optional in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub open_modifier: OpenModifier,
    pub link_scan: LinkScanScope,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$LIVEMARK_CONFIG` when set (shell-expanded), else `~/.config/livemark/config.toml`.
    pub fn config_path() -> PathBuf {
        Self::config_path_from(std::env::var(CONFIG_ENV_VAR).ok())
    }

    /// Resolves the config location from the override value, if any.
    pub fn config_path_from(custom: Option<String>) -> PathBuf {
        if let Some(custom) = custom {
            let custom = PathBuf::from(custom);
            return Self::expand_path(&custom).unwrap_or(custom);
        }
        let config_dir = shellexpand::tilde("~/.config/livemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Settings for a new `LivePreview`.
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            mode: self.mode,
            open_modifier: self.open_modifier,
            link_scan: self.link_scan,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
