use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use chartdown_engine::{BlockType, ExtractOptions, RenderOptions};

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

    #[error("Unknown block type in config: {0}")]
    UnknownBlockType(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory rendered outputs and the manifest are written to.
    pub output_dir: PathBuf,
    /// Scan untagged prose for progression-shaped lines.
    #[serde(default = "default_auto_detect")]
    pub auto_detect: bool,
    /// Block type tags to extract; empty means all of them.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub scale: f32,
    pub accent_color: String,
}

fn default_auto_detect() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        let defaults = RenderOptions::default();
        Self {
            width: defaults.width,
            scale: defaults.scale,
            accent_color: defaults.accent_color,
        }
    }
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded output path
        config.output_dir = Self::expand_path(&config.output_dir).unwrap_or(config.output_dir);

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

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/chartdown");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Extraction options derived from this config.
    pub fn extract_options(&self) -> Result<ExtractOptions, ConfigError> {
        let mut options = ExtractOptions {
            auto_detect: self.auto_detect,
            ..ExtractOptions::default()
        };
        if !self.types.is_empty() {
            options.types = self
                .types
                .iter()
                .map(|tag| {
                    BlockType::from_tag(tag)
                        .ok_or_else(|| ConfigError::UnknownBlockType(tag.clone()))
                })
                .collect::<Result<_, _>>()?;
        }
        Ok(options)
    }

    /// Render options derived from this config.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.render.width,
            scale: self.render.scale,
            accent_color: self.render.accent_color.clone(),
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
