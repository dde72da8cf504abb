use crate::scanner::PRODUCT_SUBPATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the cleaner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Overrides the `LOCALAPPDATA` environment variable as discovery root
    #[serde(default)]
    pub local_data_root: Option<PathBuf>,

    /// Product data directory relative to the local data root
    #[serde(default = "default_product_subpath")]
    pub product_subpath: PathBuf,

    /// Paths scanned instead of the product folders when none are given
    #[serde(default)]
    pub custom_paths: Vec<PathBuf>,

    /// Cleanup history configuration
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_data_root: None,
            product_subpath: default_product_subpath(),
            custom_paths: Vec::new(),
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Explicit history file; defaults to the per-user data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_product_subpath() -> PathBuf {
    PRODUCT_SUBPATH.iter().collect()
}

impl Config {
    /// Load config from file, or create default if not exists
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("jianying-cleaner").join("config.toml")
        } else {
            PathBuf::from(".jianying-cleaner.toml")
        }
    }
}
