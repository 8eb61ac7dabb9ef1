use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings, stored as `config.toml` in the user's config directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Where section records live. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// `error`, `warn`, `info`, `debug` or `trace`. `RUST_LOG` still wins.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads settings from a TOML file. Falls back to defaults on any error.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("config file is invalid, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Location of the config file in the user's config directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hotspot-maker")
            .join("config.toml")
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("HotspotMaker")
        })
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
