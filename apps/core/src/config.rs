use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hotkey::{validate_hotkey, DEFAULT_HOTKEY};

pub const APP_DIR_NAME: &str = "tcode-helper";
pub const CONFIG_FILE_NAME: &str = "tcode-helper.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub icon_path: PathBuf,
    pub hotkey: String,
    pub log_level: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("tcodes.json"),
            icon_path: PathBuf::from("logo.png"),
            hotkey: DEFAULT_HOTKEY.to_string(),
            log_level: "info".to_string(),
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
        }
    }
}

/// Per-user data directory; falls back to the temp dir when the platform has
/// no notion of one.
pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.catalog_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("catalog_path is required".into()));
    }

    if cfg.icon_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("icon_path is required".into()));
    }

    validate_hotkey(&cfg.hotkey).map_err(ConfigError::Invalid)?;

    tracing_subscriber::EnvFilter::try_new(&cfg.log_level)
        .map_err(|error| ConfigError::Invalid(format!("log_level: {error}")))?;

    Ok(())
}

/// Loads the config at `path`, or the default location when `None`.
///
/// A missing file means defaults. The hotkey is returned canonicalized.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut config = match std::fs::read_to_string(&config_path) {
        Ok(text) => toml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };
    config.config_path = config_path;

    validate(&config)?;
    config.hotkey = validate_hotkey(&config.hotkey).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    validate(config)?;
    let text = toml::to_string_pretty(config)?;
    if let Some(parent) = config.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&config.config_path, text).map_err(|source| ConfigError::Write {
        path: config.config_path.clone(),
        source,
    })
}
