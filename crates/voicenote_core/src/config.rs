//! JSON configuration file for the note core.
//!
//! # Responsibility
//! - Load/save `CoreConfig` from a JSON file with serde defaults.
//! - Resolve the database path from explicit input, env, or a fallback.
//!
//! # Invariants
//! - A missing file yields defaults; a malformed file is an error.
//! - `validate()` runs on every load.

use crate::logging::default_log_level;
use crate::service::note_service::DEFAULT_DEVICE_ID;
use crate::service::title::{is_valid_title_format, DEFAULT_TITLE_FORMAT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "voicenote.json";
/// Environment override for the database file path.
pub const DB_PATH_ENV: &str = "VOICENOTE_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "voicenote.sqlite3";
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_device_id")]
    pub device_id: String,
    #[serde(default = "default_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_title_format")]
    pub title_format: String,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            device_id: default_device_id(),
            log_level: default_level(),
            log_dir: None,
            title_format: default_title_format(),
            utc_offset_minutes: None,
        }
    }
}

fn default_device_id() -> String {
    DEFAULT_DEVICE_ID.to_string()
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_title_format() -> String {
    DEFAULT_TITLE_FORMAT.to_string()
}

impl CoreConfig {
    /// Loads config from `path`, falling back to defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Writes pretty JSON to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| ConfigError::Io {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }
        let content = self.to_pretty_json().map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;
        fs::write(path, content).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks field-level constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "device_id",
                message: "must not be blank".to_string(),
            });
        }
        if !is_valid_title_format(&self.title_format) {
            return Err(ConfigError::Invalid {
                field: "title_format",
                message: format!("`{}` is not a valid strftime pattern", self.title_format),
            });
        }
        if let Some(offset) = self.utc_offset_minutes {
            if offset.abs() > MAX_UTC_OFFSET_MINUTES {
                return Err(ConfigError::Invalid {
                    field: "utc_offset_minutes",
                    message: format!("{offset} is outside +-{MAX_UTC_OFFSET_MINUTES}"),
                });
            }
        }
        Ok(())
    }

    /// Database path: config value, then `VOICENOTE_DB_PATH`, then the temp dir.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(path) = self.db_path.as_ref() {
            return path.clone();
        }
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "config io error at `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed config `{}`: {source}", path.display())
            }
            Self::Invalid { field, message } => write!(f, "invalid config `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}
