//! Settings for talking to the control panel.
//!
//! Values come from an optional JSON settings file, overridden by
//! `PANEL_*` environment variables. `Settings` is built once at startup
//! and passed down by reference.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::path::Account;

pub const ENV_USERNAME: &str = "PANEL_USERNAME";
pub const ENV_HOST: &str = "PANEL_HOST";
pub const ENV_API_TOKEN: &str = "PANEL_API_TOKEN";
pub const ENV_BASE_URL: &str = "PANEL_BASE_URL";
pub const ENV_HOME_BASE: &str = "PANEL_HOME_BASE";
pub const ENV_TIMEOUT_SECS: &str = "PANEL_TIMEOUT_SECS";

pub const DEFAULT_HOME_BASE: &str = "/home";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// TLS port of the control panel.
pub const PANEL_PORT: u16 = 2083;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{path}': {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Contents of the optional settings file. Every field may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub username: Option<String>,
    pub host: Option<String>,
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub home_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileSettings {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default location of the settings file, e.g. `~/.config/panel-fm/settings.json`.
pub fn default_settings_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("panel-fm").join("settings.json"))
}

/// Who we are and where the panel lives. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub principal: String,
    pub token: String,
    pub base_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("principal", &self.principal)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub account: Account,
    pub timeout: Duration,
}

impl Settings {
    /// Load from `explicit` (must exist) or the default settings file (may
    /// be absent), then apply the process environment on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) => FileSettings::read(path)?,
            None => match default_settings_file() {
                Some(path) if path.is_file() => {
                    tracing::debug!("Reading settings from {}", path.display());
                    FileSettings::read(&path)?
                }
                _ => FileSettings::default(),
            },
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with `env` lookups; the environment wins.
    pub fn resolve<F>(file: FileSettings, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str, fallback: Option<String>| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or(fallback)
        };

        let principal = lookup(ENV_USERNAME, file.username).ok_or(ConfigError::Missing(ENV_USERNAME))?;
        let token = lookup(ENV_API_TOKEN, file.api_token).ok_or(ConfigError::Missing(ENV_API_TOKEN))?;

        let base_url = match lookup(ENV_BASE_URL, file.base_url) {
            Some(url) => url,
            None => {
                let host = lookup(ENV_HOST, file.host).ok_or(ConfigError::Missing(ENV_HOST))?;
                format!("https://{host}:{PANEL_PORT}")
            }
        };
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: ENV_BASE_URL,
                value: base_url,
                reason: "expected an http:// or https:// URL".into(),
            });
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let home_base = lookup(ENV_HOME_BASE, file.home_base).unwrap_or_else(|| DEFAULT_HOME_BASE.to_string());
        let account = Account::new(&home_base, &principal).map_err(|e| ConfigError::Invalid {
            key: ENV_HOME_BASE,
            value: home_base.clone(),
            reason: e.to_string(),
        })?;

        let timeout_secs = match env(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        // A zero timeout would fail every request before it is sent.
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                value: "0".into(),
                reason: "timeout must be at least one second".into(),
            });
        }

        Ok(Settings {
            credentials: Credentials {
                principal,
                token,
                base_url,
            },
            account,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
