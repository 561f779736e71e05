//! Configuration module
//!
//! Client settings come from the environment (optionally a `.env` file).
//! The service address is a deployment-time value; timeouts bound every
//! request so a hung service cannot leave the workflow stuck.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_SERVICE_URL;

const UPLOAD_TIMEOUT_SECS: u64 = 300;
const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub service_url: String,
    pub api_key: Option<String>,
    pub upload_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            api_key: None,
            upload_timeout_secs: UPLOAD_TIMEOUT_SECS,
            download_timeout_secs: DOWNLOAD_TIMEOUT_SECS,
            download_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Load from the process environment. A `.env` file in the working
    /// directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let service_url = lookup("TAMPERGUARD_SERVICE_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.service_url);

        let api_key = lookup("TAMPERGUARD_API_KEY").filter(|v| !v.is_empty());

        let upload_timeout_secs = parse_secs(
            "TAMPERGUARD_UPLOAD_TIMEOUT_SECS",
            lookup("TAMPERGUARD_UPLOAD_TIMEOUT_SECS"),
            defaults.upload_timeout_secs,
        )?;
        let download_timeout_secs = parse_secs(
            "TAMPERGUARD_DOWNLOAD_TIMEOUT_SECS",
            lookup("TAMPERGUARD_DOWNLOAD_TIMEOUT_SECS"),
            defaults.download_timeout_secs,
        )?;

        let download_dir = lookup("TAMPERGUARD_DOWNLOAD_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        Ok(Self {
            service_url,
            api_key,
            upload_timeout_secs,
            download_timeout_secs,
            download_dir,
        })
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn parse_secs(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value,
            reason: "must be greater than zero",
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::InvalidValue {
            var,
            value,
            reason: "expected a whole number of seconds",
        }),
    }
}
