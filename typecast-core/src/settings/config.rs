use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{Result, TypecastError};

pub const API_KEY_VAR: &str = "TYPECAST_API_KEY";
pub const API_HOST_VAR: &str = "TYPECAST_API_HOST";
pub const OUTPUT_DIR_VAR: &str = "TYPECAST_OUTPUT_DIR";
pub const REQUEST_TIMEOUT_VAR: &str = "TYPECAST_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_HOST: &str = "https://api.typecast.ai";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Process-wide configuration. Built once at startup and only ever read
/// afterwards, so it is shared behind an `Arc` without locking.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_host: Url,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host.as_str())
            .field("output_dir", &self.output_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup so callers (and tests) can
    /// supply values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = read(API_KEY_VAR).ok_or_else(|| {
            TypecastError::Config(format!("{API_KEY_VAR} environment variable is required"))
        })?;

        let host = read(API_HOST_VAR).unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        let api_host = Url::parse(&host)
            .map_err(|e| TypecastError::Config(format!("Invalid {API_HOST_VAR} '{host}': {e}")))?;

        let output_dir = match read(OUTPUT_DIR_VAR) {
            Some(dir) => expand_home(&dir),
            None => default_output_dir()?,
        };

        let request_timeout = match read(REQUEST_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    TypecastError::Config(format!(
                        "Invalid {REQUEST_TIMEOUT_VAR} '{raw}': expected whole seconds"
                    ))
                })?;
                if secs == 0 {
                    return Err(TypecastError::Config(format!(
                        "{REQUEST_TIMEOUT_VAR} must be greater than zero"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            api_host,
            output_dir,
            request_timeout,
        })
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }
}

/// Default output location (~/Downloads/typecast_output)
pub fn default_output_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TypecastError::Config("Failed to get home directory".to_string()))?;
    Ok(home.join("Downloads").join("typecast_output"))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
