use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypecastError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected before any request is sent upstream.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Non-2xx response from the Typecast API, body kept verbatim.
    #[error("Typecast API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TypecastError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the caller's arguments rather than by the
    /// upstream service or the local machine.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UnknownTool(_) | Self::InvalidArguments(_)
        )
    }
}

pub type Result<T, E = TypecastError> = std::result::Result<T, E>;
