use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persisted identity/mode store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures of a data request, live or demo.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Any non-2xx answer from the API.
    #[error("API error: {status}")]
    RequestFailed { status: u16 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// A demo fixture lookup missed.
    #[error("trade {id} not found")]
    NotFound { id: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A query reply carried a different payload than its key asks for.
    #[error("unexpected payload for query")]
    UnexpectedPayload,

    #[error("{0} is not available in demo mode")]
    DemoUnsupported(&'static str),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// 403/404 from the API or a demo miss. Screens collapse these into
    /// one "not found or access denied" message.
    pub fn is_denied_or_missing(&self) -> bool {
        matches!(
            self,
            ClientError::RequestFailed { status: 403 | 404 } | ClientError::NotFound { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failures while assembling [`crate::config::JournalConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value `{value}` for {key}")]
    Env { key: &'static str, value: String },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
