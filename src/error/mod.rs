// Error types for polytrans
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },

    /// Non-success HTTP status from a provider. Carries the status text so
    /// callers can surface it without re-reading the body.
    #[error("HTTP {status} {status_text}: {body}")]
    Transport {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Provider response error: {0}")]
    Provider(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),
}

impl TranslateError {
    /// HTTP status of a failed round trip, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TranslateError::Transport { status, .. } => Some(*status),
            TranslateError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn unsupported(provider: &'static str, operation: &'static str) -> Self {
        TranslateError::Unsupported {
            provider,
            operation,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
