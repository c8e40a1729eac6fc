// src/error.rs
use thiserror::Error;

/// Why a chat round trip failed. Every variant renders the same
/// connection-error line; the distinction is for logs.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to chat endpoint: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("chat request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("chat request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("chat reply was not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else if err.is_connect() {
            ClientError::Connect(err)
        } else {
            ClientError::Transport(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chat endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
