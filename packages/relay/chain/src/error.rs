//! This module defines errors for the destination bridge client.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum BridgeError {
    #[error("bridge transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bridge response decode error: {0}")]
    Json(#[source] serde_json::Error),

    #[error("bridge rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("bridge http error {code}: {text}")]
    Http { code: StatusCode, text: String },

    #[error("bridge response carried neither a result nor an error")]
    MissingResult,
}
