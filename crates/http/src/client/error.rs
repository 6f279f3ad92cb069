//! Client error types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use warden_core::FetchError;

/// Body and status of a non-success response, exactly as the server sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: u16,
    /// Parsed JSON body, or the raw text as a JSON string
    pub body: Value,
}

impl ErrorPayload {
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Build from a raw response body
    pub fn from_text(status: u16, text: String) -> Self {
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Self { status, body }
    }

    /// Server-supplied `message` field, if any
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request construction error; no response was received
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server rejected request with status {}", .0.status)]
    Rejected(ErrorPayload),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Status code of a rejected response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected(payload) => Some(payload.status),
            _ => None,
        }
    }

    /// Original server payload of a rejected response
    pub const fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Rejected(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether the session was rejected (401 or 403)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected(payload) => Self::Rejected {
                status: payload.status,
            },
            ClientError::Serialization(err) => Self::Malformed(err.to_string()),
            ClientError::Request(err) => Self::Transport(err.to_string()),
            ClientError::Configuration(message) => Self::Transport(message),
        }
    }
}
