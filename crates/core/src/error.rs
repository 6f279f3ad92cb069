//! Errors raised by the core crate

use thiserror::Error;

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Configuration could not be loaded: {message}")]
    InvalidConfig { message: String },

    /// The session storage backend refused a read or write
    #[error("Session storage unavailable: {message}")]
    Storage { message: String },

    #[error("Could not encode session data: {message}")]
    Serialization { message: String },
}

impl CoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
