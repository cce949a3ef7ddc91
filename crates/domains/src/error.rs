//! # DomainError
//!
//! Centralized error handling for ABOS.
//! A missing record is not an error: lookups by id return `Ok(None)`.

use thiserror::Error;

/// The primary error type for all store and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Input rejected before anything was written (e.g. blank title)
    #[error("validation error: {0}")]
    Validation(String),

    /// The session's role does not allow the action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The key-value medium failed (e.g. quota exceeded, disk unavailable)
    #[error("storage error: {0}")]
    Storage(String),

    /// A record could not be encoded for storage
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Text safe to show to an end user. Validation and permission messages
    /// are passed through; infrastructure faults collapse into a generic
    /// notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Storage(_) | Self::Serialization(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// A specialized Result type for ABOS logic.
pub type Result<T> = std::result::Result<T, DomainError>;
