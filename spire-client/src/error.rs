//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum SpireError {
    /// Lookup by id or query found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local check failed before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote rejected the request
    #[error("API error: {message}")]
    Api { status: Option<u16>, message: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response decoded but had the wrong shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client misconfigured
    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record does not exist
    NotFound,
    /// Rejected locally, nothing was sent
    Validation,
    /// Remote or transport failure
    Api,
}

impl SpireError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SpireError::NotFound(_) => ErrorKind::NotFound,
            SpireError::Validation(_) | SpireError::Config(_) => ErrorKind::Validation,
            SpireError::Api { .. }
            | SpireError::Http(_)
            | SpireError::Serialization(_)
            | SpireError::InvalidResponse(_) => ErrorKind::Api,
        }
    }

    /// HTTP status of a remote rejection, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            SpireError::Api { status, .. } => *status,
            SpireError::NotFound(_) => Some(404),
            SpireError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type SpireResult<T> = Result<T, SpireError>;
