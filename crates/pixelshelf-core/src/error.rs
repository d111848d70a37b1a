//! Error types

use thiserror::Error;
use uuid::Uuid;

/// Input rejected locally, before anything is sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name is too long ({len} characters, maximum {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("No saved search with id {0}")]
    UnknownSavedSearch(Uuid),

    #[error("No images selected")]
    EmptySelection,

    #[error("Too many images selected ({len}, maximum {max} per batch)")]
    SelectionTooLarge { len: usize, max: usize },
}

/// Failure talking to the REST API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Session expired")]
    Unauthorized,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: u16) -> Self {
        if status == 401 {
            ApiError::Unauthorized
        } else {
            ApiError::Status(status)
        }
    }
}
