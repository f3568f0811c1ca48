//! # Source Errors

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Failures reading or parsing a collection's raw feature document
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Source unreadable: {0}")]
    Unreadable(String),

    #[error("Source malformed: {0}")]
    Malformed(String),

    #[error("Invalid source path: {0}")]
    InvalidPath(String),
}

impl SourceError {
    /// Missing or unreadable, as opposed to present-but-unparseable
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            SourceError::NotFound(_) | SourceError::Unreadable(_) | SourceError::InvalidPath(_)
        )
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            SourceError::NotFound(_) => 404,
            SourceError::Unreadable(_) => 500,
            SourceError::Malformed(_) => 422,
            SourceError::InvalidPath(_) => 400,
        }
    }
}
