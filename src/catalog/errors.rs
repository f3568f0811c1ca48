//! # Catalog Errors

use thiserror::Error;

use super::collection::{CollectionId, LayerId};

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by the collection, override and symbol stores
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    // Lookup errors
    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Symbol already exists: {0}")]
    SymbolAlreadyExists(String),

    // Validation errors
    #[error("Invalid color: {0} (expected #rrggbb)")]
    InvalidColor(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    // Persistence
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Catalog {0} is in use by another process")]
    Locked(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Shorthand for field validation failures
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::CollectionNotFound(_) => 404,
            CatalogError::LayerNotFound(_) => 404,
            CatalogError::SymbolNotFound(_) => 404,
            CatalogError::SymbolAlreadyExists(_) => 409,
            CatalogError::InvalidColor(_) => 400,
            CatalogError::InvalidField { .. } => 400,
            CatalogError::Snapshot(_) => 500,
            CatalogError::Locked(_) => 409,
            CatalogError::Internal(_) => 500,
        }
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
