//! # Engine Errors

use thiserror::Error;

use crate::catalog::{CatalogError, LayerId};
use crate::source::SourceError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Map engine errors
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    // Per-layer, contained by the aggregator
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Source malformed: {0}")]
    SourceMalformed(String),

    // Toggle validation
    #[error("{0}")]
    Validation(String),

    #[error("Layer {0} does not exist")]
    UnknownLayer(LayerId),

    // Escalated failures
    #[error("Map data aggregation failed: {0}")]
    AggregationFailure(String),

    #[error("Failed to store feature override: {0}")]
    ToggleStore(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::SourceUnreadable(_) => 500,
            EngineError::SourceMalformed(_) => 500,
            EngineError::Validation(_) => 400,
            EngineError::UnknownLayer(_) => 400,
            EngineError::AggregationFailure(_) => 500,
            EngineError::ToggleStore(_) => 500,
        }
    }

    /// Whether this error is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<SourceError> for EngineError {
    fn from(err: SourceError) -> Self {
        if err.is_unreadable() {
            EngineError::SourceUnreadable(err.to_string())
        } else {
            EngineError::SourceMalformed(err.to_string())
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        EngineError::AggregationFailure(err.to_string())
    }
}
