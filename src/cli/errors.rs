//! CLI-specific error types
//!
//! All CLI errors are fatal: the binary prints them and exits non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::source::SourceError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Data directory {0} already initialized")]
    AlreadyInitialized(PathBuf),

    #[error("Data directory {0} not initialized. Run 'geolayers init' first.")]
    NotInitialized(PathBuf),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Boot failed: {0}")]
    BootFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code printed alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "GEO_CLI_CONFIG_ERROR",
            Self::AlreadyInitialized(_) => "GEO_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized(_) => "GEO_CLI_NOT_INITIALIZED",
            Self::Catalog(_) => "GEO_CLI_CATALOG_ERROR",
            Self::Source(_) => "GEO_CLI_SOURCE_ERROR",
            Self::Auth(_) => "GEO_CLI_AUTH_ERROR",
            Self::BootFailed(_) => "GEO_CLI_BOOT_FAILED",
            Self::Io(_) | Self::Json(_) => "GEO_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
