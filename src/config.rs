//! Service configuration
//!
//! One JSON file drives the CLI and the HTTP server. Every key except
//! `data_dir` has a default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{generate_secret, is_password_hash, AdminAccount, AuthGuard, JwtConfig};
use crate::http_server::HttpServerConfig;
use crate::observability::LogConfig;

/// File name of the catalog snapshot inside `data_dir`
pub const CATALOG_FILE: &str = "catalog.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Auth section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret (default: random per process)
    #[serde(default = "generate_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in minutes (default: 60)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,

    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

fn default_token_ttl() -> i64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secret(),
            token_ttl_minutes: default_token_ttl(),
            admins: Vec::new(),
        }
    }
}

impl AuthConfig {
    pub fn guard(&self) -> AuthGuard {
        AuthGuard::new(
            self.admins.clone(),
            JwtConfig::new(
                self.jwt_secret.clone(),
                Duration::minutes(self.token_ttl_minutes),
            ),
        )
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Source directory relative to `data_dir` (default: "geojson_files")
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Prefix for symbol image URLs (default: "/media/symbols")
    #[serde(default = "default_media_url")]
    pub media_url: String,

    /// Write catalog mutations to `data_dir/catalog.json` (default: true)
    #[serde(default = "default_persist")]
    pub persist: bool,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_source_dir() -> String {
    "geojson_files".to_string()
}
fn default_media_url() -> String {
    "/media/symbols".to_string()
}
fn default_persist() -> bool {
    true
}

impl Config {
    /// Config with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            source_dir: default_source_dir(),
            media_url: default_media_url(),
            persist: default_persist(),
            http: HttpServerConfig::default(),
            auth: AuthConfig::default(),
            log: LogConfig::default(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        if self.source_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("source_dir must not be empty".into()));
        }
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http.port must be > 0".into()));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_minutes must be > 0".into(),
            ));
        }
        if let Some(admin) = self
            .auth
            .admins
            .iter()
            .find(|a| !is_password_hash(&a.password_hash))
        {
            return Err(ConfigError::Invalid(format!(
                "auth.admins: password_hash of '{}' is not a PHC string (use `geolayers hash-password`)",
                admin.username
            )));
        }
        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn source_path(&self) -> PathBuf {
        self.data_path().join(&self.source_dir)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_path().join(CATALOG_FILE)
    }
}
