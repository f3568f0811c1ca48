//! # Map Symbols
//!
//! Icons referenced by collections. The map only ever sees the resolved URL.

use serde::{Deserialize, Serialize};

use super::errors::{CatalogError, CatalogResult};

/// A registered map symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Slug used as the reference from collections (e.g. "marker")
    pub id: String,
    pub name: String,
    /// Image path relative to the media URL
    pub image: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_active() -> bool {
    true
}

impl Symbol {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            category: default_category(),
            is_active: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        let slug_ok = !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !slug_ok {
            return Err(CatalogError::invalid_field(
                "id",
                "must be a non-empty slug of letters, digits, '-' or '_'",
            ));
        }
        if self.image.trim().is_empty() {
            return Err(CatalogError::invalid_field("image", "must not be empty"));
        }
        Ok(())
    }

    /// Join the image path onto the media URL prefix
    pub fn url(&self, media_url: &str) -> String {
        format!(
            "{}/{}",
            media_url.trim_end_matches('/'),
            self.image.trim_start_matches('/')
        )
    }
}
