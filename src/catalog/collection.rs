//! # Collections and Layers
//!
//! A collection is one uploaded feature source with its styling. Every
//! collection owns exactly one layer, its display binding on the map.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{CatalogError, CatalogResult};

/// Default display color for new collections
pub const DEFAULT_COLOR: &str = "#007cff";

/// Default map-type partition for new collections
pub const DEFAULT_MAP_TYPE: &str = "embed";

/// Maximum length of a collection name
pub const MAX_NAME_LEN: usize = 200;

/// Collection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(u64);

impl CollectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(u64);

impl LayerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Path of the raw GeoJSON document, relative to the source root
    pub source: String,
    pub color: String,
    /// Symbol reference, resolved through the symbol store
    #[serde(default)]
    pub symbol: Option<String>,
    pub is_active: bool,
    pub map_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub map_type: Option<String>,
}

impl NewCollection {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_map_type(mut self, map_type: impl Into<String>) -> Self {
        self.map_type = Some(map_type.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = Some(false);
        self
    }

    /// Check every provided field without creating anything
    pub fn validate(&self) -> CatalogResult<()> {
        validate_name(&self.name)?;
        validate_source(&self.source)?;
        if let Some(ref color) = self.color {
            validate_color(color)?;
        }
        Ok(())
    }

    /// Validate and materialize into a collection
    pub(crate) fn into_collection(self, id: CollectionId, now: DateTime<Utc>) -> CatalogResult<Collection> {
        self.validate()?;
        let color = self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());

        Ok(Collection {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            source: self.source,
            color,
            symbol: self.symbol.filter(|s| !s.is_empty()),
            is_active: self.is_active.unwrap_or(true),
            map_type: self
                .map_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MAP_TYPE.to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub map_type: Option<String>,
}

impl CollectionPatch {
    /// Apply to a collection, validating every provided field first
    pub(crate) fn apply(self, collection: &mut Collection, now: DateTime<Utc>) -> CatalogResult<()> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref source) = self.source {
            validate_source(source)?;
        }
        if let Some(ref color) = self.color {
            validate_color(color)?;
        }

        if let Some(name) = self.name {
            collection.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            collection.description = Some(description);
        }
        if let Some(source) = self.source {
            collection.source = source;
        }
        if let Some(color) = self.color {
            collection.color = color;
        }
        if let Some(symbol) = self.symbol {
            // An empty string clears the symbol
            collection.symbol = Some(symbol).filter(|s| !s.is_empty());
        }
        if let Some(is_active) = self.is_active {
            collection.is_active = is_active;
        }
        if let Some(map_type) = self.map_type.filter(|m| !m.is_empty()) {
            collection.map_type = map_type;
        }
        collection.updated_at = now;
        Ok(())
    }
}

/// Display binding of one collection onto the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub collection_id: CollectionId,
    pub is_visible: bool,
    /// Display hint only; never used to sort map data
    pub order: i32,
}

impl Layer {
    /// The default layer created alongside a collection
    pub(crate) fn default_for(id: LayerId, collection_id: CollectionId) -> Self {
        Self {
            id,
            collection_id,
            is_visible: true,
            order: 0,
        }
    }
}

/// Partial update of a layer
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LayerPatch {
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub order: Option<i32>,
}

impl LayerPatch {
    pub(crate) fn apply(self, layer: &mut Layer) {
        if let Some(is_visible) = self.is_visible {
            layer.is_visible = is_visible;
        }
        if let Some(order) = self.order {
            layer.order = order;
        }
    }
}

/// Selection criteria for listing collections
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub active_only: bool,
    pub map_type: Option<String>,
}

impl CollectionFilter {
    /// Every collection, active or not
    pub fn all() -> Self {
        Self::default()
    }

    /// Active collections, optionally restricted to one map type
    pub fn active(map_type: Option<&str>) -> Self {
        Self {
            active_only: true,
            map_type: map_type.map(str::to_string),
        }
    }

    pub fn matches(&self, collection: &Collection) -> bool {
        if self.active_only && !collection.is_active {
            return false;
        }
        match self.map_type {
            Some(ref map_type) => collection.map_type == *map_type,
            None => true,
        }
    }
}

fn validate_name(name: &str) -> CatalogResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::invalid_field("name", "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::invalid_field(
            "name",
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

fn validate_source(source: &str) -> CatalogResult<()> {
    if source.trim().is_empty() {
        return Err(CatalogError::invalid_field("source", "must not be empty"));
    }
    Ok(())
}

/// Colors are stored as `#rrggbb`
pub fn validate_color(color: &str) -> CatalogResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidColor(color.to_string()))
    }
}
