//! # Map Engine
//!
//! Aggregation and visibility resolution for the map client.
//!
//! - `display`: name/address extraction from feature properties
//! - `visibility`: layer flag AND per-feature override
//! - `freshness`: newest collection timestamp
//! - `aggregate`: the read path, fail-soft per layer and overall
//! - `toggle`: the write path, atomic override upsert

pub mod aggregate;
pub mod display;
pub mod errors;
pub mod freshness;
pub mod toggle;
pub mod view;
pub mod visibility;

pub use aggregate::Aggregator;
pub use display::{resolve_display, DisplayFields, ADDRESS_KEYS, NAME_KEYS};
pub use errors::{EngineError, EngineResult};
pub use freshness::last_updated;
pub use toggle::{ToggleAck, ToggleHandler, ToggleRequest};
pub use view::{FeatureDetail, LayerView, MapData, RenderedCollection};
pub use visibility::{effective_visibility, FeatureVisibility, OverrideSet, VisibilityResolver};
