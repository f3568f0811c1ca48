//! # Feature Sources
//!
//! Where collections' raw GeoJSON documents live, and how they are parsed
//! into an ordered feature sequence.

pub mod backend;
pub mod errors;
pub mod geojson;
pub mod local;
pub mod memory;

pub use backend::SourceBackend;
pub use errors::{SourceError, SourceResult};
pub use geojson::{feature_properties, RawFeatureCollection};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
