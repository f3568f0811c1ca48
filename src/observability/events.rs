//! Observable events
//!
//! Every notable log line carries an `event` field taken from this enum, so
//! log consumers can match on a stable name instead of message text.

use std::fmt;

/// Observable events in the map service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Service startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Catalog opened (snapshot loaded or created)
    CatalogOpened,
    /// HTTP listener bound, ready to serve
    ServerListening,

    // Read path
    /// Map data composed
    MapDataComposed,
    /// One layer left out of map data because its source failed
    LayerSkipped,
    /// Map data composition failed as a whole; empty payload served
    AggregationFailed,

    // Write path
    /// Feature override created or updated
    FeatureToggled,
    /// Feature toggle rejected or failed
    ToggleFailed,
    /// Layer visibility changed in bulk
    LayersBulkUpdated,
    /// Collection created with its layer
    CollectionCreated,
    /// Collection and its layer deleted
    CollectionDeleted,

    // Auth
    /// Admin logged in
    LoginSucceeded,
    /// Login or authorization rejected
    AuthRejected,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogOpened => "CATALOG_OPENED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::MapDataComposed => "MAP_DATA_COMPOSED",
            Event::LayerSkipped => "LAYER_SKIPPED",
            Event::AggregationFailed => "AGGREGATION_FAILED",
            Event::FeatureToggled => "FEATURE_TOGGLED",
            Event::ToggleFailed => "TOGGLE_FAILED",
            Event::LayersBulkUpdated => "LAYERS_BULK_UPDATED",
            Event::CollectionCreated => "COLLECTION_CREATED",
            Event::CollectionDeleted => "COLLECTION_DELETED",
            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::AuthRejected => "AUTH_REJECTED",
        }
    }

    /// Whether the event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::LayerSkipped | Event::AggregationFailed | Event::ToggleFailed | Event::AuthRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
