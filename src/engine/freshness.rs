//! # Freshness Tracker
//!
//! `last_updated` is the newest `updated_at` across every collection in the
//! store. Inactive collections and other map types count too, so the value
//! can be newer than anything in the rendered layers.

use chrono::{DateTime, Utc};

use crate::catalog::{CatalogResult, CollectionStore};

/// Newest timestamp, or `None` for an empty input
pub fn latest<I>(timestamps: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    timestamps.into_iter().max()
}

/// Newest `updated_at` over all collections in the store
pub fn last_updated(store: &dyn CollectionStore) -> CatalogResult<Option<DateTime<Utc>>> {
    Ok(latest(store.collection_timestamps()?))
}
