//! Collection HTTP Routes
//!
//! Admin CRUD over stored feature collections. Creating a collection
//! registers an existing source document; upload is done with
//! `geolayers import`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::catalog::{
    Collection, CollectionFilter, CollectionId, CollectionPatch, CollectionStore, Layer,
    NewCollection,
};
use crate::observability::Event;
use crate::source::RawFeatureCollection;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionListQuery {
    #[serde(default)]
    pub map_type: Option<String>,
    /// List inactive collections too
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedCollection {
    #[serde(flatten)]
    pub collection: Collection,
    pub layer: Layer,
    pub feature_count: usize,
}

pub fn collection_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/geojson-files",
            get(list_collections_handler).post(create_collection_handler),
        )
        .route(
            "/geojson-files/:id",
            get(get_collection_handler)
                .patch(update_collection_handler)
                .delete(delete_collection_handler),
        )
        .with_state(state)
}

/// Read and parse a source document off the async runtime
async fn load_source(state: &AppState, source: &str) -> ApiResult<RawFeatureCollection> {
    let sources = state.sources.clone();
    let source = source.to_string();
    let raw = tokio::task::spawn_blocking(move || RawFeatureCollection::load(sources.as_ref(), &source))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))??;
    Ok(raw)
}

async fn list_collections_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CollectionListQuery>,
) -> ApiResult<Json<Vec<Collection>>> {
    state.require_admin(&headers)?;

    let filter = CollectionFilter {
        active_only: !query.include_inactive,
        map_type: query.map_type.filter(|m| !m.is_empty()),
    };
    Ok(Json(state.catalog.list_collections(&filter)?))
}

async fn create_collection_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(new): Json<NewCollection>,
) -> ApiResult<(StatusCode, Json<CreatedCollection>)> {
    let claims = state.require_admin(&headers)?;

    // Refuse to register a document the aggregator could never render
    let raw = load_source(&state, &new.source).await?;
    let (collection, layer) = state.catalog.create_collection(new)?;

    info!(
        event = %Event::CollectionCreated,
        collection_id = %collection.id,
        layer_id = %layer.id,
        source = %collection.source,
        by = %claims.sub,
        "collection created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedCollection {
            collection,
            layer,
            feature_count: raw.len(),
        }),
    ))
}

async fn get_collection_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<Json<Collection>> {
    state.require_admin(&headers)?;
    Ok(Json(state.catalog.get_collection(CollectionId::new(id))?))
}

async fn update_collection_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<CollectionPatch>,
) -> ApiResult<Json<Collection>> {
    state.require_admin(&headers)?;

    if let Some(ref source) = patch.source {
        load_source(&state, source).await?;
    }
    Ok(Json(state.catalog.update_collection(CollectionId::new(id), patch)?))
}

async fn delete_collection_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let claims = state.require_admin(&headers)?;

    let id = CollectionId::new(id);
    state.catalog.delete_collection(id)?;

    info!(event = %Event::CollectionDeleted, collection_id = %id, by = %claims.sub, "collection deleted");
    Ok(StatusCode::NO_CONTENT)
}
