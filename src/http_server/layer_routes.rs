//! Map Layer HTTP Routes
//!
//! Admin endpoints for layer visibility and per-feature toggles. The
//! `select-all-layers` / `deselect-all-layers` paths are kept alongside the
//! nested `map-layers/select_all` forms for existing clients.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::errors::ApiResult;
use super::state::AppState;
use crate::catalog::{CollectionStore, Layer, LayerId, LayerPatch};
use crate::engine::{ToggleAck, ToggleRequest};
use crate::observability::Event;

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub updated: usize,
}

pub fn layer_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/map-layers", get(list_layers_handler))
        .route("/map-layers/select_all", post(select_all_handler))
        .route("/map-layers/deselect_all", post(deselect_all_handler))
        .route("/select-all-layers", post(select_all_handler))
        .route("/deselect-all-layers", post(deselect_all_handler))
        .route(
            "/map-layers/:id",
            get(get_layer_handler).patch(update_layer_handler),
        )
        .route("/map-layers/:id/toggle_feature", post(toggle_feature_handler))
        .with_state(state)
}

async fn list_layers_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Layer>>> {
    state.require_admin(&headers)?;
    Ok(Json(state.catalog.list_layers()?))
}

async fn get_layer_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<Json<Layer>> {
    state.require_admin(&headers)?;
    Ok(Json(state.catalog.get_layer(LayerId::new(id))?))
}

async fn update_layer_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<LayerPatch>,
) -> ApiResult<Json<Layer>> {
    state.require_admin(&headers)?;
    Ok(Json(state.catalog.update_layer(LayerId::new(id), patch)?))
}

async fn toggle_feature_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<Json<ToggleAck>> {
    state.require_admin(&headers)?;
    Ok(Json(state.toggles.handle(LayerId::new(id), request)?))
}

async fn select_all_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<BulkResponse>> {
    set_all(&state, &headers, true, "Selected all layers")
}

async fn deselect_all_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<BulkResponse>> {
    set_all(&state, &headers, false, "Deselected all layers")
}

fn set_all(
    state: &AppState,
    headers: &HeaderMap,
    visible: bool,
    message: &'static str,
) -> ApiResult<Json<BulkResponse>> {
    let claims = state.require_admin(headers)?;
    let updated = state.catalog.set_all_layers_visible(visible)?;

    info!(event = %Event::LayersBulkUpdated, is_visible = visible, updated, by = %claims.sub, "layer visibility set");
    Ok(Json(BulkResponse {
        status: "success",
        message,
        updated,
    }))
}
