//! Map data HTTP route
//!
//! Public and read-only. The response is always 200: failures come back as
//! an empty payload with an `error` field.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use super::state::AppState;
use crate::engine::MapData;
use crate::observability::Event;

#[derive(Debug, Default, Deserialize)]
pub struct MapDataQuery {
    #[serde(default)]
    pub map_type: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
}

impl MapDataQuery {
    fn map_type(&self) -> Option<&str> {
        self.map_type.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    fn wants_debug(&self) -> bool {
        match self.debug.as_deref() {
            None => false,
            Some(flag) => !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"),
        }
    }
}

pub fn map_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/map-data", get(map_data_handler))
        .with_state(state)
}

async fn map_data_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapDataQuery>,
) -> Json<MapData> {
    let aggregator = state.aggregator.clone();
    let map_type = query.map_type().map(str::to_string);

    // Source reads are blocking file I/O
    let data = match tokio::task::spawn_blocking(move || aggregator.compose(map_type.as_deref())).await
    {
        Ok(data) => data,
        Err(join_error) => {
            error!(event = %Event::AggregationFailed, error = %join_error, "map data task failed");
            MapData::failed(
                format!("Map data aggregation failed: {}", join_error),
                Some(format!("{:?}", join_error)),
            )
        }
    };

    Json(data.redact_debug(state.expose_error_details && query.wants_debug()))
}
