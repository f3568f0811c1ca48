//! Symbol HTTP Routes

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::ApiResult;
use super::state::AppState;
use crate::catalog::{Symbol, SymbolStore};

/// A symbol with its resolved image URL
#[derive(Debug, Serialize)]
pub struct SymbolResponse {
    #[serde(flatten)]
    pub symbol: Symbol,
    pub url: String,
}

impl SymbolResponse {
    fn new(symbol: Symbol, media_url: &str) -> Self {
        let url = symbol.url(media_url);
        Self { symbol, url }
    }
}

pub fn symbol_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/symbols", get(list_symbols_handler).post(create_symbol_handler))
        .with_state(state)
}

async fn list_symbols_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SymbolResponse>>> {
    let media_url = state.catalog.media_url().to_string();
    let symbols = state
        .catalog
        .list_symbols(true)?
        .into_iter()
        .map(|s| SymbolResponse::new(s, &media_url))
        .collect();
    Ok(Json(symbols))
}

async fn create_symbol_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(symbol): Json<Symbol>,
) -> ApiResult<(StatusCode, Json<SymbolResponse>)> {
    state.require_admin(&headers)?;

    let symbol = state.catalog.create_symbol(symbol)?;
    Ok((
        StatusCode::CREATED,
        Json(SymbolResponse::new(symbol, state.catalog.media_url())),
    ))
}
