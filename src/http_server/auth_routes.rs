//! Auth HTTP Routes
//!
//! Login for configured admin accounts. There is no signup; accounts live
//! in the service configuration.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::{LoginRequest, TokenResponse};

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub username: String,
    pub is_staff: bool,
    pub expires_at: i64,
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .with_state(state)
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    // Argon2 verification is CPU-heavy
    let auth = state.auth.clone();
    let token = tokio::task::spawn_blocking(move || auth.login(&request))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))??;
    Ok(Json(token))
}

async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<WhoAmIResponse>> {
    let claims = state.require_admin(&headers)?;
    Ok(Json(WhoAmIResponse {
        username: claims.sub,
        is_staff: claims.is_staff,
        expires_at: claims.exp,
    }))
}
