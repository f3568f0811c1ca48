//! Shared handler state

use std::sync::Arc;

use axum::http::HeaderMap;

use super::errors::ApiResult;
use crate::auth::{AdminClaims, AuthGuard};
use crate::catalog::InMemoryCatalog;
use crate::engine::{Aggregator, ToggleHandler};
use crate::source::SourceBackend;

/// Everything the routers need, shared behind one `Arc`
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub sources: Arc<dyn SourceBackend>,
    pub aggregator: Aggregator,
    pub toggles: ToggleHandler,
    pub auth: AuthGuard,
    /// Whether `?debug` may attach failure details to map data
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        catalog: Arc<InMemoryCatalog>,
        sources: Arc<dyn SourceBackend>,
        auth: AuthGuard,
    ) -> Self {
        Self {
            aggregator: Aggregator::from_catalog(catalog.clone(), sources.clone()),
            toggles: ToggleHandler::from_catalog(catalog.clone()),
            catalog,
            sources,
            auth,
            expose_error_details: false,
        }
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Reject the request unless it carries a valid admin token
    pub fn require_admin(&self, headers: &HeaderMap) -> ApiResult<AdminClaims> {
        Ok(self.auth.authorize(headers)?)
    }
}
