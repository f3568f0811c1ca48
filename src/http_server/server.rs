//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::auth_routes::auth_routes;
use super::collection_routes::collection_routes;
use super::config::HttpServerConfig;
use super::layer_routes::layer_routes;
use super::map_routes::map_routes;
use super::observability_routes::health_routes;
use super::state::AppState;
use super::symbol_routes::symbol_routes;
use crate::observability::Event;

/// HTTP server for the map service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over shared state
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        Router::new()
            .merge(health_routes())
            .nest("/auth", auth_routes(state.clone()))
            .nest(
                "/api",
                map_routes(state.clone())
                    .merge(collection_routes(state.clone()))
                    .merge(layer_routes(state.clone()))
                    .merge(symbol_routes(state)),
            )
            .layer(TraceLayer::new_for_http())
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.bind_addr()?;

        let listener = TcpListener::bind(addr).await?;
        info!(event = %Event::ServerListening, %addr, "map service listening");

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthGuard;
    use crate::catalog::InMemoryCatalog;
    use crate::source::MemoryBackend;

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(MemoryBackend::new()),
            AuthGuard::with_secret(Vec::new(), "server-test"),
        )
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".into()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, state()).router();
    }
}
