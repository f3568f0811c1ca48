//! # HTTP Server Module
//!
//! axum routers for the map service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/map-data` - Composed map data (public)
//! - `/api/symbols` - Symbol listing (public), registration (admin)
//! - `/api/geojson-files/*` - Collection management (admin)
//! - `/api/map-layers/*` - Layer visibility and feature toggles (admin)
//! - `/auth/*` - Admin login

pub mod auth_routes;
pub mod collection_routes;
pub mod config;
pub mod errors;
pub mod layer_routes;
pub mod map_routes;
pub mod observability_routes;
pub mod server;
pub mod state;
pub mod symbol_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
pub use state::AppState;
