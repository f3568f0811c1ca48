//! geolayers - layered GeoJSON map service
//!
//! Stores GeoJSON feature collections as map layers, lets admins hide
//! individual features, and composes everything visible into one payload
//! for a map client.

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod http_server;
pub mod observability;
pub mod source;
