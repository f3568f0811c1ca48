//! Observability
//!
//! Structured logging through `tracing`, with typed event names.
//!
//! # Usage
//!
//! ```ignore
//! use geolayers::observability::Event;
//!
//! tracing::warn!(event = %Event::LayerSkipped, layer_id = 3, "source missing");
//! ```

mod events;
mod logging;

pub use events::Event;
pub use logging::{init_logging, LogConfig, LogFormat};
