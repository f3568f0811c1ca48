//! CLI module
//!
//! Provides command-line interface for:
//! - init: Create the data directory and an empty catalog
//! - serve: Start the HTTP server
//! - import: Register a GeoJSON file as a collection
//! - map-data: Print composed map data
//! - hash-password: Produce an admin password hash

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{import_file, init_data_dir, run, run_command, ImportReport};
pub use errors::{CliError, CliResult};
