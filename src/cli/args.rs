//! CLI argument definitions using clap
//!
//! Commands:
//! - geolayers init --config <path>
//! - geolayers serve --config <path> [--port <port>]
//! - geolayers import --config <path> --file <geojson> --name <name>
//! - geolayers map-data --config <path> [--map-type <type>]
//! - geolayers hash-password --password <password>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geolayers - layered GeoJSON map service
#[derive(Parser, Debug)]
#[command(name = "geolayers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory, source directory and an empty catalog
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./geolayers.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./geolayers.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import a GeoJSON file as a new collection
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./geolayers.json")]
        config: PathBuf,

        /// GeoJSON FeatureCollection to import
        #[arg(long)]
        file: PathBuf,

        /// Collection name
        #[arg(long)]
        name: String,

        /// Layer color as #rrggbb
        #[arg(long)]
        color: Option<String>,

        /// Symbol id
        #[arg(long)]
        symbol: Option<String>,

        /// Map type the collection belongs to
        #[arg(long)]
        map_type: Option<String>,

        /// Import without activating the collection
        #[arg(long)]
        inactive: bool,
    },

    /// Print the composed map data as JSON
    MapData {
        /// Path to configuration file
        #[arg(long, default_value = "./geolayers.json")]
        config: PathBuf,

        #[arg(long)]
        map_type: Option<String>,
    },

    /// Print an Argon2id hash for an admin account
    HashPassword {
        #[arg(long)]
        password: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
