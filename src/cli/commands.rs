//! CLI command implementations
//!
//! Every command except `hash-password` starts by loading the JSON config.
//! `init` must run before anything that opens the catalog.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::hash_password;
use crate::catalog::{Collection, CollectionStore, InMemoryCatalog, Layer, NewCollection};
use crate::config::Config;
use crate::engine::Aggregator;
use crate::http_server::{AppState, HttpServer};
use crate::observability::{init_logging, Event};
use crate::source::{LocalBackend, RawFeatureCollection, SourceBackend};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Import {
            config,
            file,
            name,
            color,
            symbol,
            map_type,
            inactive,
        } => {
            let mut new = NewCollection::new(name, String::new());
            new.color = color;
            new.symbol = symbol;
            new.map_type = map_type;
            if inactive {
                new = new.inactive();
            }
            import(&config, &file, new)
        }
        Command::MapData { config, map_type } => map_data(&config, map_type.as_deref()),
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

/// Create the data directory layout and an empty catalog
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_data_dir(&config)?;
    write_json(&json!({"initialized": true, "data_dir": config.data_dir}))
}

/// Start the HTTP server
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    init_logging(&config.log).map_err(CliError::BootFailed)?;
    info!(event = %Event::BootStart, config = %config_path.display(), "starting map service");

    if let Some(port) = port {
        config.http.port = port;
    }
    info!(event = %Event::ConfigLoaded, data_dir = %config.data_dir, port = config.http.port, "configuration loaded");

    let catalog = open_catalog(&config)?;
    if config.auth.admins.is_empty() {
        warn!("no admin accounts configured; every write endpoint will reject requests");
    }

    let state = AppState::new(catalog, sources(&config), config.auth.guard())
        .with_error_details(config.http.expose_error_details);
    let server = HttpServer::new(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::BootFailed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::BootFailed(format!("HTTP server failed: {}", e)))
    })
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub collection: Collection,
    pub layer: Layer,
    pub feature_count: usize,
}

/// Copy a GeoJSON file into the source directory and register it.
///
/// Refused while `serve` owns the catalog; use `POST /api/geojson-files`
/// against the running server instead.
pub fn import(config_path: &Path, file: &Path, new: NewCollection) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let catalog = open_catalog(&config)?;
    let report = import_file(catalog.as_ref(), sources(&config).as_ref(), file, new)?;
    write_json(&report)
}

/// Print the composed map data
pub fn map_data(config_path: &Path, map_type: Option<&str>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let catalog = view_catalog(&config)?;
    let aggregator = Aggregator::from_catalog(catalog, sources(&config));
    write_json(&aggregator.compose(map_type))
}

/// Create `data_dir`, the source directory and an empty catalog snapshot
pub fn init_data_dir(config: &Config) -> CliResult<()> {
    if is_initialized(config) {
        return Err(CliError::AlreadyInitialized(config.data_path().to_path_buf()));
    }

    fs::create_dir_all(config.source_path())?;
    if config.persist {
        InMemoryCatalog::open(config.catalog_path())?.flush()?;
    }
    Ok(())
}

/// Validate, copy and register one GeoJSON file.
///
/// The stored name is the file's own name, suffixed when already taken.
pub fn import_file(
    catalog: &dyn CollectionStore,
    backend: &dyn SourceBackend,
    file: &Path,
    mut new: NewCollection,
) -> CliResult<ImportReport> {
    let bytes = fs::read(file)?;
    let raw = RawFeatureCollection::parse(&bytes)?;

    let file_name = match file.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => {
            let reason = format!("not a file path: {}", file.display());
            return Err(io::Error::new(io::ErrorKind::InvalidInput, reason).into());
        }
    };
    new.source = unique_source_name(backend, file_name)?;

    // Nothing is copied for a collection the catalog would refuse
    new.validate()?;
    backend.write(&new.source, &bytes)?;
    let (collection, layer) = catalog.create_collection(new)?;

    info!(
        event = %Event::CollectionCreated,
        collection_id = %collection.id,
        layer_id = %layer.id,
        source = %collection.source,
        features = raw.len(),
        "collection imported"
    );
    Ok(ImportReport {
        collection,
        layer,
        feature_count: raw.len(),
    })
}

fn unique_source_name(backend: &dyn SourceBackend, file_name: &str) -> CliResult<String> {
    if !backend.exists(file_name)? {
        return Ok(file_name.to_string());
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };
    let mut n = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        if !backend.exists(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}

fn is_initialized(config: &Config) -> bool {
    if config.persist {
        config.catalog_path().exists()
    } else {
        config.source_path().is_dir()
    }
}

fn open_catalog(config: &Config) -> CliResult<Arc<InMemoryCatalog>> {
    if !is_initialized(config) {
        return Err(CliError::NotInitialized(config.data_path().to_path_buf()));
    }

    let catalog = if config.persist {
        InMemoryCatalog::open(config.catalog_path())?
    } else {
        InMemoryCatalog::new()
    };
    info!(event = %Event::CatalogOpened, persist = config.persist, "catalog opened");
    Ok(Arc::new(catalog.with_media_url(config.media_url.clone())))
}

/// Snapshot view for read-only commands; works while `serve` owns the catalog
fn view_catalog(config: &Config) -> CliResult<Arc<InMemoryCatalog>> {
    if !is_initialized(config) {
        return Err(CliError::NotInitialized(config.data_path().to_path_buf()));
    }

    let catalog = if config.persist {
        InMemoryCatalog::read_only(config.catalog_path())?
    } else {
        InMemoryCatalog::new()
    };
    Ok(Arc::new(catalog.with_media_url(config.media_url.clone())))
}

fn sources(config: &Config) -> Arc<dyn SourceBackend> {
    Arc::new(LocalBackend::new(config.source_path()))
}

fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
