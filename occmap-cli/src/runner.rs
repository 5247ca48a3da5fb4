//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and service creation
//! so each command handler only does its own work.

use crate::error::CliError;
use occmap::config::{ConfigFile, StorageConfig, TileConfig};
use occmap::logging::{init_logging, LoggingGuard};
use occmap::service::TileService;
use occmap::storage::{self, RemoteGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// `config_path` overrides `~/.occmap/config.ini`. Commands that print
    /// machine-readable output to stdout pass `stdout_logging = false`.
    pub fn new(config_path: Option<&Path>, stdout_logging: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            stdout_logging,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("occmap v{}", occmap::VERSION);
        info!("occmap CLI: {} command", command);
        info!(
            url = %self.config.storage.url,
            table = %self.config.storage.table,
            "Storage"
        );
    }

    /// Connect to the configured store and build the tile service.
    pub fn create_service(&self) -> Result<Arc<TileService<RemoteGateway>>, CliError> {
        let gateway = storage::connect(&StorageConfig::from_file(&self.config))?;
        let tiles = Arc::new(TileConfig::from_file(&self.config));
        info!("Service created successfully");
        Ok(Arc::new(TileService::new(gateway, tiles)))
    }

    /// Write an output file.
    pub fn save(&self, path: &Path, data: &[u8]) -> Result<(), CliError> {
        std::fs::write(path, data).map_err(|error| CliError::FileWrite {
            path: PathBuf::from(path),
            error,
        })?;
        info!(path = %path.display(), bytes = data.len(), "Saved");
        Ok(())
    }
}
