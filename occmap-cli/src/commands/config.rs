//! Configuration management CLI commands.

use clap::Subcommand;
use occmap::config::{config_file_path, ConfigFile};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,
}

/// Run a config subcommand.
///
/// `config_path` is the global `--config` override, if any.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(&path),
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }
    ConfigFile::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    println!("# {}", path.display());
    println!("[server]");
    println!("bind = {}", config.server.bind);
    println!("[storage]");
    println!("url = {}", config.storage.url);
    println!("table = {}", config.storage.table);
    println!("salt_modulus = {}", config.storage.salt_modulus);
    println!("timeout = {}", config.storage.timeout);
    println!("max_retries = {}", config.storage.max_retries);
    println!("retry_backoff_ms = {}", config.storage.retry_backoff_ms);
    println!("[tiles]");
    println!("tile_size = {}", config.tiles.tile_size);
    println!("buffer_size = {}", config.tiles.buffer_size);
    println!("[hex]");
    println!("default_hex_per_tile = {}", config.hex.default_hex_per_tile);
    println!("[capabilities]");
    println!("root_zoom = {}", config.capabilities.root_zoom);
    println!("[logging]");
    println!("directory = {}", config.logging.directory.display());
    println!("file = {}", config.logging.file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        run_init(&path, false).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[server]\nbind = 127.0.0.1:9000\n").unwrap();

        run_init(&path, false).unwrap();
        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");

        run_init(&path, true).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }
}
