//! Configuration for the tile server.
//!
//! User settings live in an INI file (`~/.occmap/config.ini` by default).
//! [`ConfigFile`] is the parsed file; [`TileConfig`] and [`StorageConfig`]
//! are the immutable views handed to the components that need them.
//!
//! # Example
//!
//! ```
//! use occmap::config::{ConfigFile, TileConfig};
//!
//! let file = ConfigFile::default();
//! let tiles = TileConfig::from_file(&file);
//! assert_eq!(tiles.tile_size(), 512);
//! assert_eq!(tiles.point_tile_size(), 4096);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod storage;
mod tiles;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CapabilitiesSettings, ConfigFile, HexSettings, LoggingSettings, ServerSettings,
    StorageSettings, TilesSettings,
};
pub use storage::StorageConfig;
pub use tiles::TileConfig;
