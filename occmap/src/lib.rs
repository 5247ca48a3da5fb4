//! occmap - occurrence density vector tiles
//!
//! Serves map tiles of occurrence records, composed at query time from a
//! key-value store that holds each dataset either as raw points or as
//! pre-rendered tiles.
//!
//! # High-Level API
//!
//! ```ignore
//! use occmap::config::{ConfigFile, StorageConfig, TileConfig};
//! use occmap::service::TileService;
//! use std::sync::Arc;
//!
//! let file = ConfigFile::load()?;
//! let gateway = occmap::storage::connect(&StorageConfig::from_file(&file))?;
//! let service = Arc::new(TileService::new(gateway, Arc::new(TileConfig::from_file(&file))));
//! let app = occmap::server::router(service);
//! ```

pub mod binning;
pub mod capabilities;
pub mod config;
pub mod coord;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod storage;
pub mod tile;

/// Version of the occmap library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
