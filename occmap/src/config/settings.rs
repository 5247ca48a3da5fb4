//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub tiles: TilesSettings,
    pub hex: HexSettings,
    pub capabilities: CapabilitiesSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Socket address to listen on, e.g. "0.0.0.0:8080"
    pub bind: String,
}

/// Backing store settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    /// Base URL of the REST cell API
    pub url: String,
    /// Table holding density data
    pub table: String,
    /// Number of row-key salt buckets
    pub salt_modulus: u32,
    /// Per-attempt timeout in seconds
    pub timeout: u64,
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Base backoff between retries in milliseconds
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    pub tile_size: u32,
    pub buffer_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexSettings {
    pub default_hex_per_tile: u32,
}

/// Capability probe settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitiesSettings {
    /// Zoom level whose WGS84 tiles are probed
    pub root_zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
