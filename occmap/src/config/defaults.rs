//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

pub const DEFAULT_STORAGE_URL: &str = "http://localhost:8080";
pub const DEFAULT_STORAGE_TABLE: &str = "maps";
pub const DEFAULT_SALT_MODULUS: u32 = 10;
/// Per-attempt store read timeout in seconds
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Extent of pre-tiled output tiles
pub const DEFAULT_TILE_SIZE: u32 = 512;
/// Buffer around pre-tiled output tiles
pub const DEFAULT_BUFFER_SIZE: u32 = 64;

/// Extent used when projecting raw points
pub const POINT_TILE_SIZE: u32 = 4096;
/// Buffer used when projecting raw points
pub const POINT_BUFFER_SIZE: u32 = 1024;
/// Extent of hex-binned output tiles
pub const HEX_TILE_SIZE: u32 = 4096;

pub const DEFAULT_HEX_PER_TILE: u32 = 51;
pub const DEFAULT_CAPABILITIES_ROOT_ZOOM: u8 = 0;

pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "occmap.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind: DEFAULT_BIND_ADDRESS.to_string(),
            },
            storage: StorageSettings {
                url: DEFAULT_STORAGE_URL.to_string(),
                table: DEFAULT_STORAGE_TABLE.to_string(),
                salt_modulus: DEFAULT_SALT_MODULUS,
                timeout: DEFAULT_STORAGE_TIMEOUT_SECS,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            },
            tiles: TilesSettings {
                tile_size: DEFAULT_TILE_SIZE,
                buffer_size: DEFAULT_BUFFER_SIZE,
            },
            hex: HexSettings {
                default_hex_per_tile: DEFAULT_HEX_PER_TILE,
            },
            capabilities: CapabilitiesSettings {
                root_zoom: DEFAULT_CAPABILITIES_ROOT_ZOOM,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
