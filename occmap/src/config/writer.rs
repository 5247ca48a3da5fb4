//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[server]
; Address the HTTP server listens on (default: 0.0.0.0:8080)
bind = {}

[storage]
; Base URL of the REST cell API fronting the density table
url = {}
; Table holding point sets and pre-rendered tiles (default: maps)
table = {}
; Number of salt buckets used when the table was written (default: 10)
salt_modulus = {}
; Timeout in seconds for a single store read (default: 10)
timeout = {}
; Retries after a store read fails or times out (default: 3)
max_retries = {}
; Base backoff between retries in milliseconds, doubled each retry (default: 100)
retry_backoff_ms = {}

[tiles]
; Extent and buffer of tiles served from pre-rendered data (defaults: 512, 64)
tile_size = {}
buffer_size = {}

[hex]
; Hexagons across one tile when hexPerTile is not given (default: 51)
default_hex_per_tile = {}

[capabilities]
; Zoom level whose EPSG:4326 tiles are probed for extents, 0-2 (default: 0)
root_zoom = {}

[logging]
; Directory and file name of the server log
directory = {}
file = {}
"#,
        config.server.bind,
        config.storage.url,
        config.storage.table,
        config.storage.salt_modulus,
        config.storage.timeout,
        config.storage.max_retries,
        config.storage.retry_backoff_ms,
        config.tiles.tile_size,
        config.tiles.buffer_size,
        config.hex.default_hex_per_tile,
        config.capabilities.root_zoom,
        config.logging.directory.to_string_lossy(),
        config.logging.file,
    )
}
