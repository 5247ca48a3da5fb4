//! Tile rendering configuration.

use super::defaults::*;
use super::settings::ConfigFile;

/// Parameters shared by every tile request.
///
/// Built once at start-up and shared behind an `Arc`; never mutated
/// afterwards.
///
/// # Example
///
/// ```
/// use occmap::config::TileConfig;
///
/// let config = TileConfig::new().with_tile_size(256).with_buffer_size(16);
/// assert_eq!(config.tile_size(), 256);
/// assert_eq!(config.point_buffer_size(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    /// Extent of tiles served from pre-rendered data
    tile_size: u32,
    /// Buffer around tiles served from pre-rendered data
    buffer_size: u32,
    point_tile_size: u32,
    point_buffer_size: u32,
    hex_tile_size: u32,
    default_hex_per_tile: u32,
    /// Zoom whose WGS84 tiles are probed for capabilities
    capabilities_root_zoom: u8,
}

impl TileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tile view of a loaded config file.
    pub fn from_file(file: &ConfigFile) -> Self {
        Self::new()
            .with_tile_size(file.tiles.tile_size)
            .with_buffer_size(file.tiles.buffer_size)
            .with_default_hex_per_tile(file.hex.default_hex_per_tile)
            .with_capabilities_root_zoom(file.capabilities.root_zoom)
    }

    pub fn with_tile_size(mut self, size: u32) -> Self {
        self.tile_size = size;
        self
    }

    pub fn with_buffer_size(mut self, size: u32) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_default_hex_per_tile(mut self, count: u32) -> Self {
        self.default_hex_per_tile = count;
        self
    }

    pub fn with_capabilities_root_zoom(mut self, zoom: u8) -> Self {
        self.capabilities_root_zoom = zoom;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    /// Extent used when projecting raw points (fixed).
    pub fn point_tile_size(&self) -> u32 {
        self.point_tile_size
    }

    /// Buffer used when projecting raw points (fixed).
    pub fn point_buffer_size(&self) -> u32 {
        self.point_buffer_size
    }

    pub fn hex_tile_size(&self) -> u32 {
        self.hex_tile_size
    }

    pub fn default_hex_per_tile(&self) -> u32 {
        self.default_hex_per_tile
    }

    pub fn capabilities_root_zoom(&self) -> u8 {
        self.capabilities_root_zoom
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            point_tile_size: POINT_TILE_SIZE,
            point_buffer_size: POINT_BUFFER_SIZE,
            hex_tile_size: HEX_TILE_SIZE,
            default_hex_per_tile: DEFAULT_HEX_PER_TILE,
            capabilities_root_zoom: DEFAULT_CAPABILITIES_ROOT_ZOOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TileConfig::default();
        assert_eq!(config.tile_size(), 512);
        assert_eq!(config.buffer_size(), 64);
        assert_eq!(config.point_tile_size(), 4096);
        assert_eq!(config.point_buffer_size(), 1024);
        assert_eq!(config.hex_tile_size(), 4096);
        assert_eq!(config.default_hex_per_tile(), 51);
        assert_eq!(config.capabilities_root_zoom(), 0);
    }

    #[test]
    fn test_from_file_keeps_fixed_sizes() {
        let mut file = ConfigFile::default();
        file.tiles.tile_size = 1024;
        file.hex.default_hex_per_tile = 10;
        file.capabilities.root_zoom = 1;

        let config = TileConfig::from_file(&file);
        assert_eq!(config.tile_size(), 1024);
        assert_eq!(config.default_hex_per_tile(), 10);
        assert_eq!(config.capabilities_root_zoom(), 1);
        assert_eq!(config.point_tile_size(), POINT_TILE_SIZE);
    }
}
