//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom levels
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Spatial reference a tile is requested in.
///
/// Each spatial reference pairs a projection with a tiling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Srs {
    /// Spherical Web Mercator (`EPSG:3857`), one tile at zoom 0
    #[default]
    WebMercator,
    /// WGS84 plate carrée (`EPSG:4326`), two tiles at zoom 0
    Wgs84,
}

impl Srs {
    /// The EPSG code, e.g. `EPSG:3857`.
    pub fn code(&self) -> &'static str {
        match self {
            Srs::WebMercator => "EPSG:3857",
            Srs::Wgs84 => "EPSG:4326",
        }
    }

    /// Tiling scheme used with this spatial reference.
    pub fn schema(&self) -> TileSchema {
        match self {
            Srs::WebMercator => TileSchema::WebMercator,
            Srs::Wgs84 => TileSchema::Wgs84PlateCarree,
        }
    }

    /// Column family holding pre-tiled data for this reference (`EPSG_3857`).
    pub fn storage_family(&self) -> String {
        self.code().replace(':', "_")
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Srs {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EPSG:3857" => Ok(Srs::WebMercator),
            "EPSG:4326" => Ok(Srs::Wgs84),
            _ => Err(CoordError::UnsupportedSrs(s.to_string())),
        }
    }
}

/// Layout of the tile grid at each zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSchema {
    /// 2^z × 2^z tiles
    WebMercator,
    /// 2^(z+1) × 2^z tiles, split at the antimeridian
    Wgs84PlateCarree,
}

impl TileSchema {
    /// Number of tile columns at the zoom level.
    #[inline]
    pub fn tiles_wide(&self, zoom: u8) -> u32 {
        match self {
            TileSchema::WebMercator => 1 << zoom,
            TileSchema::Wgs84PlateCarree => 2 << zoom,
        }
    }

    /// Number of tile rows at the zoom level.
    #[inline]
    pub fn tiles_high(&self, zoom: u8) -> u32 {
        1 << zoom
    }

    /// Checks whether `x`/`y` address a tile at `zoom`.
    pub fn contains(&self, zoom: u8, x: u32, y: u32) -> bool {
        zoom <= MAX_ZOOM && x < self.tiles_wide(zoom) && y < self.tiles_high(zoom)
    }
}

/// Address of a single tile in a spatial reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Zoom level (0-22)
    pub zoom: u8,
    /// Column, 0 at the western edge
    pub x: u32,
    /// Row, 0 at the northern edge
    pub y: u32,
    /// Spatial reference
    pub srs: Srs,
}

impl TileAddress {
    /// Creates an address, validating it against the tiling scheme of `srs`.
    pub fn new(zoom: u8, x: u32, y: u32, srs: Srs) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        if !srs.schema().contains(zoom, x, y) {
            return Err(CoordError::OutOfRange { zoom, x, y, srs });
        }
        Ok(Self { zoom, x, y, srs })
    }

    /// Storage qualifier for the pre-tiled cell, e.g. `3:4:2`.
    pub fn qualifier(&self) -> String {
        format!("{}:{}:{}", self.zoom, self.x, self.y)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{} ({})", self.zoom, self.x, self.y, self.srs)
    }
}

/// Geographic bounds of a tile in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

/// Errors that can occur while building or projecting tile addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// Zoom level is outside valid range (0 to 22)
    InvalidZoom(u8),
    /// Column or row does not exist at the zoom level
    OutOfRange { zoom: u8, x: u32, y: u32, srs: Srs },
    /// Spatial reference is not one of the supported codes
    UnsupportedSrs(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutOfRange { zoom, x, y, srs } => {
                write!(
                    f,
                    "Tile {}/{}/{} does not exist in {} (zoom {} has {}x{} tiles)",
                    zoom,
                    x,
                    y,
                    srs,
                    zoom,
                    srs.schema().tiles_wide(*zoom),
                    srs.schema().tiles_high(*zoom)
                )
            }
            CoordError::UnsupportedSrs(srs) => {
                write!(
                    f,
                    "Unsupported spatial reference '{}' (expected EPSG:3857 or EPSG:4326)",
                    srs
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
