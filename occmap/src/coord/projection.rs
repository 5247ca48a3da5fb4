//! Geographic to pixel projections.
//!
//! A projection maps latitude/longitude to *global* pixel space at a zoom
//! level for a given tile pixel size. [`to_tile_local`] then moves a global
//! pixel into the local space of one tile, honouring a buffer around it.

use super::types::{GeoBounds, Srs, TileAddress, TileSchema, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use std::f64::consts::PI;

/// A position in global pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelXY {
    pub x: f64,
    pub y: f64,
}

/// Maps geographic coordinates into pixel space for one spatial reference.
pub trait TileProjection: Send + Sync {
    /// Spatial reference this projection implements.
    fn srs(&self) -> Srs;

    /// Pixel width (and height) of one tile.
    fn tile_size(&self) -> u32;

    /// Whether the location can be drawn at all under this projection.
    fn is_plottable(&self, lat: f64, lng: f64) -> bool;

    /// Projects a location to global pixel space at `zoom`.
    fn to_global_pixel(&self, lat: f64, lng: f64, zoom: u8) -> PixelXY;

    /// Pixel width of the whole world at `zoom`.
    fn world_width(&self, zoom: u8) -> f64 {
        self.srs().schema().tiles_wide(zoom) as f64 * self.tile_size() as f64
    }
}

/// Spherical Web Mercator (`EPSG:3857`).
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    tile_size: u32,
}

impl WebMercator {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }
}

impl TileProjection for WebMercator {
    fn srs(&self) -> Srs {
        Srs::WebMercator
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn is_plottable(&self, lat: f64, lng: f64) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&lat) && (MIN_LON..=MAX_LON).contains(&lng)
    }

    fn to_global_pixel(&self, lat: f64, lng: f64, zoom: u8) -> PixelXY {
        let world = self.world_width(zoom);
        let lat_rad = lat * PI / 180.0;
        PixelXY {
            x: (lng - MIN_LON) / (MAX_LON - MIN_LON) * world,
            y: (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * world,
        }
    }
}

/// WGS84 plate carrée (`EPSG:4326`), twice as wide as it is high.
#[derive(Debug, Clone, Copy)]
pub struct PlateCarree {
    tile_size: u32,
}

impl PlateCarree {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Geographic bounds covered by a tile of the plate carrée scheme.
    pub fn tile_bounds(zoom: u8, x: u32, y: u32) -> GeoBounds {
        let schema = TileSchema::Wgs84PlateCarree;
        let lng_step = (MAX_LON - MIN_LON) / schema.tiles_wide(zoom) as f64;
        let lat_step = 180.0 / schema.tiles_high(zoom) as f64;
        GeoBounds {
            west: MIN_LON + x as f64 * lng_step,
            north: 90.0 - y as f64 * lat_step,
            east: MIN_LON + (x + 1) as f64 * lng_step,
            south: 90.0 - (y + 1) as f64 * lat_step,
        }
    }
}

impl TileProjection for PlateCarree {
    fn srs(&self) -> Srs {
        Srs::Wgs84
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn is_plottable(&self, lat: f64, lng: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (MIN_LON..=MAX_LON).contains(&lng)
    }

    fn to_global_pixel(&self, lat: f64, lng: f64, zoom: u8) -> PixelXY {
        let world = self.world_width(zoom);
        PixelXY {
            x: (lng - MIN_LON) / (MAX_LON - MIN_LON) * world,
            y: (90.0 - lat) / 180.0 * (world / 2.0),
        }
    }
}

/// Resolves the projection for a spatial reference at a tile pixel size.
pub fn projection_for(srs: Srs, tile_size: u32) -> Box<dyn TileProjection> {
    match srs {
        Srs::WebMercator => Box::new(WebMercator::new(tile_size)),
        Srs::Wgs84 => Box::new(PlateCarree::new(tile_size)),
    }
}

/// Moves a global pixel into the local pixel space of `address`.
///
/// Returns `None` when the pixel lies outside the tile extent plus `buffer`.
/// Pixels across the antimeridian are wrapped by one world width when that
/// brings them into the buffered tile.
pub fn to_tile_local(
    global: PixelXY,
    address: &TileAddress,
    tile_size: u32,
    buffer: u32,
    world_width: f64,
) -> Option<(i32, i32)> {
    let size = tile_size as f64;
    let min = -(buffer as f64);
    let max = size + buffer as f64;

    let local_y = global.y - address.y as f64 * size;
    if local_y < min || local_y >= max {
        return None;
    }

    let local_x = global.x - address.x as f64 * size;
    [local_x, local_x + world_width, local_x - world_width]
        .into_iter()
        .find(|x| *x >= min && *x < max)
        .map(|x| (x.round() as i32, local_y.round() as i32))
}
