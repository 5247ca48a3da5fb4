//! Tile addressing and projection.
//!
//! Provides the spatial references and tiling schemes the server answers in,
//! validated [`TileAddress`]es, and projections from latitude/longitude to
//! tile-local pixel coordinates.

mod projection;
mod types;

pub use projection::{
    projection_for, to_tile_local, PixelXY, PlateCarree, TileProjection, WebMercator,
};
pub use types::{
    CoordError, GeoBounds, Srs, TileAddress, TileSchema, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};
