//! Global extent and year span of a dataset.
//!
//! The summary is computed by composing the tiles of a [`ProbeTable`]
//! through the ordinary tile pipeline and scanning what comes back, so it
//! only ever reports data a client could actually fetch.

use crate::coord::{GeoBounds, PlateCarree, Srs, TileAddress, TileSchema};
use crate::tile::{decode_tile, ComposedTile, PropertyValue, TileError, ATTR_YEAR, LAYER_OCCURRENCE};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// Extent and year span found across all probe tiles.
///
/// Every field is `None` when no data was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

/// One tile to probe and the geographic area it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeTile {
    pub address: TileAddress,
    pub bounds: GeoBounds,
}

/// The tiles probed to build a capabilities summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTable {
    tiles: Vec<ProbeTile>,
}

/// Deepest probe zoom; zoom 2 already means 32 store reads per request.
pub const MAX_PROBE_ZOOM: u8 = 2;

impl ProbeTable {
    /// Every EPSG:4326 tile at `root_zoom`, west to east then north to south.
    ///
    /// At zoom 0 these are the western and eastern hemispheres, split at
    /// the antimeridian. `root_zoom` is clamped to [`MAX_PROBE_ZOOM`].
    pub fn world(root_zoom: u8) -> Self {
        let root_zoom = root_zoom.min(MAX_PROBE_ZOOM);
        let schema = TileSchema::Wgs84PlateCarree;
        let mut tiles = Vec::new();
        for y in 0..schema.tiles_high(root_zoom) {
            for x in 0..schema.tiles_wide(root_zoom) {
                if let Ok(address) = TileAddress::new(root_zoom, x, y, Srs::Wgs84) {
                    tiles.push(ProbeTile {
                        address,
                        bounds: PlateCarree::tile_bounds(root_zoom, x, y),
                    });
                }
            }
        }
        Self { tiles }
    }

    pub fn tiles(&self) -> &[ProbeTile] {
        &self.tiles
    }
}

/// Accumulates extremes over composed probe tiles.
#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    summary: Capabilities,
}

impl CapabilitiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the point features of a composed tile covering `bounds`.
    ///
    /// Each probe owns the half-open pixel square `[0, extent)`, so edge
    /// pixels shared with a neighbour and pixels in the buffer are counted
    /// by exactly one probe. The eastern world edge arrives wrapped to pixel
    /// 0 of the western probe; the southern world edge has no neighbour and
    /// is kept.
    pub fn collect(&mut self, tile: &ComposedTile, bounds: &GeoBounds) -> Result<(), TileError> {
        for layer in decode_tile(tile.bytes())? {
            if layer.name != LAYER_OCCURRENCE {
                continue;
            }
            let extent = layer.extent.max(1) as f64;
            let world_south = bounds.south <= -90.0;
            let owns = |px: f64, py: f64| {
                (0.0..extent).contains(&px)
                    && (py >= 0.0 && (py < extent || (world_south && py == extent)))
            };

            for feature in &layer.features {
                let mut inside = false;
                for (x, y) in feature.points()? {
                    let (px, py) = (x as f64, y as f64);
                    if !owns(px, py) {
                        continue;
                    }
                    inside = true;
                    let lng = bounds.west + px / extent * (bounds.east - bounds.west);
                    let lat = bounds.north - py / extent * (bounds.north - bounds.south);
                    self.add_location(lng, lat);
                }

                if inside {
                    let year = feature
                        .property(ATTR_YEAR)
                        .and_then(PropertyValue::as_i64)
                        .and_then(|y| i32::try_from(y).ok());
                    if let Some(year) = year {
                        self.add_year(year);
                    }
                }
            }
        }
        Ok(())
    }

    fn add_location(&mut self, lng: f64, lat: f64) {
        let s = &mut self.summary;
        s.min_lng = Some(s.min_lng.map_or(lng, |v| v.min(lng)));
        s.max_lng = Some(s.max_lng.map_or(lng, |v| v.max(lng)));
        s.min_lat = Some(s.min_lat.map_or(lat, |v| v.min(lat)));
        s.max_lat = Some(s.max_lat.map_or(lat, |v| v.max(lat)));
    }

    fn add_year(&mut self, year: i32) {
        let s = &mut self.summary;
        s.min_year = Some(s.min_year.map_or(year, |v| v.min(year)));
        s.max_year = Some(s.max_year.map_or(year, |v| v.max(year)));
    }

    pub fn build(self) -> Capabilities {
        self.summary
    }
}

/// Runs a probe table through a tile source.
#[derive(Debug, Clone)]
pub struct CapabilityProbe {
    table: ProbeTable,
}

impl CapabilityProbe {
    pub fn new(table: ProbeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ProbeTable {
        &self.table
    }

    /// Composes every probe tile with `compose` and summarizes the result.
    ///
    /// `compose` must produce verbose, unfiltered tiles for the address it
    /// is given. The first failure aborts the probe.
    pub async fn run<F, Fut, E>(&self, compose: F) -> Result<Capabilities, E>
    where
        F: Fn(TileAddress) -> Fut,
        Fut: Future<Output = Result<ComposedTile, E>>,
        E: From<TileError>,
    {
        let mut builder = CapabilitiesBuilder::new();
        for probe in self.table.tiles() {
            let tile = compose(probe.address).await?;
            debug!(address = %probe.address, features = tile.feature_count(), "Probed tile");
            builder.collect(&tile, &probe.bounds)?;
        }
        Ok(builder.build())
    }
}
