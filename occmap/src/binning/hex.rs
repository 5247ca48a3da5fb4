//! Flat-topped hexagonal binning.
//!
//! Cells live on a grid anchored at the world origin in global pixel
//! space, so a cell straddling two tiles has the same shape and position
//! in both. The cell radius is chosen so that `cells_per_tile` columns
//! span one tile.

use super::{BinOutcome, Binner, BinningError};
use crate::coord::TileAddress;
use crate::tile::{
    decode_tile, encode_tile, geometry, ComposedTile, GeomType, LayerBuilder, PropertyValue,
    ATTR_TOTAL, LAYER_OCCURRENCE,
};
use std::collections::BTreeMap;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial cell coordinate.
type Cell = (i64, i64);

/// Bins point features into flat-topped hexagons.
#[derive(Debug, Clone, Copy)]
pub struct HexBinner {
    /// Extent of the tiles produced
    tile_size: u32,
}

impl HexBinner {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Centre-to-vertex distance of a cell, in output pixels.
    pub fn radius(&self, cells_per_tile: u32) -> f64 {
        self.tile_size as f64 / (1.5 * cells_per_tile as f64)
    }
}

impl Binner for HexBinner {
    fn bin(
        &self,
        tile: &ComposedTile,
        address: &TileAddress,
        cells_per_tile: u32,
    ) -> Result<BinOutcome, BinningError> {
        if cells_per_tile == 0 {
            return Err(BinningError::InvalidCellCount(cells_per_tile));
        }

        let layers = decode_tile(tile.bytes())?;
        let Some(layer) = layers.into_iter().find(|l| l.name == LAYER_OCCURRENCE) else {
            return Ok(BinOutcome::NotBinnable);
        };

        let size = self.tile_size as f64;
        let scale = size / layer.extent.max(1) as f64;
        let radius = self.radius(cells_per_tile);
        let origin = (address.x as f64 * size, address.y as f64 * size);

        let mut counts: BTreeMap<Cell, i64> = BTreeMap::new();
        let mut binned_points = 0usize;

        for feature in &layer.features {
            let total = feature
                .property(ATTR_TOTAL)
                .and_then(PropertyValue::as_i64)
                .unwrap_or(1);
            for (x, y) in feature.points()? {
                let global_x = origin.0 + x as f64 * scale;
                let global_y = origin.1 + y as f64 * scale;
                let cell = counts.entry(cell_at(global_x, global_y, radius)).or_insert(0);
                *cell = cell.saturating_add(total);
                binned_points += 1;
            }
        }

        if binned_points == 0 {
            return Ok(BinOutcome::NotBinnable);
        }

        let mut output = LayerBuilder::new(LAYER_OCCURRENCE, self.tile_size, 0);
        for (cell, total) in counts {
            let ring = cell_ring(cell, radius, origin);
            let total = PropertyValue::Int(total);
            output.add_feature(
                GeomType::Polygon,
                geometry::polygon(&ring),
                [(ATTR_TOTAL, &total)],
            );
        }

        let count = output.len();
        Ok(BinOutcome::Binned(ComposedTile::new(
            encode_tile(output.build()),
            count,
        )))
    }
}

/// Cell containing a global pixel.
fn cell_at(x: f64, y: f64, radius: f64) -> Cell {
    let q = (2.0 / 3.0 * x) / radius;
    let r = (-x / 3.0 + SQRT_3 / 3.0 * y) / radius;
    cube_round(q, r)
}

/// Rounds fractional axial coordinates to the nearest cell.
fn cube_round(q: f64, r: f64) -> Cell {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i64, rr as i64)
}

fn cell_centre((q, r): Cell, radius: f64) -> (f64, f64) {
    let x = radius * 1.5 * q as f64;
    let y = radius * SQRT_3 * (r as f64 + q as f64 / 2.0);
    (x, y)
}

/// Tile-local vertices of a cell, clockwise with y pointing down.
fn cell_ring(cell: Cell, radius: f64, origin: (f64, f64)) -> Vec<(i32, i32)> {
    let (cx, cy) = cell_centre(cell, radius);
    (0..6)
        .map(|i| {
            let angle = (60.0 * i as f64).to_radians();
            (
                (cx + radius * angle.cos() - origin.0).round() as i32,
                (cy + radius * angle.sin() - origin.1).round() as i32,
            )
        })
        .collect()
}
