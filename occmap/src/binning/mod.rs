//! Aggregation of point tiles into hexagonal count cells.
//!
//! A [`Binner`] replaces the point features of a composed tile with
//! polygons carrying summed `total` counts. [`bin_or_passthrough`] is the
//! adapter used by the service: a tile with nothing to bin is returned
//! unchanged rather than treated as an error.

mod adapter;
mod hex;

pub use adapter::bin_or_passthrough;
pub use hex::HexBinner;

use crate::coord::TileAddress;
use crate::tile::{ComposedTile, TileError};
use thiserror::Error;

/// Result of a binning attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BinOutcome {
    /// Tile rewritten as cells
    Binned(ComposedTile),
    /// Input holds no point features to aggregate
    NotBinnable,
}

/// Errors raised by a binner.
#[derive(Debug, Error)]
pub enum BinningError {
    #[error("Cannot bin unreadable tile: {0}")]
    Decode(#[from] TileError),

    #[error("Hex cells per tile must be positive, got {0}")]
    InvalidCellCount(u32),
}

/// Aggregates the features of a composed tile into cells.
pub trait Binner: Send + Sync {
    fn bin(
        &self,
        tile: &ComposedTile,
        address: &TileAddress,
        cells_per_tile: u32,
    ) -> Result<BinOutcome, BinningError>;
}
