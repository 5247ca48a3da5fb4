//! Fallback wrapper around a binner.

use super::{BinOutcome, Binner, BinningError};
use crate::coord::TileAddress;
use crate::tile::ComposedTile;
use tracing::debug;

/// Bins `tile`, or hands it back untouched when there is nothing to bin.
///
/// Any failure other than the empty case is returned to the caller.
pub fn bin_or_passthrough<B: Binner + ?Sized>(
    binner: &B,
    tile: ComposedTile,
    address: &TileAddress,
    cells_per_tile: u32,
) -> Result<ComposedTile, BinningError> {
    match binner.bin(&tile, address, cells_per_tile)? {
        BinOutcome::Binned(binned) => {
            debug!(
                %address,
                points = tile.feature_count(),
                cells = binned.feature_count(),
                "Binned tile"
            );
            Ok(binned)
        }
        BinOutcome::NotBinnable => {
            debug!(%address, "Nothing to bin, returning tile unchanged");
            Ok(tile)
        }
    }
}
