//! Composition errors.

use crate::coord::TileAddress;
use crate::tile::TileError;
use thiserror::Error;

/// Errors raised while composing a tile.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Stored pre-tiled payload could not be decoded
    #[error("Stored tile {address} is corrupt: {source}")]
    CorruptTile {
        address: TileAddress,
        #[source]
        source: TileError,
    },

    /// Request was abandoned before composition finished
    #[error("Composition cancelled")]
    Cancelled,
}
