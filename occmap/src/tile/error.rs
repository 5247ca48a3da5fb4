//! Error types for tile encoding and decoding.

use std::fmt;

/// Errors that can occur while reading or writing vector tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum TileError {
    /// Bytes are not a valid protobuf tile message
    Decode(String),
    /// Tile decoded but its content breaks the vector tile rules
    Malformed {
        /// Layer the problem was found in
        layer: String,
        /// What was wrong
        reason: String,
    },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::Decode(msg) => write!(f, "Failed to decode tile: {}", msg),
            TileError::Malformed { layer, reason } => {
                write!(f, "Malformed tile layer '{}': {}", layer, reason)
            }
        }
    }
}

impl std::error::Error for TileError {}

impl From<prost::DecodeError> for TileError {
    fn from(err: prost::DecodeError) -> Self {
        TileError::Decode(err.to_string())
    }
}
