//! Service error types.

use crate::binning::BinningError;
use crate::pipeline::ComposeError;
use crate::storage::StorageError;
use crate::tile::TileError;
use std::fmt;

/// Errors that can occur while serving a tile or capabilities request.
#[derive(Debug)]
pub enum ServiceError {
    /// Request parameters are malformed or unsupported
    InvalidArgument(String),
    /// Backing store could not be reached, even after retries
    StorageUnavailable(String),
    /// Stored bytes could not be decoded
    StorageCorruption(String),
    /// Binner failed on a tile it should have handled
    Binning(BinningError),
    /// Client went away before the work finished
    Cancelled,
    /// Anything else; never shown to clients in detail
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            Self::StorageCorruption(msg) => write!(f, "Storage corruption: {}", msg),
            Self::Binning(e) => write!(f, "Binning failed: {}", e),
            Self::Cancelled => write!(f, "Request cancelled"),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Binning(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unavailable(msg) => Self::StorageUnavailable(msg),
            StorageError::Corrupt { .. } => Self::StorageCorruption(e.to_string()),
            StorageError::Rejected(msg) => Self::Internal(msg),
        }
    }
}

impl From<ComposeError> for ServiceError {
    fn from(e: ComposeError) -> Self {
        match e {
            ComposeError::CorruptTile { .. } => Self::StorageCorruption(e.to_string()),
            ComposeError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<BinningError> for ServiceError {
    fn from(e: BinningError) -> Self {
        Self::Binning(e)
    }
}

impl From<TileError> for ServiceError {
    fn from(e: TileError) -> Self {
        Self::Internal(e.to_string())
    }
}
