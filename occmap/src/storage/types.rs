//! Storage gateway types and traits

use super::points::PointFeatures;
use crate::coord::TileAddress;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while reading from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Store could not be reached or timed out; worth retrying
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored bytes could not be decoded; retrying will not help
    #[error("Stored data for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// Store refused the request
    #[error("Storage rejected request: {0}")]
    Rejected(String),
}

impl StorageError {
    /// Whether the failure is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

/// The shape a dataset was stored in.
///
/// A dataset is ingested either as one set of raw points or as pre-rendered
/// tiles, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRepresentation {
    /// Zoom-agnostic raw points
    Points(PointFeatures),
    /// Pre-encoded multi-layer tile for the exact address requested
    PreTiled(Vec<u8>),
    /// Nothing stored for this dataset and address
    Absent,
}

impl StoredRepresentation {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredRepresentation::Points(_) => "points",
            StoredRepresentation::PreTiled(_) => "pretiled",
            StoredRepresentation::Absent => "absent",
        }
    }
}

/// Read-only access to stored occurrence data.
///
/// Implementations must be safe for unlimited concurrent use. The only
/// suspension point of a tile request is a call into this trait.
pub trait StorageGateway: Send + Sync {
    /// Fetches the raw point set of a dataset, if it was stored as points.
    fn lookup_points(
        &self,
        dataset_key: &str,
    ) -> impl Future<Output = Result<Option<PointFeatures>, StorageError>> + Send;

    /// Fetches the pre-rendered tile of a dataset at an exact address.
    fn lookup_pretiled(
        &self,
        dataset_key: &str,
        address: &TileAddress,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Resolves which representation serves a request.
    ///
    /// Points take precedence; pre-tiled data is only consulted when no
    /// point set exists.
    fn lookup(
        &self,
        dataset_key: &str,
        address: &TileAddress,
    ) -> impl Future<Output = Result<StoredRepresentation, StorageError>> + Send {
        async move {
            if let Some(points) = self.lookup_points(dataset_key).await? {
                return Ok(StoredRepresentation::Points(points));
            }
            Ok(match self.lookup_pretiled(dataset_key, address).await? {
                Some(bytes) => StoredRepresentation::PreTiled(bytes),
                None => StoredRepresentation::Absent,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(StorageError::Unavailable("timeout".to_string()).is_retryable());
        assert!(!StorageError::Rejected("HTTP 403".to_string()).is_retryable());
        assert!(!StorageError::Corrupt {
            key: "0:0".to_string(),
            reason: "bad varint".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_corrupt_display_names_key() {
        let err = StorageError::Corrupt {
            key: "1:212".to_string(),
            reason: "invalid wire type".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stored data for '1:212' is corrupt: invalid wire type"
        );
    }

    #[test]
    fn test_representation_kind() {
        assert_eq!(StoredRepresentation::Absent.kind(), "absent");
        assert_eq!(StoredRepresentation::PreTiled(vec![]).kind(), "pretiled");
        assert_eq!(
            StoredRepresentation::Points(PointFeatures::default()).kind(),
            "points"
        );
    }
}
