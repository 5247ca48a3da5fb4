//! In-process gateway backed by hash maps.

use super::points::PointFeatures;
use super::types::{StorageError, StorageGateway};
use crate::coord::TileAddress;
use std::collections::HashMap;

/// Gateway serving datasets held in memory.
///
/// Used for fixtures and tests; it never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    points: HashMap<String, PointFeatures>,
    tiles: HashMap<(String, TileAddress), Vec<u8>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a dataset as raw points.
    pub fn with_points(mut self, dataset_key: &str, points: PointFeatures) -> Self {
        self.points.insert(dataset_key.to_string(), points);
        self
    }

    /// Stores one pre-rendered tile of a dataset.
    pub fn with_pretiled(mut self, dataset_key: &str, address: TileAddress, tile: Vec<u8>) -> Self {
        self.tiles.insert((dataset_key.to_string(), address), tile);
        self
    }
}

impl StorageGateway for MemoryGateway {
    async fn lookup_points(&self, dataset_key: &str) -> Result<Option<PointFeatures>, StorageError> {
        Ok(self.points.get(dataset_key).cloned())
    }

    async fn lookup_pretiled(
        &self,
        dataset_key: &str,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.tiles.get(&(dataset_key.to_string(), *address)).cloned())
    }
}
