//! Gateway over a key-value store's REST interface.
//!
//! Cells are read with `GET {url}/{table}/{row}/{family}:{qualifier}`:
//!
//! - point sets: row `{salt}:{datasetKey}`, column `wgs84:features`
//! - pre-tiled: row `{salt}:{datasetKey}`, column `EPSG_3857:{z}:{x}:{y}`

use super::http::KvHttpClient;
use super::points::{decode_point_features, PointFeatures};
use super::salt::ModulusSalt;
use super::types::{StorageError, StorageGateway};
use crate::coord::TileAddress;
use tracing::{debug, error};
use url::Url;

const POINTS_COLUMN: &str = "wgs84:features";

/// Reads datasets from a salted table over HTTP.
pub struct RestGateway<C> {
    client: C,
    base_url: Url,
    table: String,
    salt: ModulusSalt,
}

impl<C: KvHttpClient> RestGateway<C> {
    /// Creates a gateway for `table` on the store at `base_url`.
    pub fn new(
        client: C,
        base_url: &str,
        table: &str,
        salt_modulus: u32,
    ) -> Result<Self, StorageError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StorageError::Rejected(format!("Invalid store URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Rejected(format!(
                "Store URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            table: table.to_string(),
            salt: ModulusSalt::new(salt_modulus)?,
        })
    }

    fn cell_url(&self, dataset_key: &str, column: &str) -> Result<String, StorageError> {
        let row = self.salt.salted_key(dataset_key);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Rejected(format!("Store URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend([self.table.as_str(), row.as_str(), column]);
        Ok(url.to_string())
    }
}

impl<C: KvHttpClient> StorageGateway for RestGateway<C> {
    async fn lookup_points(&self, dataset_key: &str) -> Result<Option<PointFeatures>, StorageError> {
        let url = self.cell_url(dataset_key, POINTS_COLUMN)?;
        let Some(bytes) = self.client.get_cell(&url).await? else {
            return Ok(None);
        };

        debug!(dataset_key, bytes = bytes.len(), "Found stored point set");
        decode_point_features(dataset_key, &bytes)
            .map(Some)
            .inspect_err(|e| error!(dataset_key, error = %e, "Stored point set is corrupt"))
    }

    async fn lookup_pretiled(
        &self,
        dataset_key: &str,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let column = format!("{}:{}", address.srs.storage_family(), address.qualifier());
        let url = self.cell_url(dataset_key, &column)?;
        let tile = self.client.get_cell(&url).await?;

        if let Some(bytes) = &tile {
            debug!(dataset_key, %address, bytes = bytes.len(), "Found pre-tiled cell");
        }
        Ok(tile)
    }
}
