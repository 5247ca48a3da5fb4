//! Request orchestration.
//!
//! [`TileService`] wires a storage gateway to the composer, the binner
//! and the capability probe. It owns the async/blocking boundary: the
//! gateway read is awaited, while composition and binning run on the
//! blocking pool under the request's cancellation token.

mod error;

pub use error::ServiceError;

use crate::binning::{bin_or_passthrough, Binner, HexBinner};
use crate::capabilities::{Capabilities, CapabilityProbe, ProbeTable};
use crate::config::TileConfig;
use crate::pipeline::{ComposeRequest, FeatureComposer};
use crate::storage::{StorageError, StorageGateway};
use crate::tile::ComposedTile;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A fully validated tile request.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub dataset_key: String,
    pub compose: ComposeRequest,
    /// Hex cells per tile when binning was asked for
    pub hex_per_tile: Option<u32>,
}

/// Serves tiles and capabilities for one storage gateway.
pub struct TileService<G> {
    gateway: G,
    composer: FeatureComposer,
    binner: Arc<dyn Binner>,
    probe: CapabilityProbe,
}

impl<G: StorageGateway> TileService<G> {
    /// Creates a service using hex binning and a world probe table at the
    /// configured root zoom.
    pub fn new(gateway: G, config: Arc<TileConfig>) -> Self {
        let binner = Arc::new(HexBinner::new(config.hex_tile_size()));
        let probe = CapabilityProbe::new(ProbeTable::world(config.capabilities_root_zoom()));
        Self {
            gateway,
            composer: FeatureComposer::new(config),
            binner,
            probe,
        }
    }

    /// Replaces the binner.
    pub fn with_binner(mut self, binner: Arc<dyn Binner>) -> Self {
        self.binner = binner;
        self
    }

    pub fn config(&self) -> &TileConfig {
        self.composer.config()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Looks up the dataset and composes one tile from it.
    pub async fn composed_tile(
        &self,
        dataset_key: &str,
        request: ComposeRequest,
        cancel: &CancellationToken,
    ) -> Result<ComposedTile, ServiceError> {
        let stored = self
            .gateway
            .lookup(dataset_key, &request.address)
            .await
            .inspect_err(|e| log_storage_error(dataset_key, e))?;

        debug!(
            dataset_key,
            address = %request.address,
            source = stored.kind(),
            "Resolved stored representation"
        );

        let composer = self.composer.clone();
        let token = cancel.clone();
        let address = request.address;
        let composed = tokio::task::spawn_blocking(move || {
            composer.compose(&stored, &request, &token)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("composition task failed: {}", e)))?;

        composed.map_err(|e| {
            let e = ServiceError::from(e);
            if let ServiceError::StorageCorruption(reason) = &e {
                error!(dataset_key, %address, reason = %reason, "Stored tile is corrupt");
            }
            e
        })
    }

    /// Composes a tile and bins it when the request asks for it.
    pub async fn tile(
        &self,
        request: &TileRequest,
        cancel: &CancellationToken,
    ) -> Result<ComposedTile, ServiceError> {
        let tile = self
            .composed_tile(&request.dataset_key, request.compose.clone(), cancel)
            .await?;

        let Some(hex_per_tile) = request.hex_per_tile else {
            return Ok(tile);
        };
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }

        let binner = Arc::clone(&self.binner);
        let address = request.compose.address;
        tokio::task::spawn_blocking(move || {
            bin_or_passthrough(binner.as_ref(), tile, &address, hex_per_tile)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("binning task failed: {}", e)))?
        .map_err(ServiceError::from)
    }

    /// Summarizes the extent and year span of a dataset.
    ///
    /// Every probe tile goes through [`Self::composed_tile`], verbose and
    /// unfiltered, exactly like a client request would.
    pub async fn capabilities(
        &self,
        dataset_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Capabilities, ServiceError> {
        let capabilities = self
            .probe
            .run(move |address| {
                self.composed_tile(
                    dataset_key,
                    ComposeRequest::new(address).with_verbose(true),
                    cancel,
                )
            })
            .await?;

        info!(dataset_key, ?capabilities, "Capabilities");
        Ok(capabilities)
    }
}

fn log_storage_error(dataset_key: &str, e: &StorageError) {
    match e {
        StorageError::Corrupt { .. } => error!(dataset_key, error = %e, "Stored data is corrupt"),
        StorageError::Unavailable(_) => warn!(dataset_key, error = %e, "Storage unavailable"),
        StorageError::Rejected(_) => error!(dataset_key, error = %e, "Storage rejected read"),
    }
}
