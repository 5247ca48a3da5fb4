//! Feature composition for the two storage shapes.

use super::ComposeError;
use crate::config::TileConfig;
use crate::coord::{projection_for, to_tile_local, TileAddress};
use crate::filter::FilterSpec;
use crate::storage::{PointFeature, StoredRepresentation};
use crate::tile::{
    decode_tile, encode_tile, ComposedTile, GeomType, LayerBuilder, PropertyValue,
    TileError, ATTR_BASIS_OF_RECORD, ATTR_TOTAL, ATTR_YEAR, LAYER_OCCURRENCE,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Number of features processed between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 4096;

/// What to compose: an address, a filter and the attribute verbosity.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    pub address: TileAddress,
    pub filter: FilterSpec,
    /// Keep every attribute instead of only `total`
    pub verbose: bool,
}

impl ComposeRequest {
    /// Unfiltered, non-verbose request for `address`.
    pub fn new(address: TileAddress) -> Self {
        Self {
            address,
            filter: FilterSpec::all(),
            verbose: false,
        }
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Composes single-layer tiles from stored representations.
///
/// Holds only immutable configuration, so one composer can serve any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct FeatureComposer {
    config: Arc<TileConfig>,
}

impl FeatureComposer {
    pub fn new(config: Arc<TileConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Composes the tile for `request` from what storage returned.
    ///
    /// Points take precedence over pre-tiled data by construction of
    /// [`StoredRepresentation`]; an absent dataset yields an empty tile.
    pub fn compose(
        &self,
        stored: &StoredRepresentation,
        request: &ComposeRequest,
        cancel: &CancellationToken,
    ) -> Result<ComposedTile, ComposeError> {
        let tile = match stored {
            StoredRepresentation::Points(points) => {
                self.compose_points(&points.features, request, cancel)?
            }
            StoredRepresentation::PreTiled(bytes) => {
                self.compose_pretiled(bytes, request, cancel)?
            }
            StoredRepresentation::Absent => ComposedTile::empty(),
        };

        debug!(
            address = %request.address,
            source = stored.kind(),
            features = tile.feature_count(),
            verbose = request.verbose,
            "Composed tile"
        );
        Ok(tile)
    }

    fn compose_points(
        &self,
        features: &[PointFeature],
        request: &ComposeRequest,
        cancel: &CancellationToken,
    ) -> Result<ComposedTile, ComposeError> {
        let address = &request.address;
        let tile_size = self.config.point_tile_size();
        let buffer = self.config.point_buffer_size();
        let projection = projection_for(address.srs, tile_size);
        let world_width = projection.world_width(address.zoom);

        let mut layer = LayerBuilder::new(LAYER_OCCURRENCE, tile_size, buffer);
        let total = PropertyValue::Int(1);

        for (index, feature) in features.iter().enumerate() {
            check_cancelled(index, cancel)?;

            if !request.filter.matches(feature.year, &feature.basis_of_record) {
                continue;
            }
            if !projection.is_plottable(feature.latitude, feature.longitude) {
                continue;
            }

            let global = projection.to_global_pixel(feature.latitude, feature.longitude, address.zoom);
            let Some((x, y)) = to_tile_local(global, address, tile_size, buffer, world_width) else {
                continue;
            };

            if request.verbose {
                let basis_of_record = PropertyValue::String(feature.basis_of_record.clone());
                let year = feature.year.map(|y| PropertyValue::Int(y as i64));

                let mut properties = vec![(ATTR_TOTAL, &total)];
                if !feature.basis_of_record.is_empty() {
                    properties.push((ATTR_BASIS_OF_RECORD, &basis_of_record));
                }
                if let Some(year) = &year {
                    properties.push((ATTR_YEAR, year));
                }
                layer.add_point(x, y, properties);
            } else {
                layer.add_point(x, y, [(ATTR_TOTAL, &total)]);
            }
        }

        Ok(finish(layer))
    }

    fn compose_pretiled(
        &self,
        bytes: &[u8],
        request: &ComposeRequest,
        cancel: &CancellationToken,
    ) -> Result<ComposedTile, ComposeError> {
        let corrupt = |source: TileError| ComposeError::CorruptTile {
            address: request.address,
            source,
        };
        let layers = decode_tile(bytes).map_err(corrupt)?;

        let mut output = LayerBuilder::new(
            LAYER_OCCURRENCE,
            self.config.tile_size(),
            self.config.buffer_size(),
        );
        let mut processed = 0;

        for layer in &layers {
            if !request.filter.matches_category(&layer.name) {
                trace!(layer = %layer.name, "Skipping layer outside category filter");
                continue;
            }

            for feature in &layer.features {
                check_cancelled(processed, cancel)?;
                processed += 1;

                let year = feature
                    .property(ATTR_YEAR)
                    .and_then(PropertyValue::as_i64)
                    .and_then(|y| i32::try_from(y).ok());
                if !request.filter.matches_year(year) {
                    continue;
                }

                if feature.geom_type == GeomType::Point {
                    let points = feature.points().map_err(corrupt)?;
                    if !points.iter().any(|&(x, y)| output.in_bounds(x, y)) {
                        continue;
                    }
                }

                if request.verbose {
                    output.add_feature(
                        feature.geom_type,
                        feature.geometry.clone(),
                        feature.properties.iter().map(|(k, v)| (k.as_str(), v)),
                    );
                } else {
                    output.add_feature(
                        feature.geom_type,
                        feature.geometry.clone(),
                        feature.property(ATTR_TOTAL).map(|v| (ATTR_TOTAL, v)),
                    );
                }
            }
        }

        Ok(finish(output))
    }
}

fn check_cancelled(index: usize, cancel: &CancellationToken) -> Result<(), ComposeError> {
    if index % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
        return Err(ComposeError::Cancelled);
    }
    Ok(())
}

fn finish(layer: LayerBuilder) -> ComposedTile {
    let count = layer.len();
    ComposedTile::new(encode_tile(layer.build()), count)
}
