//! Decoding of stored and composed tiles.

use super::geometry;
use super::property::{Properties, PropertyValue};
use super::TileError;
use geozero::mvt::tile::{GeomType, Layer};
use geozero::mvt::Tile;
use prost::Message;

/// One feature of a decoded layer with its properties resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFeature {
    pub geom_type: GeomType,
    /// Raw geometry commands, in the layer's pixel space
    pub geometry: Vec<u32>,
    pub properties: Properties,
}

impl DecodedFeature {
    /// Looks up a property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Positions of a point feature. Other geometry types yield nothing.
    pub fn points(&self) -> Result<Vec<(i32, i32)>, TileError> {
        if self.geom_type != GeomType::Point {
            return Ok(Vec::new());
        }
        geometry::decode_points(&self.geometry)
    }
}

/// A decoded layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLayer {
    pub name: String,
    pub extent: u32,
    pub features: Vec<DecodedFeature>,
}

/// Decodes every layer of an encoded tile, preserving stored order.
///
/// No rescaling is applied: geometry stays in each layer's own extent.
pub fn decode_tile(bytes: &[u8]) -> Result<Vec<DecodedLayer>, TileError> {
    let tile = Tile::decode(bytes)?;
    tile.layers.into_iter().map(decode_layer).collect()
}

fn decode_layer(layer: Layer) -> Result<DecodedLayer, TileError> {
    let extent = layer.extent();
    let mut features = Vec::with_capacity(layer.features.len());

    for feature in &layer.features {
        if feature.tags.len() % 2 != 0 {
            return Err(malformed(&layer.name, "odd number of tag indexes".to_string()));
        }

        let mut properties = Vec::with_capacity(feature.tags.len() / 2);
        for pair in feature.tags.chunks_exact(2) {
            let key = layer
                .keys
                .get(pair[0] as usize)
                .ok_or_else(|| malformed(&layer.name, format!("key index {} out of range", pair[0])))?;
            let value = layer
                .values
                .get(pair[1] as usize)
                .ok_or_else(|| {
                    malformed(&layer.name, format!("value index {} out of range", pair[1]))
                })?;
            if let Some(value) = PropertyValue::from_value(value) {
                properties.push((key.clone(), value));
            }
        }

        features.push(DecodedFeature {
            geom_type: feature.r#type(),
            geometry: feature.geometry.clone(),
            properties,
        });
    }

    Ok(DecodedLayer {
        name: layer.name,
        extent,
        features,
    })
}

fn malformed(layer: &str, reason: String) -> TileError {
    TileError::Malformed {
        layer: layer.to_string(),
        reason,
    }
}
