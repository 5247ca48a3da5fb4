//! Single-layer vector tile builder.
//!
//! Keys and values are interned in first-seen order, so adding the same
//! features in the same order always produces byte-identical output.

use super::geometry;
use super::property::{PropertyValue, ValueKey};
use geozero::mvt::tile::{Feature, GeomType, Layer, Value};
use geozero::mvt::Tile;
use prost::Message;
use std::collections::HashMap;

/// Vector tile format version written into every layer.
const LAYER_VERSION: u32 = 2;

/// Accumulates features for one named layer.
#[derive(Debug)]
pub struct LayerBuilder {
    name: String,
    extent: u32,
    buffer: u32,
    keys: Vec<String>,
    key_index: HashMap<String, u32>,
    values: Vec<Value>,
    value_index: HashMap<ValueKey, u32>,
    features: Vec<Feature>,
}

impl LayerBuilder {
    /// Creates a builder for a layer with the given pixel extent and buffer.
    ///
    /// Points outside `[-buffer, extent + buffer)` are clipped.
    pub fn new(name: impl Into<String>, extent: u32, buffer: u32) -> Self {
        Self {
            name: name.into(),
            extent,
            buffer,
            keys: Vec::new(),
            key_index: HashMap::new(),
            values: Vec::new(),
            value_index: HashMap::new(),
            features: Vec::new(),
        }
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    /// Number of features added so far.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Checks whether a tile-local pixel lies inside the buffered extent.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let min = -(self.buffer as i64);
        let max = self.extent as i64 + self.buffer as i64;
        (min..max).contains(&(x as i64)) && (min..max).contains(&(y as i64))
    }

    /// Adds a point feature. Returns `false` if the point was clipped.
    pub fn add_point<'a, I>(&mut self, x: i32, y: i32, properties: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
    {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.add_feature(GeomType::Point, geometry::point(x, y), properties);
        true
    }

    /// Adds a feature with already encoded geometry commands.
    pub fn add_feature<'a, I>(&mut self, geom_type: GeomType, geometry: Vec<u32>, properties: I)
    where
        I: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
    {
        let mut tags = Vec::new();
        for (key, value) in properties {
            tags.push(self.key_slot(key));
            tags.push(self.value_slot(value));
        }

        self.features.push(Feature {
            tags,
            r#type: Some(geom_type as i32),
            geometry,
            ..Default::default()
        });
    }

    /// Finishes the layer. Layers without features are dropped.
    pub fn build(self) -> Option<Layer> {
        if self.features.is_empty() {
            return None;
        }
        Some(Layer {
            version: LAYER_VERSION,
            name: self.name,
            features: self.features,
            keys: self.keys,
            values: self.values,
            extent: Some(self.extent),
        })
    }

    fn key_slot(&mut self, key: &str) -> u32 {
        if let Some(&slot) = self.key_index.get(key) {
            return slot;
        }
        let slot = self.keys.len() as u32;
        self.keys.push(key.to_string());
        self.key_index.insert(key.to_string(), slot);
        slot
    }

    fn value_slot(&mut self, value: &PropertyValue) -> u32 {
        let key = value.intern_key();
        if let Some(&slot) = self.value_index.get(&key) {
            return slot;
        }
        let slot = self.values.len() as u32;
        self.values.push(value.to_value());
        self.value_index.insert(key, slot);
        slot
    }
}

/// Serializes layers into an encoded tile.
///
/// A tile without layers encodes to an empty byte string, which is still a
/// valid tile.
pub fn encode_tile(layers: impl IntoIterator<Item = Layer>) -> Vec<u8> {
    Tile {
        layers: layers.into_iter().collect(),
    }
    .encode_to_vec()
}
