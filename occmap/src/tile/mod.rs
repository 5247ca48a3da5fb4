//! Vector tile encoding and decoding.
//!
//! Tiles follow the Mapbox vector tile protobuf layout; the message types
//! come from `geozero::mvt` and are serialized with `prost`. This module
//! adds what composition needs on top of them: a deterministic
//! [`LayerBuilder`], [`decode_tile`] with resolved properties, and the
//! [`ComposedTile`] handed back to callers.

mod builder;
mod composed;
mod decode;
mod error;
pub mod geometry;
mod property;

pub use builder::{encode_tile, LayerBuilder};
pub use composed::ComposedTile;
pub use decode::{decode_tile, DecodedFeature, DecodedLayer};
pub use error::TileError;
pub use geozero::mvt::tile::GeomType;
pub use property::{Properties, PropertyValue};

/// Name of the single layer every composed tile is written to.
pub const LAYER_OCCURRENCE: &str = "occurrence";

/// Count of occurrences a feature represents.
pub const ATTR_TOTAL: &str = "total";

/// Year the occurrences were recorded in.
pub const ATTR_YEAR: &str = "year";

/// Category (basis of record) of the occurrences.
pub const ATTR_BASIS_OF_RECORD: &str = "basisOfRecord";
