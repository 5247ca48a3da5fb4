//! The single-layer tile produced for a request.

/// An encoded tile with one output layer and its feature count.
///
/// Always structurally valid, including when it holds no features.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposedTile {
    bytes: Vec<u8>,
    feature_count: usize,
}

impl ComposedTile {
    pub fn new(bytes: Vec<u8>, feature_count: usize) -> Self {
        Self {
            bytes,
            feature_count,
        }
    }

    /// A tile without features.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn is_empty(&self) -> bool {
        self.feature_count == 0
    }
}
