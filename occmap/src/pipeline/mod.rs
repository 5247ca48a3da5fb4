//! Query-time tile composition.
//!
//! [`FeatureComposer`] turns whatever the storage gateway returned for a
//! request into a single-layer tile:
//!
//! - raw points are filtered, reprojected at a fixed high resolution and
//!   written one feature per point
//! - pre-rendered tiles are decoded, their layers selected by category and
//!   their features filtered by year, then merged into one layer
//! - nothing stored yields an empty tile
//!
//! Composition is synchronous and CPU-bound. Callers on an async runtime
//! run it on the blocking pool and pass a [`CancellationToken`] that is
//! polled between features.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod compose;
mod error;

pub use compose::{ComposeRequest, FeatureComposer, CANCEL_CHECK_INTERVAL};
pub use error::ComposeError;

#[cfg(test)]
mod tests;
