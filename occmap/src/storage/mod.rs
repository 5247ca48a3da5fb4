//! Read-only access to stored occurrence datasets.
//!
//! A dataset is stored in exactly one of two shapes: a zoom-agnostic set of
//! raw points, or pre-rendered multi-layer tiles per address. The
//! [`StorageGateway`] trait hides where the bytes come from; its provided
//! [`StorageGateway::lookup`] turns the two lookups into one
//! [`StoredRepresentation`].
//!
//! # Implementations
//!
//! - [`RestGateway`]: salted rows read over a REST cell API via [`KvHttpClient`]
//! - [`RetryingGateway`]: bounded retry with backoff around any gateway
//! - [`MemoryGateway`]: fixtures held in memory

mod http;
mod memory;
mod points;
mod rest;
mod retry;
mod salt;
mod types;

pub use http::{KvHttpClient, ReqwestKvClient};
pub use memory::MemoryGateway;
pub use points::{decode_point_features, PointFeature, PointFeatures};
pub use rest::RestGateway;
pub use retry::{RetryPolicy, RetryingGateway};
pub use salt::ModulusSalt;
pub use types::{StorageError, StorageGateway, StoredRepresentation};

use crate::config::StorageConfig;

/// Gateway stack used against a real store: REST reads with retry.
pub type RemoteGateway = RetryingGateway<RestGateway<ReqwestKvClient>>;

/// Builds the remote gateway stack from configuration.
pub fn connect(config: &StorageConfig) -> Result<RemoteGateway, StorageError> {
    let client = ReqwestKvClient::new(config.timeout())?;
    let gateway = RestGateway::new(client, config.url(), config.table(), config.salt_modulus())?;
    Ok(RetryingGateway::new(gateway, config.retry_policy()))
}
