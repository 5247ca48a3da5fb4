//! HTTP client abstraction for the key-value REST endpoint

use super::types::StorageError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Trait for reading single cells over HTTP.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait KvHttpClient: Send + Sync {
    /// Fetches a raw cell value.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the store answers 404, the body bytes on success,
    /// or a [`StorageError`] classified by whether a retry may help.
    fn get_cell(&self, url: &str)
        -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestKvClient {
    client: reqwest::Client,
}

/// User-Agent sent with every store request.
const USER_AGENT: &str = concat!("occmap/", env!("CARGO_PKG_VERSION"));

impl ReqwestKvClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// Keeps a pool of warm connections since every tile request reads at
    /// least one cell.
    pub fn new(timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(64)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                StorageError::Rejected(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl KvHttpClient for ReqwestKvClient {
    async fn get_cell(&self, url: &str) -> Result<Option<Vec<u8>>, StorageError> {
        trace!(url = url, "Cell GET starting");

        let response = match self
            .client
            .get(url)
            .header("Accept", "application/octet-stream")
            .send()
            .await
        {
            Ok(resp) => {
                debug!(url = url, status = resp.status().as_u16(), "Cell response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "Cell request failed"
                );
                return Err(StorageError::Unavailable(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(url = url, status = status.as_u16(), "Store error status");
            return Err(StorageError::Unavailable(format!("HTTP {} from {}", status, url)));
        }
        if !status.is_success() {
            return Err(StorageError::Rejected(format!("HTTP {} from {}", status, url)));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "Cell body read");
                Ok(Some(bytes.to_vec()))
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read cell body");
                Err(StorageError::Unavailable(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}
