//! Backing store configuration.

use super::defaults::*;
use super::settings::ConfigFile;
use crate::storage::RetryPolicy;
use std::time::Duration;

/// Connection and retry parameters for the backing store.
///
/// # Example
///
/// ```
/// use occmap::config::StorageConfig;
///
/// let config = StorageConfig::new().with_max_retries(5);
/// assert_eq!(config.table(), "maps");
/// assert_eq!(config.retry_policy().max_retries(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    url: String,
    table: String,
    salt_modulus: u32,
    /// Per-attempt timeout in seconds
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(file: &ConfigFile) -> Self {
        Self {
            url: file.storage.url.clone(),
            table: file.storage.table.clone(),
            salt_modulus: file.storage.salt_modulus,
            timeout_secs: file.storage.timeout,
            max_retries: file.storage.max_retries,
            retry_backoff_ms: file.storage.retry_backoff_ms,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_salt_modulus(mut self, modulus: u32) -> Self {
        self.salt_modulus = modulus;
        self
    }

    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn salt_modulus(&self) -> u32 {
        self.salt_modulus
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for store reads.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_backoff_ms),
            self.timeout(),
        )
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_file(&ConfigFile::default())
    }
}
