//! Byte store adapters.

mod disk_store;
mod memory_store;
mod tiered_store;

use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

pub use disk_store::{DEFAULT_MAX_DISK_BYTES, DiskByteStore};
pub use memory_store::{CacheStats, DEFAULT_MEMORY_ENTRIES, MemoryByteStore};
pub use tiered_store::TieredByteStore;

/// Byte store errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem access failed.
    #[error("cache io error: {0}")]
    IoError(String),
}

/// Result alias for byte store operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Stable, filesystem-safe key for a URL.
pub(crate) fn url_digest(url: &Url) -> String {
    hex::encode(Sha256::digest(url.as_str().as_bytes()))
}
