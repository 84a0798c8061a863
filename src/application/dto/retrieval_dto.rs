//! Retrieval result DTOs.

use bytes::Bytes;
use url::Url;

use crate::domain::entities::PostId;
use crate::domain::errors::NetworkError;

/// Where retrieved bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalSource {
    /// Served from the byte store.
    Cache,
    /// Downloaded and then stored.
    Network,
}

impl std::fmt::Display for RetrievalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Bytes returned by a retrieval.
#[derive(Debug, Clone)]
pub struct Retrieved {
    /// Payload.
    pub bytes: Bytes,
    /// Whether the payload carries an image signature.
    pub is_image: bool,
    /// Where the payload came from.
    pub source: RetrievalSource,
}

impl Retrieved {
    /// Creates new retrieval result.
    #[must_use]
    pub const fn new(bytes: Bytes, is_image: bool, source: RetrievalSource) -> Self {
        Self {
            bytes,
            is_image,
            source,
        }
    }

    /// Returns true if served from the byte store.
    #[must_use]
    pub const fn is_from_cache(&self) -> bool {
        matches!(self.source, RetrievalSource::Cache)
    }
}

/// Result of prefetching one image of a post.
#[derive(Debug, Clone)]
pub struct PrefetchOutcome {
    /// Post the image belongs to.
    pub post: PostId,
    /// Image URL that was requested.
    pub url: Url,
    /// Where the bytes came from, or why they could not be retrieved.
    pub result: Result<RetrievalSource, NetworkError>,
}

impl PrefetchOutcome {
    /// Returns true if the image is now available locally.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
