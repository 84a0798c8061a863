//! Transport port definition.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::domain::errors::TransportError;

/// Port for downloading a resource.
///
/// Timeouts are the implementation's responsibility.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Downloads the full body behind a URL.
    async fn fetch(&self, url: &Url) -> Result<Bytes, TransportError>;
}
