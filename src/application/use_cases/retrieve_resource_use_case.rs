//! Cache-aware resource retrieval.

use std::sync::Arc;

use tracing::{debug, trace, warn};
use url::Url;

use crate::application::dto::{RetrievalSource, Retrieved};
use crate::domain::errors::NetworkError;
use crate::domain::ports::{ByteStorePort, CachedResource, ConnectivityPort, TransportPort};
use crate::domain::services::image_signature;
use crate::domain::services::{RetrievalDecision, decide};

/// Retrieves bytes for a URL, consulting the byte store before the network.
#[derive(Clone)]
pub struct RetrieveResourceUseCase {
    store: Arc<dyn ByteStorePort>,
    transport: Arc<dyn TransportPort>,
    connectivity: Arc<dyn ConnectivityPort>,
}

impl RetrieveResourceUseCase {
    /// Creates new retrieval use case.
    #[must_use]
    pub const fn new(
        store: Arc<dyn ByteStorePort>,
        transport: Arc<dyn TransportPort>,
        connectivity: Arc<dyn ConnectivityPort>,
    ) -> Self {
        Self {
            store,
            transport,
            connectivity,
        }
    }

    /// Returns bytes for the URL from the store or the network.
    ///
    /// Fetched bytes are classified and stored before being returned.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoConnection`] if the resource could not be
    /// reached, or [`NetworkError::InvalidResponse`] if the server refused
    /// it. The store is not touched on failure.
    pub async fn execute(&self, url: &Url) -> Result<Retrieved, NetworkError> {
        let status = self.connectivity.current_status();
        let cached = self.store.lookup(url);

        trace!(
            url = %url,
            status = %status,
            hit = cached.is_some(),
            "Looked up byte store"
        );

        match (decide(status, cached.as_ref()), cached) {
            (RetrievalDecision::ServeCache, Some(entry)) => {
                debug!(url = %url, is_image = entry.is_image, "Serving from cache");
                Ok(Retrieved::new(entry.bytes, entry.is_image, RetrievalSource::Cache))
            }
            _ => self.fetch_and_store(url).await,
        }
    }

    /// Returns the stored entry for a URL without touching the network.
    #[must_use]
    pub fn cached(&self, url: &Url) -> Option<CachedResource> {
        self.store.lookup(url)
    }

    /// Returns true if the store holds an entry for the URL.
    #[must_use]
    pub fn is_cached(&self, url: &Url) -> bool {
        self.store.contains(url)
    }

    async fn fetch_and_store(&self, url: &Url) -> Result<Retrieved, NetworkError> {
        debug!(url = %url, "Fetching from network");

        let bytes = self.transport.fetch(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Fetch failed");
            NetworkError::from(e)
        })?;

        let is_image = image_signature::is_image_data(&bytes);
        self.store.store(url, bytes.clone(), is_image);
        debug!(url = %url, len = bytes.len(), is_image, "Stored fetched payload");

        Ok(Retrieved::new(bytes, is_image, RetrievalSource::Network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectivityStatus;
    use crate::domain::errors::TransportError;
    use crate::domain::ports::MockTransportPort;
    use crate::domain::ports::mocks::{FixedConnectivity, RecordingByteStore, ScriptedTransport};
    use bytes::Bytes;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    const FEED: &[u8] = br#"{"items":[]}"#;

    fn url() -> Url {
        Url::parse("https://live.staticflickr.com/65535/51710334527_c95af67147_b.jpg").unwrap()
    }

    fn use_case(
        store: Arc<RecordingByteStore>,
        transport: Arc<dyn TransportPort>,
        status: ConnectivityStatus,
    ) -> RetrieveResourceUseCase {
        RetrieveResourceUseCase::new(store, transport, Arc::new(FixedConnectivity::new(status)))
    }

    #[tokio::test]
    async fn test_disconnected_ignores_cached_non_image() {
        let store = Arc::new(RecordingByteStore::with_entry(&url(), FEED, false));
        let mut transport = MockTransportPort::new();
        transport
            .expect_fetch()
            .times(1)
            .returning(|_| Err(TransportError::unreachable("offline")));

        let retrieve = use_case(
            store.clone(),
            Arc::new(transport),
            ConnectivityStatus::Disconnected,
        );

        assert_eq!(retrieve.execute(&url()).await.unwrap_err(), NetworkError::NoConnection);
        assert_eq!(store.store_count(), 0);
        assert_eq!(retrieve.cached(&url()).unwrap().bytes, Bytes::from_static(FEED));
    }

    #[tokio::test]
    async fn test_disconnected_serves_cached_image() {
        let store = Arc::new(RecordingByteStore::with_entry(&url(), JPEG, true));
        let mut transport = MockTransportPort::new();
        transport.expect_fetch().never();

        let retrieve = use_case(
            store.clone(),
            Arc::new(transport),
            ConnectivityStatus::Disconnected,
        );
        let retrieved = retrieve.execute(&url()).await.unwrap();

        assert!(retrieved.is_from_cache());
        assert!(retrieved.is_image);
        assert_eq!(retrieved.bytes, Bytes::from_static(JPEG));
        assert_eq!(store.store_count(), 0);
    }

    #[tokio::test]
    async fn test_connected_miss_fetches_and_stores_image() {
        let store = Arc::new(RecordingByteStore::new());
        let transport = Arc::new(ScriptedTransport::new().respond(&url(), JPEG));

        let retrieve = use_case(store.clone(), transport.clone(), ConnectivityStatus::Connected);
        let retrieved = retrieve.execute(&url()).await.unwrap();

        assert_eq!(retrieved.source, RetrievalSource::Network);
        assert!(retrieved.is_image);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(store.store_count(), 1);

        let entry = retrieve.cached(&url()).unwrap();
        assert!(entry.is_image);
        assert_eq!(entry.bytes, Bytes::from_static(JPEG));
    }

    #[tokio::test]
    async fn test_connected_serves_cached_non_image() {
        let store = Arc::new(RecordingByteStore::with_entry(&url(), FEED, false));
        let transport = Arc::new(ScriptedTransport::new());

        let retrieve = use_case(store, transport.clone(), ConnectivityStatus::Connected);
        let retrieved = retrieve.execute(&url()).await.unwrap();

        assert!(retrieved.is_from_cache());
        assert!(!retrieved.is_image);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_image_payload_is_stored_as_non_image() {
        let store = Arc::new(RecordingByteStore::new());
        let transport = Arc::new(ScriptedTransport::new().respond(&url(), FEED));

        let retrieve = use_case(store, transport, ConnectivityStatus::Connected);
        let retrieved = retrieve.execute(&url()).await.unwrap();

        assert!(!retrieved.is_image);
        assert!(retrieve.is_cached(&url()));
        assert!(!retrieve.cached(&url()).unwrap().is_image);
    }

    #[tokio::test]
    async fn test_status_error_maps_to_invalid_response() {
        let store = Arc::new(RecordingByteStore::new());
        let transport =
            Arc::new(ScriptedTransport::new().fail(&url(), TransportError::Status { status: 503 }));

        let retrieve = use_case(store.clone(), transport, ConnectivityStatus::Connected);

        assert_eq!(
            retrieve.execute(&url()).await.unwrap_err(),
            NetworkError::InvalidResponse
        );
        assert!(!retrieve.is_cached(&url()));
        assert_eq!(store.store_count(), 0);
    }

    #[tokio::test]
    async fn test_status_change_between_calls() {
        let store = Arc::new(RecordingByteStore::with_entry(&url(), FEED, false));
        let connectivity = Arc::new(FixedConnectivity::new(ConnectivityStatus::Connected));
        let transport = Arc::new(ScriptedTransport::new().respond(&url(), JPEG));

        let retrieve = RetrieveResourceUseCase::new(store, transport.clone(), connectivity.clone());

        assert!(retrieve.execute(&url()).await.unwrap().is_from_cache());

        connectivity.set(ConnectivityStatus::Disconnected);
        let retrieved = retrieve.execute(&url()).await.unwrap();

        assert_eq!(retrieved.source, RetrievalSource::Network);
        assert_eq!(transport.call_count(), 1);
    }
}
