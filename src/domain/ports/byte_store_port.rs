//! Byte store port definition.

use bytes::Bytes;
use url::Url;

/// Bytes previously fetched for a URL, with their classified content kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResource {
    /// Stored payload.
    pub bytes: Bytes,
    /// Whether the payload carried a known image signature when stored.
    pub is_image: bool,
}

impl CachedResource {
    /// Creates a new cached resource.
    #[must_use]
    pub const fn new(bytes: Bytes, is_image: bool) -> Self {
        Self { bytes, is_image }
    }
}

/// Key-value store of fetched payloads, keyed by request URL.
///
/// Calls are synchronous from the caller's point of view. Implementations
/// must be thread-safe; concurrent stores for one URL may race and the last
/// writer wins.
pub trait ByteStorePort: Send + Sync {
    /// Returns the stored payload for a URL, if any.
    fn lookup(&self, url: &Url) -> Option<CachedResource>;

    /// Stores a payload for a URL, replacing any previous one.
    fn store(&self, url: &Url, bytes: Bytes, is_image: bool);

    /// Returns true if a payload is stored for the URL.
    fn contains(&self, url: &Url) -> bool {
        self.lookup(url).is_some()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock byte store that records writes.
    #[derive(Default)]
    pub struct RecordingByteStore {
        entries: Mutex<HashMap<Url, CachedResource>>,
        stores: AtomicUsize,
    }

    impl RecordingByteStore {
        /// Creates empty mock store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates mock store holding one entry.
        pub fn with_entry(url: &Url, bytes: &'static [u8], is_image: bool) -> Self {
            let store = Self::new();
            store.entries.lock().insert(
                url.clone(),
                CachedResource::new(Bytes::from_static(bytes), is_image),
            );
            store
        }

        /// Number of `store` calls seen.
        pub fn store_count(&self) -> usize {
            self.stores.load(Ordering::SeqCst)
        }
    }

    impl ByteStorePort for RecordingByteStore {
        fn lookup(&self, url: &Url) -> Option<CachedResource> {
            self.entries.lock().get(url).cloned()
        }

        fn store(&self, url: &Url, bytes: Bytes, is_image: bool) {
            self.stores.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .insert(url.clone(), CachedResource::new(bytes, is_image));
        }
    }
}
