//! Memory store in front of an optional disk store.

use bytes::Bytes;
use tracing::{trace, warn};
use url::Url;

use super::{DiskByteStore, MemoryByteStore};
use crate::domain::ports::{ByteStorePort, CachedResource};

/// Two-level byte store.
///
/// Lookups try memory first and promote disk hits into memory. Every
/// payload is kept in memory for the run. The disk level persists images
/// only, so the feed is fetched fresh on every start.
pub struct TieredByteStore {
    memory: MemoryByteStore,
    disk: Option<DiskByteStore>,
}

impl TieredByteStore {
    /// Creates a store from its levels.
    #[must_use]
    pub const fn new(memory: MemoryByteStore, disk: Option<DiskByteStore>) -> Self {
        Self { memory, disk }
    }

    /// Creates a memory-only store.
    #[must_use]
    pub const fn memory_only(memory: MemoryByteStore) -> Self {
        Self::new(memory, None)
    }

    /// The memory level.
    #[must_use]
    pub const fn memory(&self) -> &MemoryByteStore {
        &self.memory
    }

    /// The disk level, if enabled.
    #[must_use]
    pub const fn disk(&self) -> Option<&DiskByteStore> {
        self.disk.as_ref()
    }
}

impl ByteStorePort for TieredByteStore {
    fn lookup(&self, url: &Url) -> Option<CachedResource> {
        if let Some(entry) = self.memory.lookup(url) {
            return Some(entry);
        }

        let bytes = self.disk.as_ref()?.get(url)?;
        trace!(url = %url, "Promoting disk entry to memory");
        self.memory.store(url, bytes.clone(), true);
        Some(CachedResource::new(bytes, true))
    }

    fn store(&self, url: &Url, bytes: Bytes, is_image: bool) {
        if is_image
            && let Some(disk) = &self.disk
            && let Err(e) = disk.put(url, &bytes)
        {
            warn!(url = %url, error = %e, "Failed to store on disk");
        }
        self.memory.store(url, bytes, is_image);
    }

    fn contains(&self, url: &Url) -> bool {
        self.memory.contains(url) || self.disk.as_ref().is_some_and(|disk| disk.contains(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn url(name: &str) -> Url {
        Url::parse(&format!("https://live.staticflickr.com/65535/{name}_q.jpg")).unwrap()
    }

    fn tiered() -> (TieredByteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let disk = DiskByteStore::new(temp_dir.path().to_path_buf(), 1024 * 1024).unwrap();
        (TieredByteStore::new(MemoryByteStore::new(8), Some(disk)), temp_dir)
    }

    #[test]
    fn test_images_are_written_through() {
        let (store, _temp) = tiered();
        store.store(&url("a"), Bytes::from_static(b"\xFF\xD8\xFF"), true);

        assert!(store.memory().contains(&url("a")));
        assert!(store.disk().unwrap().contains(&url("a")));
    }

    #[test]
    fn test_non_images_stay_in_memory() {
        let (store, _temp) = tiered();
        store.store(&url("feed"), Bytes::from_static(b"{}"), false);

        assert!(store.contains(&url("feed")));
        assert!(!store.disk().unwrap().contains(&url("feed")));
    }

    #[test]
    fn test_disk_hit_is_promoted() {
        let (store, _temp) = tiered();
        store
            .disk()
            .unwrap()
            .put(&url("a"), b"BM")
            .unwrap();

        assert!(store.memory().is_empty());
        let entry = store.lookup(&url("a")).unwrap();

        assert!(entry.is_image);
        assert!(store.memory().contains(&url("a")));
    }

    #[test]
    fn test_images_outlive_the_memory_level() {
        let temp_dir = TempDir::new().unwrap();
        let open = || {
            let disk = DiskByteStore::new(temp_dir.path().to_path_buf(), 1024).unwrap();
            TieredByteStore::new(MemoryByteStore::new(8), Some(disk))
        };

        let first = open();
        first.store(&url("a"), Bytes::from_static(b"BM"), true);
        first.store(&url("feed"), Bytes::from_static(b"{}"), false);
        drop(first);

        let second = open();
        assert_eq!(second.lookup(&url("a")).unwrap().bytes.as_ref(), b"BM");
        assert!(second.lookup(&url("feed")).is_none());
    }

    #[test]
    fn test_memory_only() {
        let store = TieredByteStore::memory_only(MemoryByteStore::new(2));
        store.store(&url("a"), Bytes::from_static(b"BM"), true);

        assert!(store.disk().is_none());
        assert!(store.lookup(&url("a")).is_some());
        assert!(store.lookup(&url("b")).is_none());
    }
}
