//! Disk-backed image store for persistence across runs.
//!
//! Each entry is one `.img` file named after the SHA-256 of its URL.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};
use url::Url;

use super::{CacheError, CacheResult, url_digest};

/// Maximum disk store size in bytes (200 MB default).
pub const DEFAULT_MAX_DISK_BYTES: u64 = 200 * 1024 * 1024;

const ENTRY_EXT: &str = "img";

fn is_entry(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXT)
}

/// Size-bounded store of image payloads on disk.
///
/// Reads go straight to the filesystem. Writes, evictions and cleanup run
/// under one lock so the size and entry counters match the directory.
pub struct DiskByteStore {
    cache_dir: PathBuf,
    max_size: u64,
    current_size: AtomicU64,
    item_count: AtomicUsize,
    writes: Mutex<()>,
}

impl DiskByteStore {
    /// Opens a store in the given directory, creating it if needed.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or read.
    pub fn new(cache_dir: PathBuf, max_size: u64) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        let entries = fs::read_dir(&cache_dir)
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        let mut total_size = 0u64;
        let mut count = 0usize;
        for entry in entries.flatten() {
            if is_entry(&entry.path())
                && let Ok(meta) = entry.metadata()
            {
                total_size += meta.len();
                count += 1;
            }
        }

        debug!(
            path = %cache_dir.display(),
            size = total_size,
            count,
            "Opened disk byte store"
        );

        let store = Self {
            cache_dir,
            max_size,
            current_size: AtomicU64::new(total_size),
            item_count: AtomicUsize::new(count),
            writes: Mutex::new(()),
        };
        store.cleanup_if_needed(None);

        Ok(store)
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{ENTRY_EXT}", url_digest(url)))
    }

    /// Reads the payload stored for a URL.
    #[must_use]
    pub fn get(&self, url: &Url) -> Option<Bytes> {
        let path = self.entry_path(url);
        match fs::read(&path) {
            Ok(bytes) => {
                trace!(url = %url, path = %path.display(), "Disk store hit");
                Some(Bytes::from(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read cache file");
                None
            }
        }
    }

    /// Returns true if a payload is stored for the URL.
    #[must_use]
    pub fn contains(&self, url: &Url) -> bool {
        self.entry_path(url).is_file()
    }

    /// Writes a payload, replacing any previous entry for the URL.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn put(&self, url: &Url, bytes: &[u8]) -> CacheResult<()> {
        let path = self.entry_path(url);
        let _guard = self.writes.lock();

        let replaced = fs::metadata(&path).ok().map(|meta| meta.len());

        let mut temp_file = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;
        temp_file
            .write_all(bytes)
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::IoError(format!("Failed to persist cache file: {}", e.error)))?;

        match replaced {
            Some(old_size) => {
                self.current_size.fetch_sub(old_size, Ordering::Relaxed);
            }
            None => {
                self.item_count.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.current_size
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);

        debug!(url = %url, path = %path.display(), size = bytes.len(), "Stored on disk");

        self.cleanup_if_needed(Some(&path));
        Ok(())
    }

    /// Removes the entry for a URL.
    pub fn evict(&self, url: &Url) {
        let _guard = self.writes.lock();
        if self.remove_file(&self.entry_path(url)) {
            debug!(url = %url, "Evicted from disk store");
        }
    }

    /// Removes every entry.
    ///
    /// # Errors
    /// Returns error if the directory cannot be read.
    pub fn clear(&self) -> CacheResult<()> {
        let _guard = self.writes.lock();
        let entries = fs::read_dir(&self.cache_dir)
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if is_entry(&path) && fs::remove_file(&path).is_err() {
                warn!(path = %path.display(), "Failed to remove cache file");
            }
        }
        self.current_size.store(0, Ordering::Relaxed);
        self.item_count.store(0, Ordering::Relaxed);
        debug!("Cleared disk byte store");
        Ok(())
    }

    /// Returns the current store size in bytes.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Returns the number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Caller holds `writes`.
    fn remove_file(&self, path: &Path) -> bool {
        let Ok(meta) = fs::metadata(path) else {
            return false;
        };
        match fs::remove_file(path) {
            Ok(()) => {
                self.current_size.fetch_sub(meta.len(), Ordering::Relaxed);
                self.item_count.fetch_sub(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to remove cache file");
                }
                false
            }
        }
    }

    /// Drops the least recently used files until the store is 10% under its
    /// limit. The file just written is never a candidate. Caller holds
    /// `writes` once the store is shared.
    fn cleanup_if_needed(&self, keep: Option<&Path>) {
        let current_size = self.current_size();
        if current_size <= self.max_size {
            return;
        }

        debug!(current_size, max_size = self.max_size, "Disk store over limit, cleaning up");

        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return;
        };

        let mut files: Vec<(PathBuf, SystemTime, u64)> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if !is_entry(&path) || keep.is_some_and(|keep| keep == path.as_path()) {
                    return None;
                }
                let meta = entry.metadata().ok()?;
                let used = meta
                    .accessed()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((path, used, meta.len()))
            })
            .collect();

        files.sort_by_key(|(_, time, _)| *time);

        let target = current_size - self.max_size + (self.max_size / 10);
        let mut freed_size = 0u64;
        let mut freed_count = 0usize;

        for (path, _, size) in files {
            if freed_size >= target {
                break;
            }
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
            } else {
                trace!(path = %path.display(), "Removed old cache file");
                freed_size += size;
                freed_count += 1;
            }
        }
        self.current_size.fetch_sub(freed_size, Ordering::Relaxed);
        self.item_count.fetch_sub(freed_count, Ordering::Relaxed);

        debug!(freed_size, freed_count, "Disk store cleanup complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use tempfile::TempDir;

    fn create_test_store(max_size: u64) -> (DiskByteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskByteStore::new(temp_dir.path().to_path_buf(), max_size).unwrap();
        (store, temp_dir)
    }

    fn url(name: &str) -> Url {
        Url::parse(&format!("https://live.staticflickr.com/65535/{name}_b.jpg")).unwrap()
    }

    fn entry_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|entry| is_entry(&entry.path()))
            .count()
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp) = create_test_store(1024 * 1024);

        store.put(&url("a"), b"\x89PNG\r\n\x1a\n").unwrap();

        assert_eq!(store.get(&url("a")).unwrap().as_ref(), b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = DiskByteStore::new(temp_dir.path().to_path_buf(), 1024).unwrap();
            store.put(&url("a"), b"BM").unwrap();
            store.put(&url("b"), b"\xFF\xD8\xFF").unwrap();
        }

        let store = DiskByteStore::new(temp_dir.path().to_path_buf(), 1024).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_size(), 5);
        assert_eq!(store.get(&url("a")).unwrap().as_ref(), b"BM");
    }

    #[test]
    fn test_replacing_keeps_one_file() {
        let (store, temp) = create_test_store(1024);

        store.put(&url("a"), b"first").unwrap();
        store.put(&url("a"), b"BM").unwrap();

        assert_eq!(store.get(&url("a")).unwrap().as_ref(), b"BM");
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_size(), 2);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_writes_to_one_url_keep_counters_exact() {
        let (store, temp) = create_test_store(1024 * 1024);
        let payload = b"\xFF\xD8\xFF\xE0 jpeg";
        let writers = 8;

        for _ in 0..50 {
            let barrier = Barrier::new(writers);
            std::thread::scope(|scope| {
                for _ in 0..writers {
                    scope.spawn(|| {
                        barrier.wait();
                        store.put(&url("shared"), payload).unwrap();
                    });
                }
            });

            assert_eq!(entry_files(temp.path()), 1);
            assert_eq!(store.len(), 1);
            assert_eq!(store.current_size(), payload.len() as u64);
        }
    }

    #[test]
    fn test_miss() {
        let (store, _temp) = create_test_store(1024);
        assert!(store.get(&url("missing")).is_none());
        assert!(!store.contains(&url("missing")));
    }

    #[test]
    fn test_evict() {
        let (store, _temp) = create_test_store(1024);

        store.put(&url("a"), b"test").unwrap();
        assert!(store.contains(&url("a")));

        store.evict(&url("a"));
        assert!(!store.contains(&url("a")));
        assert!(store.is_empty());

        store.evict(&url("a"));
        assert_eq!(store.current_size(), 0);
    }

    #[test]
    fn test_counters() {
        let (store, _temp) = create_test_store(1024 * 1024);

        store.put(&url("1"), b"hello").unwrap();
        store.put(&url("2"), b"world!").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_size(), 11);

        store.put(&url("1"), b"hey").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_size(), 9);

        store.evict(&url("2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_size(), 3);

        store.clear().unwrap();
        assert_eq!(store.len(), 0);
        assert_eq!(store.current_size(), 0);
    }

    #[test]
    fn test_cleanup_keeps_newest_entry() {
        let (store, _temp) = create_test_store(10);

        store.put(&url("old"), b"123456").unwrap();
        store.put(&url("new"), b"654321").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.current_size(), 6);
        assert!(store.contains(&url("new")));
        assert!(!store.contains(&url("old")));
    }
}
