//! Cache Store Module
//!
//! TTL-bounded mapping from property id to its image list, persisted as a
//! single JSON blob.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::stats::StatsCounters;
use crate::cache::{
    BlobStorage, CacheEntry, CacheStats, Clock, ImageMap, ImageRecord, PropertyId, SystemClock,
    STORAGE_KEY,
};
use crate::error::Result;

/// Persisted layout: decimal property id -> entry.
type Mapping = BTreeMap<String, CacheEntry>;

// == Cache Store ==
/// Read-through image cache with time-based expiry.
///
/// Nothing is held in memory between calls: every read re-parses the blob and
/// every write replaces it. Storage failures never reach the caller; a failed
/// read behaves like an empty cache and a failed write is logged and dropped.
///
/// Read-modify-write cycles (`put`, `sweep_expired`) hold `write_lock`, so
/// concurrent writers for different ids never drop each other's entries.
pub struct CacheStore {
    storage: Arc<dyn BlobStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    stats: StatsCounters,
    write_lock: Mutex<()>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store over `storage` using wall-clock time.
    pub fn new(storage: Arc<dyn BlobStorage>, ttl: Duration) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            ttl,
            stats: StatsCounters::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a store and drops entries that expired while the process was down.
    pub fn open(storage: Arc<dyn BlobStorage>, ttl: Duration) -> Self {
        let store = Self::new(storage, ttl);
        let removed = store.sweep_expired();
        info!("Image cache opened, swept {} expired entries", removed);
        store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Put ==
    /// Overwrites the entry for `property_id`, stamping it with the current time.
    ///
    /// An empty `images` list records a confirmed "no images" result.
    pub fn put(&self, property_id: PropertyId, images: Vec<ImageRecord>) {
        let _guard = self.lock_writes();
        let mut mapping = self.read_mapping();
        let count = images.len();
        mapping.insert(
            property_id.to_string(),
            CacheEntry::new(images, self.clock.now_ms()),
        );

        match self.write_mapping(&mapping) {
            Ok(()) => {
                self.stats.record_write();
                debug!("Cached {} images for property {}", count, property_id);
            }
            Err(err) => {
                self.stats.record_write_failure();
                warn!("Failed to cache images for property {}: {}", property_id, err);
            }
        }
    }

    // == Get ==
    /// Returns the cached images if a live entry exists.
    ///
    /// Expired and never-written entries are both reported as `None`.
    pub fn get(&self, property_id: PropertyId) -> Option<Vec<ImageRecord>> {
        let now = self.clock.now_ms();
        let images = self
            .read_mapping()
            .remove(&property_id.to_string())
            .filter(|entry| entry.is_live(now, self.ttl))
            .map(|entry| entry.images);

        if images.is_some() {
            self.stats.record_hits(1);
        } else {
            self.stats.record_misses(1);
        }
        images
    }

    // == Get Many ==
    /// Returns the live entries among `property_ids`; the rest are omitted.
    pub fn get_many(&self, property_ids: &[PropertyId]) -> ImageMap {
        if property_ids.is_empty() {
            return ImageMap::new();
        }

        let now = self.clock.now_ms();
        let mut mapping = self.read_mapping();
        let mut found = ImageMap::with_capacity(property_ids.len());
        let mut seen = HashSet::with_capacity(property_ids.len());
        let mut misses = 0;

        for &property_id in property_ids {
            if !seen.insert(property_id) {
                continue;
            }
            match mapping.remove(&property_id.to_string()) {
                Some(entry) if entry.is_live(now, self.ttl) => {
                    found.insert(property_id, entry.images);
                }
                _ => misses += 1,
            }
        }

        self.stats.record_hits(found.len() as u64);
        self.stats.record_misses(misses);
        found
    }

    // == Sweep Expired ==
    /// Removes every expired entry in one pass.
    ///
    /// The blob is rewritten only when something was removed. Returns the
    /// number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let _guard = self.lock_writes();
        let now = self.clock.now_ms();
        let mut mapping = self.read_mapping();
        let before = mapping.len();
        mapping.retain(|_, entry| entry.is_live(now, self.ttl));
        let removed = before - mapping.len();

        if removed > 0 {
            if let Err(err) = self.write_mapping(&mapping) {
                self.stats.record_write_failure();
                warn!("Failed to persist swept image cache: {}", err);
                return 0;
            }
            self.stats.record_swept(removed as u64);
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of persisted entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.read_mapping().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panic while holding the lock leaves the blob intact, so poisoning is ignored.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_mapping(&self) -> Mapping {
        match self.try_read_mapping() {
            Ok(mapping) => mapping,
            Err(err) => {
                self.stats.record_read_failure();
                warn!("Image cache unreadable, treating as empty: {}", err);
                Mapping::new()
            }
        }
    }

    fn try_read_mapping(&self) -> Result<Mapping> {
        match self.storage.read_blob(STORAGE_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Mapping::new()),
        }
    }

    fn write_mapping(&self, mapping: &Mapping) -> Result<()> {
        let blob = serde_json::to_string(mapping)?;
        self.storage.write_blob(STORAGE_KEY, &blob)
    }
}
