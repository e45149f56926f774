//! Cache Module
//!
//! Persisted property-image cache with pull-based TTL expiry.

mod clock;
mod entry;
mod image;
mod stats;
mod storage;
mod store;

#[cfg(test)]
mod property_tests;

use std::collections::HashMap;
use std::time::Duration;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use image::{ImageRecord, PropertyId};
pub use stats::CacheStats;
pub use storage::{BlobStorage, FileBlobStorage, MemoryBlobStorage, STORAGE_KEY};
pub use store::CacheStore;

/// Images per property, as returned to callers.
pub type ImageMap = HashMap<PropertyId, Vec<ImageRecord>>;

// == Public Constants ==
/// Default entry time-to-live
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
