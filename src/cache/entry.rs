//! Cache Entry Module
//!
//! Defines the persisted entry for one property and its expiry check.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::ImageRecord;

// == Cache Entry ==
/// The outcome of one completed fetch for a property.
///
/// An empty `images` list is a confirmed "no images" result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Images in display order
    pub images: Vec<ImageRecord>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(images: Vec<ImageRecord>, now_ms: u64) -> Self {
        Self {
            timestamp: now_ms,
            images,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    ///
    /// Entries stamped in the future have age 0.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    // == Is Live ==
    /// Checks if the entry is still within its time-to-live.
    ///
    /// Boundary condition: an entry is expired once its age reaches the TTL,
    /// so a read at exactly `timestamp + ttl` is a miss.
    pub fn is_live(&self, now_ms: u64, ttl: Duration) -> bool {
        u128::from(self.age_ms(now_ms)) < ttl.as_millis()
    }
}
