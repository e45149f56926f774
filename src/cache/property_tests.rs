//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry and batch-read behavior over arbitrary
//! write histories.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, ImageRecord, ManualClock, MemoryBlobStorage, PropertyId};

// == Test Configuration ==
const TTL: Duration = Duration::from_secs(30 * 60);
const TTL_MS: u64 = 30 * 60 * 1000;
const T0: u64 = 1_700_000_000_000;

fn images_for(property_id: PropertyId, count: usize) -> Vec<ImageRecord> {
    (0..count)
        .map(|index| {
            let path = format!("properties/{property_id}/{index}.jpg");
            ImageRecord {
                id: index as u32 + 1,
                resource_id: property_id,
                url: format!("/uploads/{path}"),
                path,
                is_primary: index == 0,
                last_modified: None,
            }
        })
        .collect()
}

fn test_store() -> (CacheStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let store = CacheStore::new(Arc::new(MemoryBlobStorage::new()), TTL).with_clock(clock.clone());
    (store, clock)
}

// == Strategies ==
/// A write: (property id, image count, minutes after T0)
fn write_strategy() -> impl Strategy<Value = (PropertyId, usize, u64)> {
    (0u64..20, 0usize..4, 0u64..90)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // An entry written at T is a hit strictly before T + TTL and a miss from then on.
    #[test]
    fn prop_expiry_boundary(
        property_id in 0u64..1000,
        count in 0usize..5,
        offset_ms in 0u64..(2 * TTL_MS),
    ) {
        let (store, clock) = test_store();
        store.put(property_id, images_for(property_id, count));

        clock.set(T0 + offset_ms);
        let found = store.get(property_id);

        if offset_ms < TTL_MS {
            prop_assert_eq!(found.map(|images| images.len()), Some(count));
        } else {
            prop_assert!(found.is_none());
        }
    }

    // get_many returns exactly the requested ids whose latest write is still live,
    // with the payload of that latest write.
    #[test]
    fn prop_get_many_matches_latest_live_writes(
        writes in prop::collection::vec(write_strategy(), 0..30),
        requested in prop::collection::vec(0u64..25, 0..25),
        read_minute in 0u64..120,
    ) {
        let (store, clock) = test_store();
        let mut sorted = writes.clone();
        sorted.sort_by_key(|(_, _, minute)| *minute);

        let mut latest: HashMap<PropertyId, (usize, u64)> = HashMap::new();
        for (property_id, count, minute) in sorted {
            clock.set(T0 + minute * 60_000);
            store.put(property_id, images_for(property_id, count));
            latest.insert(property_id, (count, minute));
        }

        let read_at = read_minute.max(writes.iter().map(|w| w.2).max().unwrap_or(0));
        clock.set(T0 + read_at * 60_000);
        let found = store.get_many(&requested);

        let requested_set: HashSet<PropertyId> = requested.iter().copied().collect();
        for property_id in &requested_set {
            let expected = latest
                .get(property_id)
                .filter(|(_, minute)| (read_at - minute) * 60_000 < TTL_MS)
                .map(|(count, _)| *count);
            prop_assert_eq!(found.get(property_id).map(|images| images.len()), expected);
        }
        prop_assert!(found.keys().all(|id| requested_set.contains(id)));
    }

    // After a sweep, every remaining entry is live and every live entry remains.
    #[test]
    fn prop_sweep_keeps_only_live_entries(
        writes in prop::collection::vec(write_strategy(), 1..30),
    ) {
        let (store, clock) = test_store();
        let mut sorted = writes.clone();
        sorted.sort_by_key(|(_, _, minute)| *minute);
        for (property_id, count, minute) in &sorted {
            clock.set(T0 + minute * 60_000);
            store.put(*property_id, images_for(*property_id, *count));
        }

        let ids: Vec<PropertyId> = (0..20).collect();
        let live_before = store.get_many(&ids);
        let total_before = store.len();

        let removed = store.sweep_expired();

        prop_assert_eq!(removed, total_before - live_before.len());
        prop_assert_eq!(store.len(), live_before.len());
        prop_assert_eq!(store.get_many(&ids), live_before);
    }
}
