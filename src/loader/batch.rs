//! Batch Loader Module
//!
//! Resolves property ids to images: cache hits first, then paced batches of
//! concurrent fetches for the misses, written back to the cache.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, ImageMap, ImageRecord, PropertyId};
use crate::loader::{ImageLayout, ImageSource, LoadEvent, LoadObserver};

// == Load Options ==
/// Pacing of remote fetches for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum concurrent fetches per batch; 0 is treated as 1
    pub batch_size: usize,
    /// Pause between the end of one batch and the start of the next
    pub inter_batch_delay: Duration,
    /// Log progress at info level as misses resolve
    pub show_progress_indicator: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            inter_batch_delay: Duration::from_millis(300),
            show_progress_indicator: false,
        }
    }
}

// == Resolution ==
/// How a requested id was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Served from a live cache entry
    Hit,
    /// Fetched with at least one image and cached
    Fetched,
    /// Fetched with no images; cached as empty
    Empty,
    /// Fetch failed; reported as empty and not cached
    Failed,
}

// == Load Report ==
/// Result of a load with per-id detail.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// One entry per distinct requested id
    pub images: ImageMap,
    pub resolutions: HashMap<PropertyId, Resolution>,
    /// Fetch batches issued
    pub batches: usize,
}

impl LoadReport {
    /// Number of ids resolved as `resolution`.
    pub fn count(&self, resolution: Resolution) -> usize {
        self.resolutions
            .values()
            .filter(|r| **r == resolution)
            .count()
    }

    fn insert(&mut self, property_id: PropertyId, resolution: Resolution, images: Vec<ImageRecord>) {
        self.images.insert(property_id, images);
        self.resolutions.insert(property_id, resolution);
    }
}

// == Batch Loader ==
/// Read-through loader over a `CacheStore` and a remote `ImageSource`.
///
/// Never fails: fetch errors become empty results that stay uncached so the
/// next load retries them.
pub struct BatchLoader {
    store: Arc<CacheStore>,
    source: Arc<dyn ImageSource>,
    layout: ImageLayout,
}

impl BatchLoader {
    pub fn new(store: Arc<CacheStore>, source: Arc<dyn ImageSource>, layout: ImageLayout) -> Self {
        Self {
            store,
            source,
            layout,
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    // == Load ==
    /// Resolves every id in `property_ids` to its images.
    ///
    /// The returned map holds exactly one entry per distinct id. Failed and
    /// empty fetches both appear as empty lists; use `load_report` to tell
    /// them apart.
    pub async fn load(
        &self,
        property_ids: &[PropertyId],
        options: &LoadOptions,
        observer: &dyn LoadObserver,
    ) -> ImageMap {
        self.load_report(property_ids, options, observer).await.images
    }

    /// Like `load`, also reporting how each id was resolved.
    pub async fn load_report(
        &self,
        property_ids: &[PropertyId],
        options: &LoadOptions,
        observer: &dyn LoadObserver,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        let ids = distinct(property_ids);
        if ids.is_empty() {
            observer.on_complete(&report.images);
            return report;
        }

        let hits = self.cached(ids.clone()).await;
        let misses: Vec<PropertyId> = ids
            .iter()
            .copied()
            .filter(|id| !hits.contains_key(id))
            .collect();
        for (property_id, images) in hits {
            report.insert(property_id, Resolution::Hit, images);
        }

        if misses.is_empty() {
            debug!("All {} properties served from image cache", ids.len());
            observer.on_complete(&report.images);
            return report;
        }

        let total = misses.len();
        let resolved = AtomicUsize::new(0);
        for (index, batch) in misses.chunks(options.batch_size.max(1)).enumerate() {
            if index > 0 {
                tokio::time::sleep(options.inter_batch_delay).await;
            }

            let outcomes = join_all(
                batch
                    .iter()
                    .map(|&id| self.resolve(id, &resolved, total, options, observer)),
            )
            .await;

            for (property_id, resolution, images) in outcomes {
                report.insert(property_id, resolution, images);
            }
            report.batches += 1;
        }

        info!(
            "Loaded images for {} properties: hits={}, fetched={}, empty={}, failed={}, batches={}",
            ids.len(),
            report.count(Resolution::Hit),
            report.count(Resolution::Fetched),
            report.count(Resolution::Empty),
            report.count(Resolution::Failed),
            report.batches
        );
        observer.on_complete(&report.images);
        report
    }

    /// Fetches one id, writes the outcome back and reports progress.
    async fn resolve(
        &self,
        property_id: PropertyId,
        resolved: &AtomicUsize,
        total: usize,
        options: &LoadOptions,
        observer: &dyn LoadObserver,
    ) -> (PropertyId, Resolution, Vec<ImageRecord>) {
        let (resolution, images) = match self.source.list_images(property_id).await {
            Ok(listing) if listing.is_empty() => {
                self.store_result(property_id, Vec::new()).await;
                (Resolution::Empty, Vec::new())
            }
            Ok(listing) => {
                let records = self.layout.records(property_id, &listing);
                self.store_result(property_id, records.clone()).await;
                (Resolution::Fetched, records)
            }
            Err(err) => {
                warn!("Failed to fetch images for property {}: {}", property_id, err);
                (Resolution::Failed, Vec::new())
            }
        };

        let done = resolved.fetch_add(1, Ordering::SeqCst) + 1;
        let fraction = done as f64 / total as f64;
        if options.show_progress_indicator {
            info!("Loading property images: {}/{} ({:.0}%)", done, total, fraction * 100.0);
        }
        observer.on_progress(fraction);

        (property_id, resolution, images)
    }

    /// Batch cache read, run on the blocking pool since the store does file I/O.
    async fn cached(&self, property_ids: Vec<PropertyId>) -> ImageMap {
        let store = Arc::clone(&self.store);
        match task::spawn_blocking(move || store.get_many(&property_ids)).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!("Image cache lookup task failed: {}", err);
                ImageMap::new()
            }
        }
    }

    /// Cache write, run on the blocking pool.
    async fn store_result(&self, property_id: PropertyId, images: Vec<ImageRecord>) {
        let store = Arc::clone(&self.store);
        if let Err(err) = task::spawn_blocking(move || store.put(property_id, images)).await {
            warn!("Image cache write task for property {} failed: {}", property_id, err);
        }
    }

    // == Spawn Load ==
    /// Runs a load on its own task.
    ///
    /// The load keeps running and filling the cache if the caller drops the
    /// handle or the receiver; events sent after that are discarded.
    pub fn spawn_load(
        self: &Arc<Self>,
        property_ids: Vec<PropertyId>,
        options: LoadOptions,
    ) -> (JoinHandle<ImageMap>, UnboundedReceiver<LoadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Arc::clone(self);
        let handle = tokio::spawn(async move { loader.load(&property_ids, &options, &tx).await });
        (handle, rx)
    }
}

/// Drops repeated ids, keeping first occurrences in order.
fn distinct(property_ids: &[PropertyId]) -> Vec<PropertyId> {
    let mut seen = HashSet::with_capacity(property_ids.len());
    property_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}
