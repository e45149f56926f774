//! Response DTOs for the image cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{CacheStats, ImageMap, ImageRecord, PropertyId};
use crate::loader::{LoadReport, Resolution};

/// Response body for a single-property read (GET /images/:id)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesResponse {
    pub property_id: PropertyId,
    pub images: Vec<ImageRecord>,
}

impl ImagesResponse {
    pub fn new(property_id: PropertyId, images: Vec<ImageRecord>) -> Self {
        Self {
            property_id,
            images,
        }
    }
}

/// Response body for explicit cache population (PUT /images/:id)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    pub property_id: PropertyId,
    pub count: usize,
}

impl StoreResponse {
    pub fn new(property_id: PropertyId, count: usize) -> Self {
        Self {
            message: format!("Cached {} images for property {}", count, property_id),
            property_id,
            count,
        }
    }
}

/// Response body for batch reads (POST /images/cached)
///
/// Keys are serialized as decimal strings, ordered by id.
#[derive(Debug, Clone, Serialize)]
pub struct ImageMapResponse {
    pub images: BTreeMap<PropertyId, Vec<ImageRecord>>,
}

impl ImageMapResponse {
    pub fn new(images: ImageMap) -> Self {
        Self {
            images: images.into_iter().collect(),
        }
    }
}

/// How the ids of a load were resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub hits: usize,
    pub fetched: usize,
    pub empty: usize,
    pub failed: usize,
    pub batches: usize,
}

/// Response body for read-through loads (POST /images/load)
#[derive(Debug, Clone, Serialize)]
pub struct LoadResponse {
    pub images: BTreeMap<PropertyId, Vec<ImageRecord>>,
    pub summary: LoadSummary,
}

impl From<LoadReport> for LoadResponse {
    fn from(report: LoadReport) -> Self {
        let summary = LoadSummary {
            hits: report.count(Resolution::Hit),
            fetched: report.count(Resolution::Fetched),
            empty: report.count(Resolution::Empty),
            failed: report.count(Resolution::Failed),
            batches: report.batches,
        };
        Self {
            images: report.images.into_iter().collect(),
            summary,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
