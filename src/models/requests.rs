//! Request DTOs for the image cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::cache::{ImageRecord, PropertyId};
use crate::loader::LoadOptions;

/// Maximum property ids accepted in one request
pub const MAX_IDS_PER_REQUEST: usize = 500;

fn validate_ids(ids: &[PropertyId]) -> Option<String> {
    if ids.len() > MAX_IDS_PER_REQUEST {
        return Some(format!(
            "At most {} ids may be requested at once",
            MAX_IDS_PER_REQUEST
        ));
    }
    None
}

/// Request body for explicit cache population (PUT /images/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreImagesRequest {
    /// Images in display order; empty records "no images"
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl StoreImagesRequest {
    /// Validates the request data against the property in the path
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, property_id: PropertyId) -> Option<String> {
        self.images
            .iter()
            .find(|image| image.resource_id != property_id)
            .map(|image| {
                format!(
                    "Image {} belongs to property {}, not {}",
                    image.id, image.resource_id, property_id
                )
            })
    }
}

/// Request body for batch cache reads (POST /images/cached)
#[derive(Debug, Clone, Deserialize)]
pub struct CachedImagesRequest {
    pub ids: Vec<PropertyId>,
}

impl CachedImagesRequest {
    pub fn validate(&self) -> Option<String> {
        validate_ids(&self.ids)
    }
}

/// Request body for read-through loads (POST /images/load)
///
/// Omitted pacing fields fall back to the service defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadImagesRequest {
    pub ids: Vec<PropertyId>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub inter_batch_delay_ms: Option<u64>,
}

impl LoadImagesRequest {
    pub fn validate(&self) -> Option<String> {
        if self.batch_size == Some(0) {
            return Some("batchSize must be at least 1".to_string());
        }
        validate_ids(&self.ids)
    }

    /// Applies the request's pacing overrides to `defaults`.
    pub fn options(&self, defaults: &LoadOptions) -> LoadOptions {
        LoadOptions {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            inter_batch_delay: self
                .inter_batch_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.inter_batch_delay),
            show_progress_indicator: defaults.show_progress_indicator,
        }
    }
}
