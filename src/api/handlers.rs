//! API Handlers
//!
//! HTTP request handlers for each image cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::{CacheStore, PropertyId};
use crate::config::Config;
use crate::error::{ImageCacheError, Result};
use crate::loader::{BatchLoader, LoadOptions};
use crate::models::{
    CachedImagesRequest, HealthResponse, ImageMapResponse, ImagesResponse, LoadImagesRequest,
    LoadResponse, StatsResponse, StoreImagesRequest, StoreResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loader owning the shared cache store
    pub loader: Arc<BatchLoader>,
    /// Pacing used when a load request does not override it
    pub load_defaults: LoadOptions,
}

impl AppState {
    /// Creates a new AppState around `loader`.
    pub fn new(loader: BatchLoader, load_defaults: LoadOptions) -> Self {
        Self {
            loader: Arc::new(loader),
            load_defaults,
        }
    }

    /// Creates a new AppState using the loader settings in `config`.
    pub fn from_config(loader: BatchLoader, config: &Config) -> Self {
        Self::new(loader, config.load_options())
    }

    pub fn store(&self) -> &CacheStore {
        self.loader.store()
    }
}

/// Handler for GET /images/:id
///
/// Returns the cached images of one property, or 404 without a live entry.
pub async fn get_images_handler(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
) -> Result<Json<ImagesResponse>> {
    let images = state
        .store()
        .get(property_id)
        .ok_or(ImageCacheError::NotFound(property_id))?;

    Ok(Json(ImagesResponse::new(property_id, images)))
}

/// Handler for PUT /images/:id
///
/// Backfills the cache with images obtained elsewhere.
pub async fn store_images_handler(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    Json(req): Json<StoreImagesRequest>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate(property_id) {
        return Err(ImageCacheError::InvalidRequest(error_msg));
    }

    let count = req.images.len();
    state.store().put(property_id, req.images);

    Ok(Json(StoreResponse::new(property_id, count)))
}

/// Handler for POST /images/cached
///
/// Returns the live entries among the requested ids; misses are omitted.
pub async fn cached_images_handler(
    State(state): State<AppState>,
    Json(req): Json<CachedImagesRequest>,
) -> Result<Json<ImageMapResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ImageCacheError::InvalidRequest(error_msg));
    }

    let images = state.store().get_many(&req.ids);
    Ok(Json(ImageMapResponse::new(images)))
}

/// Handler for POST /images/load
///
/// Resolves every requested id through the cache, fetching misses. The load
/// runs on its own task so it still fills the cache if the client goes away.
pub async fn load_images_handler(
    State(state): State<AppState>,
    Json(req): Json<LoadImagesRequest>,
) -> Result<Json<LoadResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ImageCacheError::InvalidRequest(error_msg));
    }

    let options = req.options(&state.load_defaults);
    debug!("Loading images for {} properties", req.ids.len());

    let loader = state.loader.clone();
    let report = tokio::spawn(async move { loader.load_report(&req.ids, &options, &()).await })
        .await
        .map_err(|err| ImageCacheError::Internal(format!("load task failed: {err}")))?;

    Ok(Json(LoadResponse::from(report)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store().stats()))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::cache::{ImageRecord, MemoryBlobStorage, DEFAULT_TTL};
    use crate::loader::{FileDescriptor, ImageLayout, ImageListing, ImageSource};

    /// Every property has a single image.
    struct OneImageSource;

    #[async_trait]
    impl ImageSource for OneImageSource {
        async fn list_images(&self, _property_id: PropertyId) -> Result<ImageListing> {
            Ok(ImageListing::with_files(vec![FileDescriptor::new("cover.jpg")]))
        }
    }

    fn test_state() -> AppState {
        let store = Arc::new(CacheStore::new(Arc::new(MemoryBlobStorage::new()), DEFAULT_TTL));
        let loader = BatchLoader::new(store, Arc::new(OneImageSource), ImageLayout::default());
        AppState::new(loader, LoadOptions::default())
    }

    fn image(property_id: PropertyId) -> ImageRecord {
        ImageRecord {
            id: 1,
            resource_id: property_id,
            path: format!("properties/{property_id}/a.jpg"),
            url: format!("/uploads/properties/{property_id}/a.jpg"),
            is_primary: true,
            last_modified: None,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_handler() {
        let state = test_state();

        let req = StoreImagesRequest {
            images: vec![image(3)],
        };
        let result = store_images_handler(State(state.clone()), Path(3), Json(req)).await;
        assert!(result.is_ok());

        let response = get_images_handler(State(state), Path(3)).await.unwrap();
        assert_eq!(response.property_id, 3);
        assert_eq!(response.images.len(), 1);
    }

    #[tokio::test]
    async fn test_get_uncached_property() {
        let state = test_state();

        let result = get_images_handler(State(state), Path(99)).await;
        assert!(matches!(result, Err(ImageCacheError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_store_rejects_foreign_records() {
        let state = test_state();

        let req = StoreImagesRequest {
            images: vec![image(4)],
        };
        let result = store_images_handler(State(state), Path(5), Json(req)).await;
        assert!(matches!(result, Err(ImageCacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_load_then_cached_handler() {
        let state = test_state();

        let req = LoadImagesRequest {
            ids: vec![1, 2],
            batch_size: None,
            inter_batch_delay_ms: Some(0),
        };
        let response = load_images_handler(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(response.summary.fetched, 2);

        let req = CachedImagesRequest { ids: vec![1, 2, 3] };
        let response = cached_images_handler(State(state), Json(req)).await.unwrap();
        assert_eq!(response.images.len(), 2);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
