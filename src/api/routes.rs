//! API Routes
//!
//! Configures the Axum router with all image cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cached_images_handler, get_images_handler, health_handler, load_images_handler,
    stats_handler, store_images_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /images/:id` - Cached images of one property
/// - `PUT /images/:id` - Backfill the cache for one property
/// - `POST /images/cached` - Cached images of several properties, misses omitted
/// - `POST /images/load` - Read-through load with remote backfill
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (browser frontends call this directly)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/images/:id",
            get(get_images_handler).put(store_images_handler),
        )
        .route("/images/cached", post(cached_images_handler))
        .route("/images/load", post(load_images_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::cache::{CacheStore, MemoryBlobStorage, DEFAULT_TTL};
    use crate::loader::{BatchLoader, HttpImageSource, ImageLayout, LoadOptions};

    fn create_test_app() -> Router {
        let store = Arc::new(CacheStore::new(Arc::new(MemoryBlobStorage::new()), DEFAULT_TTL));
        let source = HttpImageSource::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
        let loader = BatchLoader::new(store, Arc::new(source), ImageLayout::default());
        create_router(AppState::new(loader, LoadOptions::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/images/8")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"images":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/images/12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/images/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
