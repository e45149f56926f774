//! API Module
//!
//! HTTP handlers and routing for the image cache REST API.
//!
//! # Endpoints
//! - `GET /images/:id` - Cached images of one property
//! - `PUT /images/:id` - Backfill the cache for one property
//! - `POST /images/cached` - Batch cache read
//! - `POST /images/load` - Read-through load
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
