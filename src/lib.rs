//! Property Image Cache - read-through cache of property image listings
//!
//! Serves image lists from a persisted TTL cache and backfills misses from the
//! listing API in paced batches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;

pub use api::AppState;
pub use cache::{CacheStore, ImageMap, ImageRecord, PropertyId};
pub use config::Config;
pub use error::{ImageCacheError, Result};
pub use loader::{BatchLoader, LoadOptions, LoadReport};
