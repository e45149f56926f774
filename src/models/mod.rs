//! Request and Response models for the image cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CachedImagesRequest, LoadImagesRequest, StoreImagesRequest, MAX_IDS_PER_REQUEST,
};
pub use responses::{
    HealthResponse, ImageMapResponse, ImagesResponse, LoadResponse, LoadSummary, StatsResponse,
    StoreResponse,
};
