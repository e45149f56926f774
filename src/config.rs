//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::loader::{ImageLayout, LoadOptions};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted cache blob
    pub cache_dir: PathBuf,
    /// Entry time-to-live in seconds
    pub cache_ttl: u64,
    /// Maximum ids fetched concurrently per batch
    pub batch_size: usize,
    /// Pause between consecutive fetch batches in milliseconds
    pub inter_batch_delay_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the remote image listing API
    pub listing_base_url: String,
    /// Prefix under which image paths are served
    pub upload_prefix: String,
    /// Static path segment grouping property images
    pub image_segment: String,
    /// Per-request timeout for listing fetches in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Cache blob directory (default: ./data)
    /// - `CACHE_TTL` - Entry TTL in seconds (default: 1800)
    /// - `BATCH_SIZE` - Fetch batch size (default: 5)
    /// - `INTER_BATCH_DELAY_MS` - Delay between batches (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `LISTING_BASE_URL` - Remote listing API (default: http://localhost:8080/api)
    /// - `UPLOAD_PREFIX` - Static upload prefix (default: /uploads)
    /// - `IMAGE_SEGMENT` - Image path segment (default: properties)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            batch_size: parse_var("BATCH_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.batch_size),
            inter_batch_delay_ms: parse_var("INTER_BATCH_DELAY_MS")
                .unwrap_or(defaults.inter_batch_delay_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            listing_base_url: env::var("LISTING_BASE_URL").unwrap_or(defaults.listing_base_url),
            upload_prefix: env::var("UPLOAD_PREFIX").unwrap_or(defaults.upload_prefix),
            image_segment: env::var("IMAGE_SEGMENT").unwrap_or(defaults.image_segment),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
        }
    }

    /// Entry time-to-live as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Default options for loads issued by this service.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            batch_size: self.batch_size,
            inter_batch_delay: Duration::from_millis(self.inter_batch_delay_ms),
            show_progress_indicator: false,
        }
    }

    /// Path layout applied to fetched listings.
    pub fn image_layout(&self) -> ImageLayout {
        ImageLayout::new(self.image_segment.clone(), self.upload_prefix.clone())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data"),
            cache_ttl: 1800,
            batch_size: 5,
            inter_batch_delay_ms: 300,
            server_port: 3000,
            listing_base_url: "http://localhost:8080/api".to_string(),
            upload_prefix: "/uploads".to_string(),
            image_segment: "properties".to_string(),
            fetch_timeout: 10,
        }
    }
}
