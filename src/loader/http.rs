//! HTTP Listing Source
//!
//! Fetches image listings from the marketplace REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::cache::PropertyId;
use crate::error::{ImageCacheError, Result};
use crate::loader::{ImageListing, ImageSource};

/// `ImageSource` backed by `GET {base_url}/properties/{id}/images`.
///
/// A 404 means the property has no image folder and yields a missing
/// listing. Any other non-success status is a fetch error.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
    base_url: String,
}

impl HttpImageSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn listing_url(&self, property_id: PropertyId) -> String {
        format!("{}/properties/{}/images", self.base_url, property_id)
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn list_images(&self, property_id: PropertyId) -> Result<ImageListing> {
        let url = self.listing_url(property_id);
        debug!("Fetching image listing from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(ImageListing::missing());
        }
        if !status.is_success() {
            return Err(ImageCacheError::Fetch(format!(
                "listing for property {} returned {}",
                property_id, status
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_trims_trailing_slash() {
        let source = HttpImageSource::with_client(Client::new(), "http://api.test/v1/");
        assert_eq!(
            source.listing_url(9),
            "http://api.test/v1/properties/9/images"
        );
    }
}
