//! Listing Source Module
//!
//! The remote image listing consumed by the loader, and the mapping from a
//! listing to `ImageRecord`s.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::cache::{ImageRecord, PropertyId};
use crate::error::Result;

// == Listing ==
/// One file in a property's image folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_modified: None,
        }
    }
}

/// Response of the listing source for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageListing {
    /// False when the property has no image folder at all
    pub exists: bool,
    /// Files in display order
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

impl ImageListing {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn with_files(files: Vec<FileDescriptor>) -> Self {
        Self {
            exists: true,
            files,
        }
    }

    /// True when the listing resolves to no images.
    pub fn is_empty(&self) -> bool {
        !self.exists || self.files.is_empty()
    }
}

/// Remote source of image listings.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Lists the images of one property.
    ///
    /// A property without images is `Ok` with an empty or missing listing;
    /// `Err` is reserved for failures worth retrying.
    async fn list_images(&self, property_id: PropertyId) -> Result<ImageListing>;
}

// == Image Layout ==
/// Where listed files live relative to the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    segment: String,
    upload_prefix: String,
}

impl ImageLayout {
    pub fn new(segment: impl Into<String>, upload_prefix: impl Into<String>) -> Self {
        Self {
            segment: segment.into().trim_matches('/').to_string(),
            upload_prefix: upload_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Relative storage path of `file_name`.
    pub fn path_for(&self, property_id: PropertyId, file_name: &str) -> String {
        let file_name = file_name.trim_start_matches('/');
        if self.segment.is_empty() {
            format!("{property_id}/{file_name}")
        } else {
            format!("{}/{property_id}/{file_name}", self.segment)
        }
    }

    /// Display URL of a relative storage path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.upload_prefix, path)
    }

    /// Builds ordered records from a listing; the first one is primary.
    pub fn records(&self, property_id: PropertyId, listing: &ImageListing) -> Vec<ImageRecord> {
        if !listing.exists {
            return Vec::new();
        }

        listing
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                let path = self.path_for(property_id, &file.name);
                ImageRecord {
                    id: index as u32 + 1,
                    resource_id: property_id,
                    url: self.url_for(&path),
                    path,
                    is_primary: index == 0,
                    last_modified: file.last_modified,
                }
            })
            .collect()
    }
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self::new("properties", "/uploads")
    }
}
