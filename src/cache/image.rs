//! Image Record Module
//!
//! A single resolved image belonging to a property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property identifier used as the cache key.
pub type PropertyId = u64;

// == Image Record ==
/// One image of a property, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// 1-based position among the property's images
    pub id: u32,
    /// Owning property
    pub resource_id: PropertyId,
    /// Relative storage path
    pub path: String,
    /// Resolved display URL
    pub url: String,
    /// True only for the first image
    pub is_primary: bool,
    /// Last modification time reported by the listing source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ImageRecord {
            id: 1,
            resource_id: 42,
            path: "properties/42/front.jpg".to_string(),
            url: "/uploads/properties/42/front.jpg".to_string(),
            is_primary: true,
            last_modified: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["resourceId"], 42);
        assert_eq!(json["isPrimary"], true);
        assert!(json.get("lastModified").is_none());
    }

    #[test]
    fn test_record_deserializes_last_modified() {
        let json = r#"{
            "id": 2,
            "resourceId": 7,
            "path": "properties/7/b.png",
            "url": "/uploads/properties/7/b.png",
            "isPrimary": false,
            "lastModified": "2024-03-01T12:00:00Z"
        }"#;

        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 2);
        assert!(!record.is_primary);
        assert_eq!(
            record.last_modified.unwrap().to_rfc3339(),
            "2024-03-01T12:00:00+00:00"
        );
    }
}
