//! Wire types shared with the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filters::FilterSet;

/// Longest name the backend accepts for presets and smart folders
pub const MAX_NAME_LEN: usize = 100;

/// A named, server-persisted filter set the user can re-apply
pub trait SavedSearch {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn filters(&self) -> &FilterSet;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub filters: FilterSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedSearch for Preset {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetCreate {
    pub name: String,
    pub filters: FilterSet,
}

/// Partial update. When filters are sent they replace the stored set whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
}

/// Sidebar folder backed by a saved filter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartFolder {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub filters: FilterSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedSearch for SmartFolder {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartFolderCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub filters: FilterSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmartFolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
}

/// `POST /bulk/update`. Only the fields that are set are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchUpdate {
    pub ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_improvement: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_tags: Option<Vec<String>>,
}

/// `POST /bulk/delete`. Without `permanent` the images go to the trash.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchDelete {
    pub ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub permanent: bool,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Gallery list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: Uuid,
    pub source_tool: String,
    #[serde(default)]
    pub model_type: Option<String>,
    pub thumbnail_path: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl ImageSummary {
    /// Browser path of the thumbnail, served by the backend's static mount
    pub fn thumbnail_url(&self) -> String {
        format!("/storage/{}", self.thumbnail_path.trim_start_matches('/'))
    }

    pub fn display_model(&self) -> &str {
        self.model_name.as_deref().unwrap_or("Unknown model")
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationEnvelope<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginationEnvelope<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page controls are pointless for a single page or an empty result
    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SortOrder;

    #[test]
    fn test_preset_from_server_json() {
        let json = r#"{
            "id": "0190b6c1-6c3e-7d2a-9a7c-2f8a4c1b9e10",
            "name": "Best portraits",
            "filters": {"exact_rating": 5, "orientation": "portrait", "sort_order": "asc"},
            "created_at": "2024-07-01T12:00:00Z",
            "updated_at": "2024-07-02T08:30:00+00:00"
        }"#;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.name(), "Best portraits");
        assert_eq!(preset.filters().exact_rating, Some(5));
        assert_eq!(preset.filters.sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_update_omits_missing_fields() {
        let update = PresetUpdate { name: Some("Renamed".into()), filters: None };
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({ "name": "Renamed" }));
    }

    #[test]
    fn test_batch_bodies() {
        let id = Uuid::from_u128(7);
        let update = BatchUpdate { ids: vec![id], rating: Some(4), ..Default::default() };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "ids": [id.to_string()], "rating": 4 })
        );
        let delete = BatchDelete { ids: vec![id], permanent: false };
        assert_eq!(serde_json::to_value(&delete).unwrap(), serde_json::json!({ "ids": [id.to_string()] }));
    }

    #[test]
    fn test_envelope_pagination_visibility() {
        let empty: PaginationEnvelope<ImageSummary> =
            PaginationEnvelope { items: Vec::new(), total: 0, page: 1, per_page: 24, total_pages: 0 };
        assert!(empty.is_empty());
        assert!(!empty.shows_pagination());
    }

    #[test]
    fn test_thumbnail_url() {
        let json = r#"{
            "id": "0190b6c1-6c3e-7d2a-9a7c-2f8a4c1b9e10",
            "source_tool": "comfyui",
            "thumbnail_path": "thumbs/ab/abcd.webp",
            "width": 832,
            "height": 1216,
            "created_at": "2024-07-01T12:00:00Z"
        }"#;
        let image: ImageSummary = serde_json::from_str(json).unwrap();
        assert_eq!(image.thumbnail_url(), "/storage/thumbs/ab/abcd.webp");
        assert_eq!(image.display_model(), "Unknown model");
        assert_eq!(image.rating, 0);
    }
}
