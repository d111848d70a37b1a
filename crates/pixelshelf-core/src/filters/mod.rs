//! Search filter model
//!
//! A [`FilterSet`] is the typed set of criteria that decides which images
//! the gallery lists. It travels three ways: as JSON inside saved presets and
//! smart folders, as a URL query string, and as request parameters for the
//! list endpoint. Comparisons always go through the canonical form in
//! [`canonical`], where every "unset-looking" value collapses to one sentinel.

mod canonical;
mod query;
mod rating;

pub use canonical::{filters_equal, has_active_conditions, to_canonical, CanonicalFilterSet, CanonicalValue};
pub use query::{decode_query, encode_pairs, from_query_pairs, parse_query, to_query_pairs, to_query_string};
pub use rating::{RatingControl, RatingMode, RatingState};

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Separator for the `tags` parameter in URLs
pub const TAG_SEPARATOR: char = ',';

/// Generator front-ends the backend knows how to parse
pub const SOURCE_TOOLS: &[&str] = &["comfyui", "a1111", "forge", "novelai"];

/// Base model families detected by the backend
pub const MODEL_TYPES: &[&str] = &["sd15", "sdxl", "pony", "illustrious", "flux", "qwen"];

/// Every key a filter set can carry, in URL order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Q,
    SourceTool,
    ModelType,
    ModelName,
    SamplerName,
    MinRating,
    ExactRating,
    IsFavorite,
    NeedsImprovement,
    Tags,
    LoraName,
    IsXyzGrid,
    IsUpscaled,
    Orientation,
    MinWidth,
    MinHeight,
    DateFrom,
    SortBy,
    SortOrder,
}

impl FilterKey {
    pub const ALL: [FilterKey; 19] = [
        FilterKey::Q,
        FilterKey::SourceTool,
        FilterKey::ModelType,
        FilterKey::ModelName,
        FilterKey::SamplerName,
        FilterKey::MinRating,
        FilterKey::ExactRating,
        FilterKey::IsFavorite,
        FilterKey::NeedsImprovement,
        FilterKey::Tags,
        FilterKey::LoraName,
        FilterKey::IsXyzGrid,
        FilterKey::IsUpscaled,
        FilterKey::Orientation,
        FilterKey::MinWidth,
        FilterKey::MinHeight,
        FilterKey::DateFrom,
        FilterKey::SortBy,
        FilterKey::SortOrder,
    ];

    /// Query-string / JSON field name
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Q => "q",
            FilterKey::SourceTool => "source_tool",
            FilterKey::ModelType => "model_type",
            FilterKey::ModelName => "model_name",
            FilterKey::SamplerName => "sampler_name",
            FilterKey::MinRating => "min_rating",
            FilterKey::ExactRating => "exact_rating",
            FilterKey::IsFavorite => "is_favorite",
            FilterKey::NeedsImprovement => "needs_improvement",
            FilterKey::Tags => "tags",
            FilterKey::LoraName => "lora_name",
            FilterKey::IsXyzGrid => "is_xyz_grid",
            FilterKey::IsUpscaled => "is_upscaled",
            FilterKey::Orientation => "orientation",
            FilterKey::MinWidth => "min_width",
            FilterKey::MinHeight => "min_height",
            FilterKey::DateFrom => "date_from",
            FilterKey::SortBy => "sort_by",
            FilterKey::SortOrder => "sort_order",
        }
    }

    pub fn from_name(name: &str) -> Option<FilterKey> {
        FilterKey::ALL.iter().copied().find(|key| key.as_str() == name)
    }

    /// Sort keys shape the listing but never count as a filter on their own
    pub fn is_sort(&self) -> bool {
        matches!(self, FilterKey::SortBy | FilterKey::SortOrder)
    }
}

/// Image aspect class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn all() -> &'static [Orientation] {
        &[Orientation::Landscape, Orientation::Portrait, Orientation::Square]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
            Orientation::Square => "Square",
        }
    }
}

impl FromStr for Orientation {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Orientation::all()
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

/// Column the listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Rating,
    ModelName,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        &[SortField::CreatedAt, SortField::Rating, SortField::ModelName]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Rating => "rating",
            SortField::ModelName => "model_name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "Date Created",
            SortField::Rating => "Rating",
            SortField::ModelName => "Model Name",
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// A value outside the closed set a filter field accepts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized filter value '{0}'")]
pub struct UnknownValue(pub String);

/// The typed set of search criteria.
///
/// Field names match the backend's JSON and query parameters. Unknown JSON
/// fields are ignored, and enumerated fields holding a value this client
/// does not recognize deserialize as unset rather than failing the whole
/// preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampler_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_improvement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora_name: Option<String>,
    /// `true` = XYZ grids only, `false` = exclude grids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_xyz_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_upscaled: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl FilterSet {
    /// Filter set with the listing's default sort filled in
    pub fn with_default_sort() -> Self {
        Self {
            sort_by: Some(SortField::default()),
            sort_order: Some(SortOrder::default()),
            ..Self::default()
        }
    }

    /// Set the "at least N stars" threshold, clearing any exact rating.
    pub fn set_min_rating(&mut self, rating: Option<u8>) {
        self.min_rating = rating;
        if rating.is_some() {
            self.exact_rating = None;
        }
    }

    /// Set the "exactly N stars" filter, clearing any minimum rating.
    pub fn set_exact_rating(&mut self, rating: Option<u8>) {
        self.exact_rating = rating;
        if rating.is_some() {
            self.min_rating = None;
        }
    }

    /// Restore the single-rating-mode invariant on data from outside
    /// (URLs, server JSON). The exact rating is the narrower filter and wins.
    pub fn normalize_rating(&mut self) {
        if self.exact_rating.is_some() && self.min_rating.is_some() {
            tracing::debug!(
                min = ?self.min_rating,
                exact = ?self.exact_rating,
                "both rating modes set, keeping exact rating"
            );
            self.min_rating = None;
        }
    }

    /// Add a tag. Commas separate tags in the URL, so `"red, blue"` adds
    /// two tags.
    pub fn add_tag(&mut self, tag: &str) {
        for tag in tag.split(TAG_SEPARATOR).map(str::trim).filter(|t| !t.is_empty()) {
            let tags = self.tags.get_or_insert_with(Vec::new);
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(tags) = self.tags.as_mut() {
            tags.retain(|t| t != tag);
            if tags.is_empty() {
                self.tags = None;
            }
        }
    }
}

/// Deserialize an optional enumerated value, treating unrecognized strings as unset.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(FilterKey::from_name("page"), None);
    }

    #[test]
    fn test_min_and_exact_rating_are_exclusive() {
        let mut filters = FilterSet::default();
        filters.set_min_rating(Some(3));
        filters.set_exact_rating(Some(5));
        assert_eq!(filters.min_rating, None);
        assert_eq!(filters.exact_rating, Some(5));

        filters.set_min_rating(Some(2));
        assert_eq!(filters.min_rating, Some(2));
        assert_eq!(filters.exact_rating, None);
    }

    #[test]
    fn test_clearing_one_rating_keeps_the_other_unset() {
        let mut filters = FilterSet::default();
        filters.set_exact_rating(Some(4));
        filters.set_min_rating(None);
        assert_eq!(filters.exact_rating, Some(4));
    }

    #[test]
    fn test_normalize_rating_prefers_exact() {
        let mut filters = FilterSet {
            min_rating: Some(2),
            exact_rating: Some(4),
            ..Default::default()
        };
        filters.normalize_rating();
        assert_eq!(filters.min_rating, None);
        assert_eq!(filters.exact_rating, Some(4));
    }

    #[test]
    fn test_tags_add_and_remove() {
        let mut filters = FilterSet::default();
        filters.add_tag(" cat ");
        filters.add_tag("cat");
        filters.add_tag("");
        filters.add_tag("dog");
        assert_eq!(filters.tags, Some(vec!["cat".to_string(), "dog".to_string()]));

        filters.remove_tag("cat");
        filters.remove_tag("dog");
        assert_eq!(filters.tags, None);
    }

    #[test]
    fn test_add_tag_splits_on_commas() {
        let mut filters = FilterSet::default();
        filters.add_tag("red, blue");
        filters.add_tag("blue,,green ");
        filters.add_tag(" , ");
        assert_eq!(
            filters.tags,
            Some(vec!["red".to_string(), "blue".to_string(), "green".to_string()])
        );
    }

    #[test]
    fn test_unknown_value_message() {
        let err = "panorama".parse::<Orientation>().unwrap_err();
        assert_eq!(err, UnknownValue("panorama".to_string()));
        assert_eq!(err.to_string(), "unrecognized filter value 'panorama'");
    }

    #[test]
    fn test_json_ignores_unknown_fields_and_values() {
        let json = r#"{
            "q": "castle",
            "orientation": "panorama",
            "sort_by": "file_size",
            "sort_order": "desc",
            "date_from": "2024-03-01",
            "seed_tolerance": 5
        }"#;
        let filters: FilterSet = serde_json::from_str(json).unwrap();
        assert_eq!(filters.q.as_deref(), Some("castle"));
        assert_eq!(filters.orientation, None);
        assert_eq!(filters.sort_by, None);
        assert_eq!(filters.sort_order, Some(SortOrder::Desc));
        assert_eq!(filters.date_from, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_json_omits_unset_fields() {
        let filters = FilterSet {
            min_rating: Some(3),
            orientation: Some(Orientation::Portrait),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json, serde_json::json!({ "min_rating": 3, "orientation": "portrait" }));
    }

    #[test]
    fn test_json_accepts_nulls() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"is_xyz_grid": null, "sort_by": null, "tags": null}"#).unwrap();
        assert_eq!(filters, FilterSet::default());
    }
}
