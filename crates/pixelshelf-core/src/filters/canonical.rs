//! Canonical form and comparison of filter sets
//!
//! Missing, null, empty string, numeric zero and an empty tag list all mean
//! "no filter". The sort fields also treat their defaults as unset since the
//! URL never carries them. A minimum or exact rating of 0 is therefore
//! indistinguishable from no rating filter at all.

use std::collections::BTreeMap;

use super::{FilterKey, FilterSet, Orientation, SortField, SortOrder};

/// One key's value after collapsing all unset-equivalent states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    Unset,
    Text(String),
    Number(u32),
    Flag(bool),
    /// Compared in order: `[a, b]` and `[b, a]` are different
    Tags(Vec<String>),
}

impl CanonicalValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, CanonicalValue::Unset)
    }

    fn text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => CanonicalValue::Text(s.to_string()),
            _ => CanonicalValue::Unset,
        }
    }

    fn number(value: Option<u32>) -> Self {
        match value {
            Some(n) if n != 0 => CanonicalValue::Number(n),
            _ => CanonicalValue::Unset,
        }
    }

    fn flag(value: Option<bool>) -> Self {
        value.map(CanonicalValue::Flag).unwrap_or(CanonicalValue::Unset)
    }

    fn tags(value: Option<&Vec<String>>) -> Self {
        match value {
            Some(tags) if !tags.is_empty() => CanonicalValue::Tags(tags.clone()),
            _ => CanonicalValue::Unset,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<u32> {
        match self {
            CanonicalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            CanonicalValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// Every filter key mapped to its canonical value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFilterSet {
    values: BTreeMap<FilterKey, CanonicalValue>,
}

impl CanonicalFilterSet {
    pub fn get(&self, key: FilterKey) -> &CanonicalValue {
        self.values.get(&key).unwrap_or(&CanonicalValue::Unset)
    }

    /// Keys holding a value, in URL order
    pub fn iter_set(&self) -> impl Iterator<Item = (FilterKey, &CanonicalValue)> {
        self.values.iter().filter(|(_, v)| !v.is_unset()).map(|(k, v)| (*k, v))
    }

    /// Rebuild the minimal filter set this canonical form stands for.
    pub fn to_filters(&self) -> FilterSet {
        let text = |key| self.get(key).as_text().map(str::to_string);
        let number = |key| self.get(key).as_number();
        let rating = |key| number(key).and_then(|n| u8::try_from(n).ok());
        let flag = |key| self.get(key).as_flag();

        FilterSet {
            q: text(FilterKey::Q),
            source_tool: text(FilterKey::SourceTool),
            model_type: text(FilterKey::ModelType),
            model_name: text(FilterKey::ModelName),
            sampler_name: text(FilterKey::SamplerName),
            min_rating: rating(FilterKey::MinRating),
            exact_rating: rating(FilterKey::ExactRating),
            is_favorite: flag(FilterKey::IsFavorite),
            needs_improvement: flag(FilterKey::NeedsImprovement),
            tags: match self.get(FilterKey::Tags) {
                CanonicalValue::Tags(tags) => Some(tags.clone()),
                _ => None,
            },
            lora_name: text(FilterKey::LoraName),
            is_xyz_grid: flag(FilterKey::IsXyzGrid),
            is_upscaled: flag(FilterKey::IsUpscaled),
            orientation: text(FilterKey::Orientation).and_then(|s| s.parse().ok()),
            min_width: number(FilterKey::MinWidth),
            min_height: number(FilterKey::MinHeight),
            date_from: text(FilterKey::DateFrom).and_then(|s| s.parse().ok()),
            sort_by: text(FilterKey::SortBy).and_then(|s| s.parse().ok()),
            sort_order: text(FilterKey::SortOrder).and_then(|s| s.parse().ok()),
        }
    }
}

fn canonical_value(filters: &FilterSet, key: FilterKey) -> CanonicalValue {
    match key {
        FilterKey::Q => CanonicalValue::text(filters.q.as_deref()),
        FilterKey::SourceTool => CanonicalValue::text(filters.source_tool.as_deref()),
        FilterKey::ModelType => CanonicalValue::text(filters.model_type.as_deref()),
        FilterKey::ModelName => CanonicalValue::text(filters.model_name.as_deref()),
        FilterKey::SamplerName => CanonicalValue::text(filters.sampler_name.as_deref()),
        FilterKey::MinRating => CanonicalValue::number(filters.min_rating.map(u32::from)),
        FilterKey::ExactRating => CanonicalValue::number(filters.exact_rating.map(u32::from)),
        FilterKey::IsFavorite => CanonicalValue::flag(filters.is_favorite),
        FilterKey::NeedsImprovement => CanonicalValue::flag(filters.needs_improvement),
        FilterKey::Tags => CanonicalValue::tags(filters.tags.as_ref()),
        FilterKey::LoraName => CanonicalValue::text(filters.lora_name.as_deref()),
        FilterKey::IsXyzGrid => CanonicalValue::flag(filters.is_xyz_grid),
        FilterKey::IsUpscaled => CanonicalValue::flag(filters.is_upscaled),
        FilterKey::Orientation => CanonicalValue::text(filters.orientation.as_ref().map(Orientation::as_str)),
        FilterKey::MinWidth => CanonicalValue::number(filters.min_width),
        FilterKey::MinHeight => CanonicalValue::number(filters.min_height),
        FilterKey::DateFrom => match filters.date_from {
            Some(date) => CanonicalValue::Text(date.format("%Y-%m-%d").to_string()),
            None => CanonicalValue::Unset,
        },
        FilterKey::SortBy => match filters.sort_by {
            Some(field) if field != SortField::default() => CanonicalValue::Text(field.as_str().to_string()),
            _ => CanonicalValue::Unset,
        },
        FilterKey::SortOrder => match filters.sort_order {
            Some(order) if order != SortOrder::default() => CanonicalValue::Text(order.as_str().to_string()),
            _ => CanonicalValue::Unset,
        },
    }
}

pub fn to_canonical(filters: &FilterSet) -> CanonicalFilterSet {
    CanonicalFilterSet {
        values: FilterKey::ALL
            .iter()
            .map(|key| (*key, canonical_value(filters, *key)))
            .collect(),
    }
}

/// Semantic equality: both sets agree on every key once canonicalized.
pub fn filters_equal(a: &FilterSet, b: &FilterSet) -> bool {
    to_canonical(a) == to_canonical(b)
}

/// Whether any non-sort key actually narrows the listing.
pub fn has_active_conditions(filters: &FilterSet) -> bool {
    FilterKey::ALL
        .iter()
        .filter(|key| !key.is_sort())
        .any(|key| !canonical_value(filters, *key).is_unset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> FilterSet {
        FilterSet {
            q: Some("castle at dusk".to_string()),
            source_tool: Some("comfyui".to_string()),
            model_type: Some("sdxl".to_string()),
            min_rating: Some(3),
            is_xyz_grid: Some(false),
            tags: Some(vec!["landscape".to_string(), "wip".to_string()]),
            orientation: Some(Orientation::Landscape),
            min_width: Some(1024),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 15),
            sort_by: Some(SortField::Rating),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_equivalents_compare_equal() {
        let blank = FilterSet::default();
        let empties = FilterSet {
            q: Some(String::new()),
            model_name: Some(String::new()),
            min_rating: Some(0),
            min_width: Some(0),
            tags: Some(Vec::new()),
            sort_by: Some(SortField::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert!(filters_equal(&blank, &empties));
    }

    #[test]
    fn test_zero_rating_is_unset() {
        // A "0 stars" filter cannot be told apart from no rating filter.
        let unset = FilterSet::default();
        let zero_min = FilterSet { min_rating: Some(0), ..Default::default() };
        let zero_exact = FilterSet { exact_rating: Some(0), ..Default::default() };
        assert!(filters_equal(&unset, &zero_min));
        assert!(filters_equal(&zero_min, &unset));
        assert!(filters_equal(&unset, &zero_exact));
        assert!(!has_active_conditions(&zero_exact));
    }

    #[test]
    fn test_false_is_not_unset() {
        let unset = FilterSet::default();
        let non_grid = FilterSet { is_xyz_grid: Some(false), ..Default::default() };
        assert!(!filters_equal(&unset, &non_grid));
        assert!(has_active_conditions(&non_grid));
    }

    #[test]
    fn test_tag_order_matters() {
        let a = FilterSet { tags: Some(vec!["a".into(), "b".into()]), ..Default::default() };
        let b = FilterSet { tags: Some(vec!["b".into(), "a".into()]), ..Default::default() };
        let longer = FilterSet { tags: Some(vec!["a".into(), "b".into(), "c".into()]), ..Default::default() };
        assert!(!filters_equal(&a, &b));
        assert!(!filters_equal(&a, &longer));
        assert!(filters_equal(&a, &a.clone()));
    }

    #[test]
    fn test_differs_on_single_key() {
        let base = sample();
        let mut changed = base.clone();
        changed.min_width = Some(1025);
        assert!(!filters_equal(&base, &changed));
    }

    #[test]
    fn test_canonical_is_idempotent() {
        for filters in [FilterSet::default(), FilterSet::with_default_sort(), sample()] {
            let once = to_canonical(&filters);
            let twice = to_canonical(&once.to_filters());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_to_filters_drops_empty_values() {
        let filters = FilterSet {
            q: Some(String::new()),
            min_rating: Some(0),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(to_canonical(&filters).to_filters(), FilterSet::default());
    }

    #[test]
    fn test_sort_alone_is_not_active() {
        let sorted = FilterSet {
            sort_by: Some(SortField::Rating),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert!(!has_active_conditions(&sorted));
        assert!(!has_active_conditions(&FilterSet::default()));
        assert!(has_active_conditions(&sample()));
    }

    #[test]
    fn test_non_default_sort_still_distinguishes_sets() {
        let a = FilterSet { q: Some("cat".into()), ..Default::default() };
        let b = FilterSet { q: Some("cat".into()), sort_order: Some(SortOrder::Asc), ..Default::default() };
        assert!(!filters_equal(&a, &b));
    }

    #[test]
    fn test_iter_set_lists_only_values() {
        let filters = FilterSet { q: Some("cat".into()), min_rating: Some(0), ..Default::default() };
        let canonical = to_canonical(&filters);
        let keys: Vec<FilterKey> = canonical.iter_set().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![FilterKey::Q]);
    }
}
