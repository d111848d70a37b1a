//! URL query string encoding of filter sets
//!
//! Only keys with a canonical value are written, so defaults never reach the
//! address bar. Parsing is forgiving: unknown keys, malformed numbers and
//! unrecognized enum values are skipped, and the default sort is filled back
//! in.

use std::borrow::Cow;

use super::canonical::{to_canonical, CanonicalValue};
use super::{FilterKey, FilterSet, SortField, SortOrder, TAG_SEPARATOR};

fn value_to_string(value: &CanonicalValue) -> Option<String> {
    match value {
        CanonicalValue::Unset => None,
        CanonicalValue::Text(s) => Some(s.clone()),
        CanonicalValue::Number(n) => Some(n.to_string()),
        CanonicalValue::Flag(b) => Some(b.to_string()),
        CanonicalValue::Tags(tags) => Some(tags.join(&TAG_SEPARATOR.to_string())),
    }
}

/// Key/value pairs for every key that holds a value, in a stable order.
pub fn to_query_pairs(filters: &FilterSet) -> Vec<(&'static str, String)> {
    to_canonical(filters)
        .iter_set()
        .filter_map(|(key, value)| value_to_string(value).map(|v| (key.as_str(), v)))
        .collect()
}

/// Percent-encode pairs into `a=1&b=2` form (no leading `?`).
pub fn encode_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k.as_ref()), urlencoding::encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn to_query_string(filters: &FilterSet) -> String {
    encode_pairs(&to_query_pairs(filters))
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

/// Split a query string into decoded pairs. A leading `?` is ignored, as are
/// segments that are not valid percent-encoded UTF-8.
pub fn decode_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            Some((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_rating(value: &str) -> Option<u8> {
    value.parse::<u8>().ok().filter(|r| *r <= 5)
}

fn parse_tags(value: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = value
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}

/// Apply one decoded pair. Returns false when the key is not a filter key.
pub(crate) fn apply_pair(filters: &mut FilterSet, key: &str, value: &str) -> bool {
    let Some(key) = FilterKey::from_name(key) else {
        return false;
    };
    // A present-but-unparseable value leaves the field as it was.
    match key {
        FilterKey::Q => filters.q = non_empty(value).or(filters.q.take()),
        FilterKey::SourceTool => filters.source_tool = non_empty(value).or(filters.source_tool.take()),
        FilterKey::ModelType => filters.model_type = non_empty(value).or(filters.model_type.take()),
        FilterKey::ModelName => filters.model_name = non_empty(value).or(filters.model_name.take()),
        FilterKey::SamplerName => filters.sampler_name = non_empty(value).or(filters.sampler_name.take()),
        FilterKey::LoraName => filters.lora_name = non_empty(value).or(filters.lora_name.take()),
        FilterKey::MinRating => filters.min_rating = parse_rating(value).or(filters.min_rating),
        FilterKey::ExactRating => filters.exact_rating = parse_rating(value).or(filters.exact_rating),
        FilterKey::IsFavorite => filters.is_favorite = parse_flag(value).or(filters.is_favorite),
        FilterKey::NeedsImprovement => {
            filters.needs_improvement = parse_flag(value).or(filters.needs_improvement)
        }
        FilterKey::IsXyzGrid => filters.is_xyz_grid = parse_flag(value).or(filters.is_xyz_grid),
        FilterKey::IsUpscaled => filters.is_upscaled = parse_flag(value).or(filters.is_upscaled),
        FilterKey::Tags => filters.tags = parse_tags(value).or(filters.tags.take()),
        FilterKey::Orientation => filters.orientation = value.parse().ok().or(filters.orientation),
        FilterKey::MinWidth => filters.min_width = value.parse().ok().or(filters.min_width),
        FilterKey::MinHeight => filters.min_height = value.parse().ok().or(filters.min_height),
        FilterKey::DateFrom => filters.date_from = value.parse().ok().or(filters.date_from),
        FilterKey::SortBy => filters.sort_by = value.parse().ok().or(filters.sort_by),
        FilterKey::SortOrder => filters.sort_order = value.parse().ok().or(filters.sort_order),
    }
    true
}

/// Fill the default sort and restore the rating invariant after parsing.
pub(crate) fn finish_parsed(filters: &mut FilterSet) {
    filters.sort_by.get_or_insert(SortField::default());
    filters.sort_order.get_or_insert(SortOrder::default());
    filters.normalize_rating();
}

pub fn from_query_pairs<I, K, V>(pairs: I) -> FilterSet
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut filters = FilterSet::default();
    for (key, value) in pairs {
        if !apply_pair(&mut filters, key.as_ref(), value.as_ref()) {
            tracing::trace!(key = key.as_ref(), "ignoring unknown query parameter");
        }
    }
    finish_parsed(&mut filters);
    filters
}

pub fn parse_query(query: &str) -> FilterSet {
    from_query_pairs(decode_query(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{filters_equal, Orientation};
    use chrono::NaiveDate;

    fn round_trip(filters: &FilterSet) -> FilterSet {
        parse_query(&to_query_string(filters))
    }

    fn single_key_cases() -> Vec<FilterSet> {
        let d = FilterSet::default;
        vec![
            FilterSet { q: Some("a cat & a dog = friends".into()), ..d() },
            FilterSet { source_tool: Some("a1111".into()), ..d() },
            FilterSet { model_type: Some("pony".into()), ..d() },
            FilterSet { model_name: Some("juggernautXL_v9".into()), ..d() },
            FilterSet { sampler_name: Some("DPM++ 2M Karras".into()), ..d() },
            FilterSet { min_rating: Some(4), ..d() },
            FilterSet { exact_rating: Some(5), ..d() },
            FilterSet { is_favorite: Some(true), ..d() },
            FilterSet { is_favorite: Some(false), ..d() },
            FilterSet { needs_improvement: Some(true), ..d() },
            FilterSet { tags: Some(vec!["portrait".into(), "日本".into()]), ..d() },
            FilterSet { lora_name: Some("detail_tweaker".into()), ..d() },
            FilterSet { is_xyz_grid: Some(true), ..d() },
            FilterSet { is_xyz_grid: Some(false), ..d() },
            FilterSet { is_upscaled: Some(false), ..d() },
            FilterSet { orientation: Some(Orientation::Square), ..d() },
            FilterSet { min_width: Some(1920), ..d() },
            FilterSet { min_height: Some(1080), ..d() },
            FilterSet { date_from: NaiveDate::from_ymd_opt(2023, 12, 31), ..d() },
            FilterSet { sort_by: Some(SortField::ModelName), ..d() },
            FilterSet { sort_order: Some(SortOrder::Asc), ..d() },
        ]
    }

    #[test]
    fn test_round_trip_each_key() {
        for filters in single_key_cases() {
            let parsed = round_trip(&filters);
            assert!(filters_equal(&filters, &parsed), "{:?} became {:?}", filters, parsed);
        }
    }

    #[test]
    fn test_round_trip_combined() {
        let mut combined = FilterSet::default();
        for filters in single_key_cases() {
            for (key, value) in to_query_pairs(&filters) {
                apply_pair(&mut combined, key, &value);
            }
        }
        combined.normalize_rating();
        let parsed = round_trip(&combined);
        assert!(filters_equal(&combined, &parsed));
        assert_eq!(parsed.min_rating, None);
        assert_eq!(parsed.exact_rating, Some(5));
    }

    #[test]
    fn test_defaults_are_omitted() {
        assert_eq!(to_query_string(&FilterSet::with_default_sort()), "");
        let filters = FilterSet {
            q: Some(String::new()),
            min_rating: Some(0),
            tags: Some(Vec::new()),
            ..FilterSet::with_default_sort()
        };
        assert!(to_query_pairs(&filters).is_empty());
    }

    #[test]
    fn test_parse_fills_default_sort() {
        let parsed = parse_query("");
        assert_eq!(parsed, FilterSet::with_default_sort());
        assert!(filters_equal(&parsed, &FilterSet::default()));
    }

    #[test]
    fn test_pairs_follow_key_order() {
        let filters = FilterSet {
            sort_order: Some(SortOrder::Asc),
            tags: Some(vec!["a".into(), "b".into()]),
            q: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(
            to_query_pairs(&filters),
            vec![("q", "x".to_string()), ("tags", "a,b".to_string()), ("sort_order", "asc".to_string())]
        );
    }

    #[test]
    fn test_encoding_escapes_reserved_characters() {
        let filters = FilterSet { q: Some("a&b=c d".into()), ..Default::default() };
        assert_eq!(to_query_string(&filters), "q=a%26b%3Dc%20d");
    }

    #[test]
    fn test_parse_accepts_plus_as_space_and_leading_question_mark() {
        let parsed = parse_query("?q=red+dress&min_rating=2");
        assert_eq!(parsed.q.as_deref(), Some("red dress"));
        assert_eq!(parsed.min_rating, Some(2));
    }

    #[test]
    fn test_parse_ignores_unknown_and_malformed() {
        let parsed = parse_query("foo=bar&min_rating=lots&exact_rating=9&is_favorite=yes&orientation=round&min_width=-5&date_from=yesterday&page=3");
        assert!(filters_equal(&parsed, &FilterSet::default()));
    }

    #[test]
    fn test_parse_bad_percent_encoding_is_skipped() {
        let parsed = parse_query("q=%FF%FE&model_name=flux");
        assert_eq!(parsed.q, None);
        assert_eq!(parsed.model_name.as_deref(), Some("flux"));
    }

    #[test]
    fn test_parse_with_both_ratings_keeps_exact() {
        let parsed = parse_query("min_rating=3&exact_rating=5");
        assert_eq!(parsed.min_rating, None);
        assert_eq!(parsed.exact_rating, Some(5));
    }

    #[test]
    fn test_parse_tags_skips_empty_segments() {
        let parsed = parse_query("tags=a,,b,");
        assert_eq!(parsed.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(parse_query("tags=,").tags, None);
    }

    #[test]
    fn test_tags_typed_with_commas_survive_the_url() {
        let mut filters = FilterSet::default();
        filters.add_tag("red, blue");
        let parsed = round_trip(&filters);
        assert!(filters_equal(&filters, &parsed), "round trip lost tag: {:?}", parsed.tags);
        assert_eq!(parsed.tags, Some(vec!["red".to_string(), "blue".to_string()]));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let parsed = parse_query("q=first&q=second");
        assert_eq!(parsed.q.as_deref(), Some("second"));
    }
}
