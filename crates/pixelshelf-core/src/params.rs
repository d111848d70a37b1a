//! Filter set plus pagination, as carried by the URL and the list request

use crate::filters::{self, FilterSet};

pub const DEFAULT_PAGE: u32 = 1;

/// Page size assumed when the URL carries none
pub const DEFAULT_PER_PAGE: u32 = 24;

/// Page sizes offered in the gallery toolbar; the backend caps at 120
pub const PER_PAGE_OPTIONS: [u32; 5] = [24, 48, 72, 96, 120];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub filters: FilterSet,
    pub page: u32,
    pub per_page: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            filters: FilterSet::with_default_sort(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchParams {
    pub fn new(filters: FilterSet, per_page: u32) -> Self {
        Self {
            filters,
            page: DEFAULT_PAGE,
            per_page: clamp_per_page(per_page),
        }
    }

    /// Parse `location.search`. Filters follow [`filters::parse_query`];
    /// pagination falls back to the defaults when missing or malformed.
    pub fn parse(query: &str) -> Self {
        let pairs = filters::decode_query(query);
        let mut params = Self {
            filters: filters::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            ..Self::default()
        };
        for (key, value) in &pairs {
            match key.as_str() {
                "page" => {
                    if let Some(page) = value.parse::<u32>().ok().filter(|p| *p >= 1) {
                        params.page = page;
                    }
                }
                "per_page" => {
                    if let Some(per_page) = parse_per_page(value) {
                        params.per_page = per_page;
                    }
                }
                _ => {}
            }
        }
        params
    }

    /// Pairs for the address bar: filters, then non-default pagination.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = filters::to_query_pairs(&self.filters);
        if self.page != DEFAULT_PAGE {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page != DEFAULT_PER_PAGE {
            pairs.push(("per_page", self.per_page.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        filters::encode_pairs(&self.to_query_pairs())
    }

    /// Pairs for `GET /images`. The endpoint takes `tags` as a repeated
    /// parameter and always receives explicit pagination.
    pub fn to_api_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = filters::to_query_pairs(&self.filters)
            .into_iter()
            .filter(|(key, _)| *key != "tags")
            .collect();
        if let Some(tags) = &self.filters.tags {
            pairs.extend(tags.iter().filter(|t| !t.is_empty()).map(|t| ("tags", t.clone())));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }
}

/// A `per_page` query value the backend accepts, if it is one
pub fn parse_per_page(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|p| (1..=120).contains(p))
}

pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, 120)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::filters_equal;

    #[test]
    fn test_default_params_have_empty_query() {
        assert_eq!(SearchParams::default().to_query_string(), "");
        assert_eq!(SearchParams::parse(""), SearchParams::default());
    }

    #[test]
    fn test_pagination_round_trip() {
        let params = SearchParams {
            filters: FilterSet { q: Some("cat".into()), ..FilterSet::with_default_sort() },
            page: 3,
            per_page: 48,
        };
        assert_eq!(params.to_query_string(), "q=cat&page=3&per_page=48");
        let parsed = SearchParams::parse(&params.to_query_string());
        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.per_page, 48);
        assert!(filters_equal(&parsed.filters, &params.filters));
    }

    #[test]
    fn test_bad_pagination_falls_back() {
        let parsed = SearchParams::parse("page=0&per_page=500");
        assert_eq!(parsed.page, DEFAULT_PAGE);
        assert_eq!(parsed.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_api_pairs_repeat_tags_and_send_pagination() {
        let params = SearchParams {
            filters: FilterSet {
                tags: Some(vec!["a".into(), "b".into()]),
                is_favorite: Some(true),
                ..Default::default()
            },
            page: 1,
            per_page: 24,
        };
        assert_eq!(
            params.to_api_pairs(),
            vec![
                ("is_favorite", "true".to_string()),
                ("tags", "a".to_string()),
                ("tags", "b".to_string()),
                ("page", "1".to_string()),
                ("per_page", "24".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_clamps_page_size() {
        assert_eq!(SearchParams::new(FilterSet::default(), 500).per_page, 120);
        assert_eq!(SearchParams::new(FilterSet::default(), 0).per_page, 1);
    }
}
