//! Knowledge Hub URL state.
//!
//! The query string is the canonical state for search text, filters and the
//! page window. Every control is a projection of a [`HubQuery`]; mutations
//! produce a new query string rather than independent state.

use serde::Serialize;
use url::form_urlencoded;

pub const DEFAULT_PER_PAGE: u32 = 9;
/// Largest page size a URL may ask for; larger values are capped.
pub const MAX_PER_PAGE: u32 = 100;

/// Filter lists keyed by URL parameter. Values are canonical backend values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Type,
    Domain,
    Stage,
    Format,
    Popularity,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Type,
        FilterKey::Domain,
        FilterKey::Stage,
        FilterKey::Format,
        FilterKey::Popularity,
    ];

    pub fn param(&self) -> &'static str {
        match self {
            FilterKey::Type => "type",
            FilterKey::Domain => "domain",
            FilterKey::Stage => "stage",
            FilterKey::Format => "format",
            FilterKey::Popularity => "popularity",
        }
    }

    fn from_param(param: &str) -> Option<Self> {
        FilterKey::ALL.into_iter().find(|k| k.param() == param)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubFilters {
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub domain: Vec<String>,
    pub stage: Vec<String>,
    pub format: Vec<String>,
    pub popularity: Vec<String>,
}

impl HubFilters {
    pub fn get(&self, key: FilterKey) -> &[String] {
        match key {
            FilterKey::Type => &self.types,
            FilterKey::Domain => &self.domain,
            FilterKey::Stage => &self.stage,
            FilterKey::Format => &self.format,
            FilterKey::Popularity => &self.popularity,
        }
    }

    pub fn get_mut(&mut self, key: FilterKey) -> &mut Vec<String> {
        match key {
            FilterKey::Type => &mut self.types,
            FilterKey::Domain => &mut self.domain,
            FilterKey::Stage => &mut self.stage,
            FilterKey::Format => &mut self.format,
            FilterKey::Popularity => &mut self.popularity,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterKey::ALL.iter().all(|k| self.get(*k).is_empty())
    }

    /// Only the first popularity value drives sorting and trending.
    pub fn popularity_key(&self) -> Option<&str> {
        self.popularity.first().map(String::as_str)
    }

    /// Add `value` if absent, remove it if present.
    pub fn toggle(&mut self, key: FilterKey, value: &str) {
        let list = self.get_mut(key);
        if let Some(pos) = list.iter().position(|v| v == value) {
            list.remove(pos);
        } else {
            list.push(value.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubQuery {
    pub search: String,
    pub filters: HubFilters,
    pub page: u32,
    pub per_page: u32,
}

impl Default for HubQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl HubQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            search: String::new(),
            filters: HubFilters::default(),
            page: 1,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Unknown keys are ignored. The first occurrence of a key wins. A
    /// missing, malformed or zero `page` becomes 1; a missing or invalid
    /// `perPage` becomes `default_per_page`, and any `perPage` is capped at
    /// [`MAX_PER_PAGE`].
    pub fn parse(query: &str, default_per_page: u32) -> Self {
        let mut parsed = HubQuery::new(default_per_page);
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if seen.iter().any(|k| k == key.as_ref()) {
                continue;
            }
            seen.push(key.to_string());

            match key.as_ref() {
                "q" => parsed.search = value.into_owned(),
                "page" => parsed.page = parse_positive(&value).unwrap_or(1),
                "perPage" => {
                    parsed.per_page = parse_positive(&value)
                        .unwrap_or(default_per_page)
                        .clamp(1, MAX_PER_PAGE)
                }
                other => {
                    if let Some(filter_key) = FilterKey::from_param(other) {
                        *parsed.filters.get_mut(filter_key) = split_csv(&value);
                    }
                }
            }
        }

        parsed
    }

    /// Serialize back to a query string. Empty lists and blank search are
    /// omitted; `page` and `perPage` are always present.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.search.trim().is_empty() {
            out.append_pair("q", &self.search);
        }
        for key in FilterKey::ALL {
            let values = self.filters.get(key);
            if !values.is_empty() {
                out.append_pair(key.param(), &values.join(","));
            }
        }
        out.append_pair("page", &self.page.to_string());
        out.append_pair("perPage", &self.per_page.to_string());
        out.finish()
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Apply new search text. Returns false when nothing changed. A change
    /// always resets to the first page.
    pub fn set_search(&mut self, text: &str) -> bool {
        let next = if text.trim().is_empty() { "" } else { text };
        if next == self.search {
            return false;
        }
        self.search = next.to_string();
        self.page = 1;
        true
    }

    /// Drop every filter key, keep the search text, return to page 1.
    pub fn clear_filters(&mut self) {
        self.filters = HubFilters::default();
        self.page = 1;
    }

    /// Zero-based row range `[from, to]` covered by this page.
    pub fn row_range(&self) -> (u64, u64) {
        let per_page = u64::from(self.per_page.max(1));
        let from = u64::from(self.page.max(1) - 1) * per_page;
        (from, from + per_page - 1)
    }
}

pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v >= 1)
}
