//! Knowledge Hub filter translation.
//!
//! UI labels ("News", "Guides", "Toolkits & Templates") map onto canonical
//! backend values ("Article" plus a format, "Tool"). The URL only ever holds
//! canonical values; the UI selection is re-derived from it on every read.

use crate::facets::{FilterGroup, FilterOption};
use crate::types::{MediaType, Popularity};
use crate::url_state::{FilterKey, HubFilters, HubQuery};

pub const QUICK_READS: &str = "Quick Reads";
pub const IN_DEPTH_REPORTS: &str = "In-Depth Reports";

/// Article formats owned by the News/Guides labels.
const MANAGED_FORMATS: [&str; 2] = [QUICK_READS, IN_DEPTH_REPORTS];

pub const NEWS: &str = "News";
pub const ARTICLE: &str = "Article";
pub const GUIDES: &str = "Guides";

/// Media type labels in display order.
pub const MEDIA_TYPE_LABELS: [&str; 7] = [
    NEWS,
    ARTICLE,
    "Reports",
    "Toolkits & Templates",
    GUIDES,
    "Videos",
    "Podcasts",
];

pub const BUSINESS_STAGE_LABELS: [&str; 6] = [
    "Ideation",
    "Launch",
    "Growth",
    "Expansion",
    "Optimization",
    "Transformation",
];

pub const FORMAT_LABELS: [&str; 6] = [
    QUICK_READS,
    IN_DEPTH_REPORTS,
    "Interactive Tools",
    "Downloadable Templates",
    "Recorded Media",
    "Live Events",
];

/// Filter categories of the Knowledge Hub sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    MediaType,
    Domain,
    BusinessStage,
    Format,
    Popularity,
}

impl FilterCategory {
    pub fn id(&self) -> &'static str {
        match self {
            FilterCategory::MediaType => "mediaType",
            FilterCategory::Domain => "category",
            FilterCategory::BusinessStage => "businessStage",
            FilterCategory::Format => "format",
            FilterCategory::Popularity => "popularity",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "mediaType" => Some(FilterCategory::MediaType),
            "category" | "domain" => Some(FilterCategory::Domain),
            "businessStage" => Some(FilterCategory::BusinessStage),
            "format" => Some(FilterCategory::Format),
            "popularity" => Some(FilterCategory::Popularity),
            _ => None,
        }
    }

    fn key(&self) -> FilterKey {
        match self {
            FilterCategory::MediaType => FilterKey::Type,
            FilterCategory::Domain => FilterKey::Domain,
            FilterCategory::BusinessStage => FilterKey::Stage,
            FilterCategory::Format => FilterKey::Format,
            FilterCategory::Popularity => FilterKey::Popularity,
        }
    }
}

/// Canonical backend type for a UI label, accepting singular/plural aliases.
pub fn canonical_type(label: &str) -> Option<MediaType> {
    match label {
        "News" | "Article" | "Articles" | "Guides" | "Guide" => Some(MediaType::Article),
        "Reports" | "Report" => Some(MediaType::Report),
        "Toolkits & Templates" | "Toolkit" | "Tool" => Some(MediaType::Tool),
        "Videos" | "Video" => Some(MediaType::Video),
        "Podcasts" | "Podcast" => Some(MediaType::Podcast),
        _ => None,
    }
}

fn ui_label(media_type: &str) -> Option<&'static str> {
    match media_type {
        "Report" => Some("Reports"),
        "Tool" => Some("Toolkits & Templates"),
        "Video" => Some("Videos"),
        "Podcast" => Some("Podcasts"),
        // legacy canonical values; the next toggle rewrites them to
        // Article plus the matching managed format
        "News" => Some(NEWS),
        "Guide" => Some(GUIDES),
        _ => None,
    }
}

/// Formats that make sense for a media type label.
pub fn allowed_formats(label: &str) -> &'static [&'static str] {
    match label {
        NEWS => &[QUICK_READS],
        ARTICLE | GUIDES => &[QUICK_READS, IN_DEPTH_REPORTS],
        "Reports" => &[IN_DEPTH_REPORTS, "Downloadable Templates"],
        "Toolkits & Templates" => &["Interactive Tools", "Downloadable Templates"],
        "Videos" | "Podcasts" => &["Recorded Media"],
        _ => &[],
    }
}

/// UI selection per category, hydrated from canonical filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiSelection {
    pub media_types: Vec<String>,
    pub domain: Vec<String>,
    pub stage: Vec<String>,
    pub format: Vec<String>,
    pub popularity: Vec<String>,
}

impl UiSelection {
    /// Reflect canonical URL filters back into UI labels. `Article` shows as
    /// News and/or Guides depending on which managed formats accompany it.
    pub fn hydrate(filters: &HubFilters) -> Self {
        let has_quick = filters.format.iter().any(|f| f == QUICK_READS);
        let has_in_depth = filters.format.iter().any(|f| f == IN_DEPTH_REPORTS);

        let mut media_types: Vec<String> = Vec::new();
        let mut push = |label: &str| {
            if !media_types.iter().any(|m| m == label) {
                media_types.push(label.to_string());
            }
        };

        for t in &filters.types {
            if t == ARTICLE {
                match (has_quick, has_in_depth) {
                    (true, false) => push(NEWS),
                    (false, true) => push(GUIDES),
                    (true, true) => {
                        push(NEWS);
                        push(GUIDES);
                    }
                    (false, false) => push(ARTICLE),
                }
            } else if let Some(label) = ui_label(t) {
                push(label);
            }
        }

        Self {
            media_types,
            domain: filters.domain.clone(),
            stage: filters.stage.clone(),
            format: filters.format.clone(),
            popularity: filters.popularity.clone(),
        }
    }

    /// Produce the canonical payload. Deterministic for a given selection.
    pub fn translate(&self) -> HubFilters {
        let (types, managed) = translate_media_types(&self.media_types);

        let mut format: Vec<String> = self.format.clone();
        for f in managed {
            if !format.iter().any(|existing| existing == f) {
                format.push(f.to_string());
            }
        }

        HubFilters {
            types: types.iter().map(|t| t.as_str().to_string()).collect(),
            domain: self.domain.clone(),
            stage: self.stage.clone(),
            format,
            popularity: self.popularity.clone(),
        }
    }

    /// All active labels in sidebar order.
    pub fn active_labels(&self) -> Vec<String> {
        self.media_types
            .iter()
            .chain(&self.domain)
            .chain(&self.stage)
            .chain(&self.format)
            .chain(&self.popularity)
            .cloned()
            .collect()
    }
}

/// Canonical types and managed formats for a set of media type labels.
///
/// News adds Quick Reads, Guides adds In-Depth Reports, both under Article.
/// Unknown labels are ignored.
pub fn translate_media_types(labels: &[String]) -> (Vec<MediaType>, Vec<&'static str>) {
    let mut types: Vec<MediaType> = Vec::new();
    let mut formats: Vec<&'static str> = Vec::new();

    for label in labels {
        if let Some(t) = canonical_type(label) {
            if !types.contains(&t) {
                types.push(t);
            }
        }
        let managed = match label.as_str() {
            NEWS => Some(QUICK_READS),
            GUIDES => Some(IN_DEPTH_REPORTS),
            _ => None,
        };
        if let Some(f) = managed {
            if !formats.contains(&f) {
                formats.push(f);
            }
        }
    }

    (types, formats)
}

/// Toggle a sidebar label and return the next URL state (page reset to 1).
pub fn toggle(query: &HubQuery, category: FilterCategory, label: &str) -> HubQuery {
    let mut next = query.clone();
    match category {
        FilterCategory::MediaType => toggle_media_type(&mut next, label),
        other => next.filters.toggle(other.key(), label),
    }
    next.page = 1;
    next
}

fn toggle_media_type(query: &mut HubQuery, label: &str) {
    let mut selected = UiSelection::hydrate(&query.filters).media_types;

    let now_selected = if let Some(pos) = selected.iter().position(|s| s == label) {
        selected.remove(pos);
        false
    } else {
        selected.push(label.to_string());
        true
    };

    // Article is the parent of News/Guides; the latest click wins.
    if now_selected && label == ARTICLE {
        selected.retain(|s| s != NEWS && s != GUIDES);
    } else if now_selected && (label == NEWS || label == GUIDES) {
        selected.retain(|s| s != ARTICLE);
    }

    let (types, managed) = translate_media_types(&selected);

    let mut format: Vec<String> = query
        .filters
        .format
        .iter()
        .filter(|f| !MANAGED_FORMATS.contains(&f.as_str()))
        .cloned()
        .collect();
    format.extend(managed.iter().map(|f| f.to_string()));

    query.filters.types = types.iter().map(|t| t.as_str().to_string()).collect();
    query.filters.format = format;
}

/// Find the category a label belongs to within a filter config.
pub fn category_of(config: &[FilterGroup], label: &str) -> Option<FilterCategory> {
    config
        .iter()
        .find(|group| group.options.iter().any(|o| o.name == label))
        .and_then(|group| FilterCategory::from_id(&group.id))
}

/// Static Knowledge Hub sidebar. Domain options come from the data.
pub fn knowledge_hub_config(domains: &[String]) -> Vec<FilterGroup> {
    vec![
        FilterGroup::from_labels("mediaType", "Media Type", &MEDIA_TYPE_LABELS),
        FilterGroup::from_labels("businessStage", "Business Stage", &BUSINESS_STAGE_LABELS),
        FilterGroup {
            id: "category".to_string(),
            title: "Category".to_string(),
            options: domains.iter().map(|d| FilterOption::from_name(d)).collect(),
        },
        FilterGroup::from_labels("format", "Format", &FORMAT_LABELS),
        FilterGroup {
            id: "popularity".to_string(),
            title: "Popularity".to_string(),
            options: Popularity::ALL
                .iter()
                .map(|p| FilterOption::from_name(p.label()))
                .collect(),
        },
    ]
}

/// Restrict format options to those allowed by the selected media types.
/// With no media type selected the config is returned unchanged.
pub fn narrow_formats(config: &[FilterGroup], selection: &UiSelection) -> Vec<FilterGroup> {
    if selection.media_types.is_empty() {
        return config.to_vec();
    }

    let allowed: Vec<&str> = selection
        .media_types
        .iter()
        .flat_map(|m| allowed_formats(m).iter().copied())
        .collect();

    config
        .iter()
        .map(|group| {
            if group.id != FilterCategory::Format.id() {
                return group.clone();
            }
            FilterGroup {
                options: group
                    .options
                    .iter()
                    .filter(|o| allowed.contains(&o.name.as_str()))
                    .cloned()
                    .collect(),
                ..group.clone()
            }
        })
        .collect()
}
