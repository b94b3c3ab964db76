use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Canonical media type stored in `v_media_public.type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    Article,
    Report,
    Tool,
    Video,
    Podcast,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Article,
        MediaType::Report,
        MediaType::Tool,
        MediaType::Video,
        MediaType::Podcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Article => "Article",
            MediaType::Report => "Report",
            MediaType::Tool => "Tool",
            MediaType::Video => "Video",
            MediaType::Podcast => "Podcast",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::invalid("type", format!("unknown media type {s:?}")))
    }
}

/// Popularity options offered by the Knowledge Hub filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Popularity {
    Latest,
    Trending,
    MostDownloaded,
    EditorsPick,
}

impl Popularity {
    pub const ALL: [Popularity; 4] = [
        Popularity::Latest,
        Popularity::Trending,
        Popularity::MostDownloaded,
        Popularity::EditorsPick,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Popularity::Latest => "Latest",
            Popularity::Trending => "Trending",
            Popularity::MostDownloaded => "Most Downloaded",
            Popularity::EditorsPick => "Editor's Pick",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Popularity::ALL.into_iter().find(|p| p.label() == label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(alias = "photo_url")]
    pub photo_url: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
}

/// View model for a Knowledge Hub card. Built fresh on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub domain: Option<String>,
    pub business_stage: Option<String>,
    pub format: Option<String>,
    pub popularity: Option<String>,
    pub provider: Provider,
    pub authors: Vec<Author>,
    pub image_url: Option<String>,
    pub download_url: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MediaItem {
    pub fn has_popularity(&self, popularity: Popularity) -> bool {
        self.popularity
            .as_deref()
            .map(|p| p.eq_ignore_ascii_case(popularity.label()))
            .unwrap_or(false)
    }
}

/// Marketplaces served by the hub.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MarketplaceKind {
    Financial,
    BusinessServices,
    Courses,
    Events,
    KnowledgeHub,
    NonFinancial,
}

impl MarketplaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketplaceKind::Financial => "financial",
            MarketplaceKind::BusinessServices => "business-services",
            MarketplaceKind::Courses => "courses",
            MarketplaceKind::Events => "events",
            MarketplaceKind::KnowledgeHub => "knowledge-hub",
            MarketplaceKind::NonFinancial => "non-financial",
        }
    }

    /// Marketplaces that must not render without backend facets.
    pub fn requires_backend_facets(&self) -> bool {
        matches!(
            self,
            MarketplaceKind::Events | MarketplaceKind::Financial | MarketplaceKind::Courses
        )
    }
}

impl fmt::Display for MarketplaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketplaceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "financial" => Ok(MarketplaceKind::Financial),
            "business-services" => Ok(MarketplaceKind::BusinessServices),
            "courses" => Ok(MarketplaceKind::Courses),
            "events" => Ok(MarketplaceKind::Events),
            "knowledge-hub" => Ok(MarketplaceKind::KnowledgeHub),
            "non-financial" => Ok(MarketplaceKind::NonFinancial),
            other => Err(CoreError::invalid(
                "marketplace",
                format!("unknown marketplace {other:?}"),
            )),
        }
    }
}
