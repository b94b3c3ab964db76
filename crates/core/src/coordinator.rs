//! Knowledge Hub fetch coordination: remote page, optional trending
//! enrichment, then the pagination clamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::pagination::PageWindow;
use crate::trending;
use crate::types::{MediaItem, Popularity};
use crate::url_state::HubQuery;

/// One page of rows plus the exact count across all pages.
#[derive(Debug, Clone, Default)]
pub struct MediaPage {
    pub items: Vec<MediaItem>,
    pub total_count: u64,
}

/// Tabular backend for the Knowledge Hub.
#[async_trait]
pub trait MediaSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Rows for `query.page` with `query.filters` and `query.search` applied.
    async fn fetch_page(&self, query: &HubQuery) -> Result<MediaPage, Self::Error>;

    /// View counts per item id for views at or after `since`.
    async fn view_counts(
        &self,
        ids: &[String],
        since: DateTime<Utc>,
    ) -> Result<HashMap<String, u64>, Self::Error>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HubPage {
    pub items: Vec<MediaItem>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Page(HubPage),
    /// The requested page is past the end; fetch `query` instead.
    Redirect { query: HubQuery },
}

pub struct KnowledgeHub<S> {
    source: S,
}

impl<S: MediaSource> KnowledgeHub<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(
        &self,
        query: &HubQuery,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, S::Error> {
        let MediaPage {
            mut items,
            mut total_count,
        } = self.source.fetch_page(query).await?;

        if query.filters.popularity_key() == Some(Popularity::Trending.label()) {
            items = self.enrich_trending(items, now).await;
            // page-scoped count: the percentile only sees this page
            total_count = items.len() as u64;
        }

        let window = PageWindow::new(query.page, query.per_page, total_count);
        if let Some(last) = window.clamp_redirect() {
            debug!(requested = query.page, last, "page out of range");
            return Ok(FetchOutcome::Redirect {
                query: query.with_page(last),
            });
        }

        Ok(FetchOutcome::Page(HubPage {
            items,
            total_count,
            page: window.page,
            per_page: window.per_page,
            total_pages: window.total_pages(),
        }))
    }

    async fn enrich_trending(&self, items: Vec<MediaItem>, now: DateTime<Utc>) -> Vec<MediaItem> {
        if items.is_empty() {
            return items;
        }
        let ids: Vec<String> = items.iter().map(|m| m.id.clone()).collect();
        let views = match self
            .source
            .view_counts(&ids, trending::views_since(now))
            .await
        {
            Ok(views) => views,
            Err(err) => {
                warn!(error = %err, "view counts unavailable, skipping trending relabel");
                HashMap::new()
            }
        };
        trending::derive_trending(items, &views, now)
    }
}
