use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;

use hub_core::coordinator::{MediaPage, MediaSource};
use hub_core::url_state::HubQuery;

use crate::queries;

/// [`MediaSource`] backed by `v_media_public` and `media_views`.
#[derive(Clone)]
pub struct PgMediaSource {
    pool: PgPool,
}

impl PgMediaSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaSource for PgMediaSource {
    type Error = sqlx::Error;

    async fn fetch_page(&self, query: &HubQuery) -> Result<MediaPage, sqlx::Error> {
        let page = queries::media::fetch_page(&self.pool, query).await?;
        Ok(MediaPage {
            items: page.rows.into_iter().map(|r| r.into_media_item()).collect(),
            total_count: u64::try_from(page.total_count).unwrap_or(0),
        })
    }

    async fn view_counts(
        &self,
        ids: &[String],
        since: DateTime<Utc>,
    ) -> Result<HashMap<String, u64>, sqlx::Error> {
        let rows = queries::views::counts_since(&self.pool, ids, since).await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.media_id, u64::try_from(r.views).unwrap_or(0)))
            .collect())
    }
}
