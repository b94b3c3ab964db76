use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::ViewCount;

/// Views per media item recorded at or after `since`. Items without views
/// are absent from the result.
pub async fn counts_since(
    pool: &PgPool,
    media_ids: &[String],
    since: DateTime<Utc>,
) -> Result<Vec<ViewCount>, sqlx::Error> {
    if media_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ViewCount>(
        r#"
        SELECT media_id::text AS media_id, COUNT(*) AS views
        FROM media_views
        WHERE media_id::text = ANY($1) AND viewed_at >= $2
        GROUP BY media_id
        "#,
    )
    .bind(media_ids)
    .bind(since)
    .fetch_all(pool)
    .await
}
