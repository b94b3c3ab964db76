//! Knowledge Hub media reads against `v_media_public`.
//!
//! The page query and the count query share one predicate builder so the
//! total always describes the rows being paged through.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::MediaRow;
use hub_core::types::Popularity;
use hub_core::url_state::HubQuery;

const MEDIA_COLUMNS: &str = r#"
    SELECT id::text AS id, title, summary, body_html, article_body_html,
           "type", domain, business_stage, format, popularity,
           legacy_provider_name AS provider_name,
           legacy_provider_logo_url AS provider_logo_url,
           authors, thumbnail_url, image_url,
           report_document_url, tool_document_url, tags,
           published_at, updated_at
    FROM v_media_public
"#;

pub struct MediaRows {
    pub rows: Vec<MediaRow>,
    pub total_count: i64,
}

/// One page of public, published media plus the exact filtered count.
pub async fn fetch_page(pool: &PgPool, query: &HubQuery) -> Result<MediaRows, sqlx::Error> {
    let rows = page_query(query)
        .build_query_as::<MediaRow>()
        .fetch_all(pool)
        .await?;

    let total_count = count_query(query)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    Ok(MediaRows { rows, total_count })
}

/// Distinct non-empty domains, used to populate the domain filter.
pub async fn list_domains(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT domain
        FROM v_media_public
        WHERE visibility = 'Public' AND status = 'Published'
          AND domain IS NOT NULL AND domain <> ''
        ORDER BY domain
        "#,
    )
    .fetch_all(pool)
    .await
}

pub(crate) fn page_query(query: &HubQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(MEDIA_COLUMNS);
    push_predicates(&mut qb, query);

    if query.filters.popularity_key() == Some(Popularity::MostDownloaded.label()) {
        qb.push(" ORDER BY download_count DESC, published_at DESC, id DESC");
    } else {
        qb.push(" ORDER BY published_at DESC, id DESC");
    }

    let (from, to) = query.row_range();
    let limit = i64::try_from(to - from + 1).unwrap_or(i64::MAX);
    let offset = i64::try_from(from).unwrap_or(i64::MAX);
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);
    qb
}

pub(crate) fn count_query(query: &HubQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM v_media_public");
    push_predicates(&mut qb, query);
    qb
}

fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, query: &HubQuery) {
    let filters = &query.filters;
    qb.push(" WHERE visibility = 'Public' AND status = 'Published'");

    push_any(qb, "\"type\"", &filters.types);
    push_any(qb, "domain", &filters.domain);
    push_any(qb, "business_stage", &filters.stage);
    push_any(qb, "format", &filters.format);

    if filters.popularity_key() == Some(Popularity::EditorsPick.label()) {
        qb.push(" AND popularity = ")
            .push_bind(Popularity::EditorsPick.label().to_string());
    }

    let safe = query.search.trim().replace('%', "");
    if !safe.is_empty() {
        let pattern = format!("%{safe}%");
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR summary ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn push_any(qb: &mut QueryBuilder<'static, Postgres>, column: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    qb.push(" AND ")
        .push(column)
        .push(" = ANY(")
        .push_bind(values.to_vec())
        .push(")");
}
