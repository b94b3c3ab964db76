//! Moderation RPCs. Both functions are security-definer procedures on the
//! database side; this module only marshals their arguments.

use sqlx::types::Json;
use sqlx::PgPool;

use hub_core::moderation::{ReportOutcome, ReportRequest, ReportTarget};

pub async fn check_duplicate(
    pool: &PgPool,
    user_id: &str,
    target_type: ReportTarget,
    target_id: &str,
) -> Result<bool, sqlx::Error> {
    let reported: Option<bool> = sqlx::query_scalar(
        r#"
        SELECT check_duplicate_report(p_user_id => $1, p_target_type => $2, p_target_id => $3)
        "#,
    )
    .bind(user_id)
    .bind(target_type.as_str())
    .bind(target_id)
    .fetch_one(pool)
    .await?;
    Ok(reported.unwrap_or(false))
}

pub async fn create_secure(
    pool: &PgPool,
    request: &ReportRequest,
) -> Result<ReportOutcome, sqlx::Error> {
    let outcome: Option<Json<ReportOutcome>> = sqlx::query_scalar(
        r#"
        SELECT to_jsonb(create_report_secure(
            p_user_email => $1,
            p_target_type => $2,
            p_target_id => $3,
            p_community_id => $4,
            p_reason => $5,
            p_post_id => $6,
            p_comment_id => $7
        ))
        "#,
    )
    .bind(&request.user_email)
    .bind(request.target_type.as_str())
    .bind(&request.target_id)
    .bind(&request.community_id)
    .bind(request.reason.as_param())
    .bind(request.post_id())
    .bind(request.comment_id())
    .fetch_one(pool)
    .await?;

    Ok(outcome.map(|Json(o)| o).unwrap_or_default())
}
