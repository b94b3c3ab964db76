use sqlx::PgPool;

use crate::models::SessionUser;

pub async fn get_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<SessionUser>, sqlx::Error> {
    sqlx::query_as::<_, SessionUser>(
        r#"
        SELECT user_id::text AS user_id, email, expires_at
        FROM user_sessions
        WHERE token_hash = $1 AND revoked_at IS NULL
        LIMIT 1
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

pub async fn touch(pool: &PgPool, token_hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE user_sessions SET last_seen_at = now()
        WHERE token_hash = $1
        "#,
    )
    .bind(token_hash)
    .execute(pool)
    .await?;
    Ok(())
}
