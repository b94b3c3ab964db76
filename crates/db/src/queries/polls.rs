use sqlx::PgPool;

use crate::models::{PollOptionRow, PollPost};
use hub_core::polls::VoteAction;

pub async fn get_post(pool: &PgPool, post_id: &str) -> Result<Option<PollPost>, sqlx::Error> {
    sqlx::query_as::<_, PollPost>(
        r#"
        SELECT id::text AS id, created_at, metadata
        FROM posts
        WHERE id::text = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_options(pool: &PgPool, post_id: &str) -> Result<Vec<PollOptionRow>, sqlx::Error> {
    sqlx::query_as::<_, PollOptionRow>(
        r#"
        SELECT id::text AS id, post_id::text AS post_id, option_text, vote_count, created_at
        FROM poll_options
        WHERE post_id::text = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn user_vote(
    pool: &PgPool,
    post_id: &str,
    user_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT option_id::text
        FROM poll_votes
        WHERE post_id::text = $1 AND user_id::text = $2
        LIMIT 1
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Persist a planned vote. A first vote that collides with an existing row
/// fails with a unique violation; see [`crate::is_unique_violation`].
pub async fn record_vote(
    pool: &PgPool,
    post_id: &str,
    user_id: &str,
    action: &VoteAction,
) -> Result<(), sqlx::Error> {
    let (previous, next) = match action {
        VoteAction::Unchanged => return Ok(()),
        VoteAction::Cast { option_id } => (None, option_id.as_str()),
        VoteAction::Change { from, to } => (Some(from.as_str()), to.as_str()),
    };

    let mut tx = pool.begin().await?;

    if let Some(previous) = previous {
        sqlx::query(
            r#"
            DELETE FROM poll_votes
            WHERE post_id::text = $1 AND user_id::text = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE poll_options SET vote_count = GREATEST(vote_count - 1, 0)
            WHERE id::text = $1
            "#,
        )
        .bind(previous)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO poll_votes (post_id, user_id, option_id)
        SELECT p.id, $2::uuid, o.id
        FROM posts p
        JOIN poll_options o ON o.post_id = p.id
        WHERE p.id::text = $1 AND o.id::text = $3
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(next)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE poll_options SET vote_count = vote_count + 1
        WHERE id::text = $1
        "#,
    )
    .bind(next)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}
