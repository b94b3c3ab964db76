use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use hub_core::polls::{is_ended, plan_vote, PollError, PollOption, PollSummary};

use crate::{
    error::{internal, ApiError, ApiResult, AppError},
    middleware::auth::{require_user, AuthContext},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/polls/{post_id}", get(get_poll))
        .route("/v1/polls/{post_id}/votes", post(cast_vote))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    option_id: String,
}

struct LoadedPoll {
    post: hub_db::models::PollPost,
    options: Vec<PollOption>,
}

async fn load_poll(state: &AppState, post_id: &str, request_id: &RequestId) -> ApiResult<LoadedPoll> {
    let post = hub_db::queries::polls::get_post(&state.db, post_id)
        .await
        .map_err(internal(request_id))?
        .ok_or_else(|| AppError::NotFound("poll not found".to_string()).with_request_id(&request_id.0))?;

    let options: Vec<PollOption> = hub_db::queries::polls::list_options(&state.db, post_id)
        .await
        .map_err(internal(request_id))?
        .into_iter()
        .map(PollOption::from)
        .collect();

    if options.is_empty() {
        return Err(poll_error(PollError::NoOptions, request_id));
    }

    Ok(LoadedPoll { post, options })
}

fn poll_error(err: PollError, request_id: &RequestId) -> ApiError {
    let message = err.to_string();
    let error = match err {
        PollError::Ended | PollError::AlreadyVoted => AppError::Conflict(message),
        PollError::UnknownOption => AppError::BadRequest(message),
        PollError::NoOptions => AppError::NotFound(message),
    };
    error.with_request_id(&request_id.0)
}

async fn get_poll(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Extension(request_id): Extension<RequestId>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PollSummary>> {
    let poll = load_poll(&state, &post_id, &request_id).await?;

    let user_vote = match auth.as_ref() {
        Some(Extension(user)) => hub_db::queries::polls::user_vote(&state.db, &post_id, &user.user_id)
            .await
            .map_err(internal(&request_id))?,
        None => None,
    };

    Ok(Json(PollSummary::build(
        &poll.options,
        poll.post.created_at,
        &poll.post.poll_metadata(),
        user_vote,
        Utc::now(),
    )))
}

async fn cast_vote(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Extension(request_id): Extension<RequestId>,
    Path(post_id): Path<String>,
    Json(payload): Json<VoteRequest>,
) -> ApiResult<Json<PollSummary>> {
    let user = require_user(&auth, &request_id, "You must be logged in to vote")?;
    let poll = load_poll(&state, &post_id, &request_id).await?;
    let metadata = poll.post.poll_metadata();
    let now = Utc::now();

    let current = hub_db::queries::polls::user_vote(&state.db, &post_id, &user.user_id)
        .await
        .map_err(internal(&request_id))?;

    let action = plan_vote(
        &poll.options,
        current.as_deref(),
        &payload.option_id,
        is_ended(poll.post.created_at, &metadata, now),
    )
    .map_err(|err| poll_error(err, &request_id))?;

    if let Err(err) =
        hub_db::queries::polls::record_vote(&state.db, &post_id, &user.user_id, &action).await
    {
        if hub_db::is_unique_violation(&err) {
            return Err(poll_error(PollError::AlreadyVoted, &request_id));
        }
        return Err(internal(&request_id)(err));
    }

    info!(
        request_id = %request_id.0,
        post_id = %post_id,
        option_id = %payload.option_id,
        action = ?action,
        "poll vote recorded"
    );

    // re-read: other voters may have moved the counts
    let refreshed = load_poll(&state, &post_id, &request_id).await?;
    Ok(Json(PollSummary::build(
        &refreshed.options,
        refreshed.post.created_at,
        &metadata,
        Some(payload.option_id),
        now,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use axum::http::StatusCode;

    #[test]
    fn test_poll_error_statuses() {
        let request_id = RequestId("req_1".to_string());
        let cases = [
            (PollError::Ended, StatusCode::CONFLICT),
            (PollError::AlreadyVoted, StatusCode::CONFLICT),
            (PollError::UnknownOption, StatusCode::BAD_REQUEST),
            (PollError::NoOptions, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(poll_error(err, &request_id).into_response().status(), status);
        }
    }

    #[test]
    fn test_vote_request_body() {
        let body: VoteRequest = serde_json::from_str(r#"{"optionId":"opt_2"}"#).unwrap();
        assert_eq!(body.option_id, "opt_2");
    }
}
