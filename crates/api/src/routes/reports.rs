use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};
use serde::Serialize;
use tracing::{info, warn};

use hub_core::moderation::{NewReport, ReportRequest};

use crate::{
    error::{internal, ApiResult, AppError},
    middleware::auth::{require_user, AuthContext},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/reports", post(create_report))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    status: &'static str,
    message: &'static str,
}

async fn create_report(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<NewReport>,
) -> ApiResult<(StatusCode, Json<ReportResponse>)> {
    let user = require_user(&auth, &request_id, "You must be logged in to report content")?;

    let request = ReportRequest::from_new(&user.email, payload)
        .map_err(|err| AppError::BadRequest(err.to_string()).with_request_id(&request_id.0))?;

    let already_reported = match hub_db::queries::reports::check_duplicate(
        &state.db,
        &user.user_id,
        request.target_type,
        &request.target_id,
    )
    .await
    {
        Ok(reported) => reported,
        Err(err) => {
            warn!(request_id = %request_id.0, error = %err, "duplicate report check failed");
            false
        }
    };
    if already_reported {
        return Err(AppError::Conflict(format!(
            "You have already reported this {}",
            request.target_type
        ))
        .with_request_id(&request_id.0));
    }

    let outcome = hub_db::queries::reports::create_secure(&state.db, &request)
        .await
        .map_err(internal(&request_id))?;

    if let Some(message) = outcome.failure_message() {
        return Err(AppError::Unprocessable(message).with_request_id(&request_id.0));
    }

    info!(
        request_id = %request_id.0,
        target_type = %request.target_type,
        target_id = %request.target_id,
        "report submitted"
    );
    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            status: "submitted",
            message: "Thank you. Your report has been submitted for review by our moderation team.",
        }),
    ))
}
