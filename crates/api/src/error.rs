use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use tracing::{error, warn};

use hub_catalog::CatalogError;

use crate::state::RequestId;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    Upstream(String),
    Internal,
}

#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub request_id: String,
}

impl AppError {
    pub fn with_request_id(self, request_id: &str) -> ApiError {
        ApiError {
            error: self,
            request_id: request_id.to_string(),
        }
    }
}

/// Log `err` and turn it into an opaque 500 for `request_id`.
pub fn internal<E: Display>(request_id: &RequestId) -> impl FnOnce(E) -> ApiError + '_ {
    move |err| {
        error!(request_id = %request_id.0, error = %err, "request failed");
        AppError::Internal.with_request_id(&request_id.0)
    }
}

/// Map a catalog failure to 502, keeping the message for the caller.
pub fn upstream(request_id: &RequestId) -> impl FnOnce(CatalogError) -> ApiError + '_ {
    move |err| {
        warn!(request_id = %request_id.0, error = %err, "catalog call failed");
        AppError::Upstream(err.to_string()).with_request_id(&request_id.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self.error {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "rejected", msg)
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Unexpected error".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody {
                    code: code.to_string(),
                    message,
                    request_id: self.request_id,
                },
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_with_request_id() {
        let err = AppError::Internal.with_request_id("req_123");
        assert_eq!(err.request_id, "req_123");
    }

    #[test]
    fn test_bad_request_response() {
        rt().block_on(async {
            let err = AppError::BadRequest("unknown marketplace".to_string())
                .with_request_id("req_001");
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"]["code"], "invalid_request");
            assert_eq!(json["error"]["message"], "unknown marketplace");
            assert_eq!(json["error"]["request_id"], "req_001");
        });
    }

    #[test]
    fn test_unauthorized_response() {
        rt().block_on(async {
            let err = AppError::Unauthorized("sign in to vote".to_string()).with_request_id("req_002");
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(json["error"]["code"], "unauthorized");
            assert_eq!(json["error"]["message"], "sign in to vote");
        });
    }

    #[test]
    fn test_conflict_response() {
        rt().block_on(async {
            let err = AppError::Conflict("You have already voted in this poll".to_string())
                .with_request_id("req_003");
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(json["error"]["code"], "conflict");
        });
    }

    #[test]
    fn test_upstream_keeps_catalog_message() {
        rt().block_on(async {
            let request_id = RequestId("req_004".to_string());
            let err = upstream(&request_id)(CatalogError::GraphQl(vec!["Forbidden".to_string()]));
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(json["error"]["code"], "upstream_error");
            assert_eq!(json["error"]["message"], "catalog query failed: Forbidden");
            assert_eq!(json["error"]["request_id"], "req_004");
        });
    }

    #[test]
    fn test_internal_hides_details() {
        rt().block_on(async {
            let request_id = RequestId("req_005".to_string());
            let err = internal(&request_id)("connection reset by peer");
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(json["error"]["message"], "Unexpected error");
        });
    }

    #[test]
    fn test_rejected_response() {
        rt().block_on(async {
            let err = AppError::Unprocessable("not a member".to_string()).with_request_id("req_006");
            let (status, json) = body_json(err).await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(json["error"]["code"], "rejected");
            assert_eq!(json["error"]["message"], "not a member");
        });
    }
}
