//! Session-token authentication.
//!
//! A request without an `Authorization` header passes through anonymously;
//! handlers that need a user call [`require_user`]. A header that is present
//! but invalid is rejected outright.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{
    error::{internal, ApiError, ApiResult, AppError},
    state::{AppState, RequestId},
};

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

pub async fn session_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(|| RequestId(String::new()));

    let Some(header_value) = req.headers().get(header::AUTHORIZATION).cloned() else {
        return Ok(next.run(req).await);
    };

    let token = parse_bearer(&header_value)
        .map_err(|err| err.with_request_id(&request_id.0))?
        .to_string();
    let hash = hash_token(&token);

    let session = hub_db::queries::sessions::get_by_token_hash(&state.db, &hash)
        .await
        .map_err(internal(&request_id))?
        .ok_or_else(|| {
            AppError::Unauthorized("invalid session".to_string()).with_request_id(&request_id.0)
        })?;

    if let Some(expires_at) = session.expires_at {
        if expires_at < chrono::Utc::now() {
            return Err(
                AppError::Unauthorized("session expired".to_string()).with_request_id(&request_id.0)
            );
        }
    }

    hub_db::queries::sessions::touch(&state.db, &hash)
        .await
        .map_err(internal(&request_id))?;

    req.extensions_mut().insert(AuthContext {
        user_id: session.user_id,
        email: session.email,
        token,
    });

    Ok(next.run(req).await)
}

/// The signed-in user, or 401 with `message`.
pub fn require_user<'a>(
    auth: &'a Option<axum::Extension<AuthContext>>,
    request_id: &RequestId,
    message: &str,
) -> ApiResult<&'a AuthContext> {
    auth.as_ref()
        .map(|axum::Extension(ctx)| ctx)
        .ok_or_else(|| AppError::Unauthorized(message.to_string()).with_request_id(&request_id.0))
}

fn parse_bearer(value: &HeaderValue) -> Result<&str, AppError> {
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid authorization header".to_string()))?;
    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if scheme != "Bearer" || token.is_empty() {
        return Err(AppError::Unauthorized(
            "invalid authorization header".to_string(),
        ));
    }
    Ok(token)
}

fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        let value = HeaderValue::from_static("Bearer sess_abc");
        assert_eq!(parse_bearer(&value).unwrap(), "sess_abc");
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        for raw in ["Basic abc", "Bearer", "Bearer   ", "sess_abc"] {
            let value = HeaderValue::from_str(raw).unwrap();
            assert!(parse_bearer(&value).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_hash_token_is_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_require_user() {
        let request_id = RequestId("req_1".to_string());
        let anonymous: Option<axum::Extension<AuthContext>> = None;
        assert!(require_user(&anonymous, &request_id, "sign in").is_err());

        let signed_in = Some(axum::Extension(AuthContext {
            user_id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            token: "t".to_string(),
        }));
        assert_eq!(require_user(&signed_in, &request_id, "sign in").unwrap().user_id, "u1");
    }
}
