use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use nanoid::nanoid;
use tracing::{info_span, Instrument};

use crate::state::RequestId;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_INBOUND_LEN: usize = 64;

/// Tag every request with an id, reusing a well-formed one from the caller,
/// and echo it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id =
        inbound_request_id(req.headers()).unwrap_or_else(|| format!("req_{}", nanoid!(16)));
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let mut resp = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }
    resp
}

fn inbound_request_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(&REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let valid = value.starts_with("req_")
        && value.len() <= MAX_INBOUND_LEN
        && value[4..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    (valid && value.len() > 4).then(|| value.to_string())
}
