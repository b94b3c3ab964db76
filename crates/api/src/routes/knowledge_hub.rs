use axum::{
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use hub_core::coordinator::FetchOutcome;
use hub_core::facets::FilterGroup;
use hub_core::filters::{knowledge_hub_config, narrow_formats, UiSelection};
use hub_core::url_state::HubQuery;

use crate::{
    error::{internal, ApiResult},
    state::{AppState, RequestId},
};

pub const KNOWLEDGE_HUB_PATH: &str = "/v1/knowledge-hub";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(KNOWLEDGE_HUB_PATH, get(list_media))
        .route("/v1/knowledge-hub/filters", get(list_filters))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FiltersResponse {
    pub groups: Vec<FilterGroup>,
    pub active_labels: Vec<String>,
}

async fn list_media(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Response> {
    let query = HubQuery::parse(raw.as_deref().unwrap_or_default(), state.settings.default_per_page);

    let outcome = state
        .hub
        .fetch(&query, Utc::now())
        .await
        .map_err(internal(&request_id))?;

    Ok(match outcome {
        FetchOutcome::Page(page) => Json(page).into_response(),
        FetchOutcome::Redirect { query: clamped } => {
            info!(
                request_id = %request_id.0,
                requested = query.page,
                page = clamped.page,
                "clamping knowledge hub page"
            );
            Redirect::temporary(&location(&clamped)).into_response()
        }
    })
}

async fn list_filters(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Json<FiltersResponse> {
    let query = HubQuery::parse(raw.as_deref().unwrap_or_default(), state.settings.default_per_page);
    let domains = knowledge_hub_domains(&state, &request_id).await;
    Json(filters_for(&query, &domains))
}

/// Domain options from the media table. A failed lookup is logged and
/// leaves the domain group empty rather than failing the request.
pub(crate) async fn knowledge_hub_domains(state: &AppState, request_id: &RequestId) -> Vec<String> {
    domains_or_empty(
        hub_db::queries::media::list_domains(&state.db).await,
        request_id,
    )
}

fn domains_or_empty<E: std::fmt::Display>(
    result: Result<Vec<String>, E>,
    request_id: &RequestId,
) -> Vec<String> {
    match result {
        Ok(domains) => domains,
        Err(err) => {
            warn!(request_id = %request_id.0, error = %err, "domain list unavailable");
            Vec::new()
        }
    }
}

pub(crate) fn filters_for(query: &HubQuery, domains: &[String]) -> FiltersResponse {
    let selection = UiSelection::hydrate(&query.filters);
    FiltersResponse {
        groups: narrow_formats(&knowledge_hub_config(domains), &selection),
        active_labels: selection.active_labels(),
    }
}

/// Canonical URL for a Knowledge Hub query.
pub fn location(query: &HubQuery) -> String {
    format!("{KNOWLEDGE_HUB_PATH}?{}", query.to_query_string())
}
