use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;

use hub_catalog::schema::{CourseSummary, Event, PagedList, Product};
use hub_core::facets::{fallback_groups, resolve_groups, FilterGroup};
use hub_core::types::MarketplaceKind;
use hub_core::url_state::HubQuery;

use crate::{
    error::{upstream, ApiResult, AppError},
    routes::knowledge_hub::{filters_for, knowledge_hub_domains},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/marketplaces/{kind}/filters", get(marketplace_filters))
        .route("/v1/marketplaces/{kind}/items", get(marketplace_items))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceFiltersResponse {
    marketplace: MarketplaceKind,
    groups: Vec<FilterGroup>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MarketplaceItems {
    Products(PagedList<Product>),
    Courses(PagedList<CourseSummary>),
    Events(PagedList<Event>),
}

fn parse_kind(raw: &str, request_id: &RequestId) -> ApiResult<MarketplaceKind> {
    raw.parse::<MarketplaceKind>()
        .map_err(|err| AppError::BadRequest(err.to_string()).with_request_id(&request_id.0))
}

async fn marketplace_filters(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(kind): Path<String>,
) -> ApiResult<Json<MarketplaceFiltersResponse>> {
    let kind = parse_kind(&kind, &request_id)?;

    let groups = if kind == MarketplaceKind::KnowledgeHub {
        let domains = knowledge_hub_domains(&state, &request_id).await;
        filters_for(&HubQuery::default(), &domains).groups
    } else {
        let facets = state.catalog.facets().await;
        resolve_groups(kind, facets, || fallback_groups(kind)).map_err(|err| {
            AppError::Upstream(err.to_string()).with_request_id(&request_id.0)
        })?
    };

    Ok(Json(MarketplaceFiltersResponse {
        marketplace: kind,
        groups,
    }))
}

async fn marketplace_items(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(kind): Path<String>,
) -> ApiResult<Json<MarketplaceItems>> {
    let kind = parse_kind(&kind, &request_id)?;

    let items = match kind {
        MarketplaceKind::KnowledgeHub => {
            return Err(AppError::BadRequest(
                "knowledge hub items are served from /v1/knowledge-hub".to_string(),
            )
            .with_request_id(&request_id.0))
        }
        MarketplaceKind::Courses => MarketplaceItems::Courses(
            state.catalog.courses().await.map_err(upstream(&request_id))?,
        ),
        MarketplaceKind::Events => MarketplaceItems::Events(
            state.catalog.events().await.map_err(upstream(&request_id))?,
        ),
        MarketplaceKind::Financial
        | MarketplaceKind::NonFinancial
        | MarketplaceKind::BusinessServices => MarketplaceItems::Products(
            state.catalog.products().await.map_err(upstream(&request_id))?,
        ),
    };

    Ok(Json(items))
}
