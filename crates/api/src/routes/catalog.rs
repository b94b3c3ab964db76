use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::info;

use hub_catalog::schema::{Course, Favorite, PagedList, Product};

use crate::{
    error::{upstream, ApiResult, AppError},
    middleware::auth::{require_user, AuthContext},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/favorite", post(toggle_favorite))
        .route("/v1/courses/{id}", get(get_course))
        .with_state(state)
}

async fn get_product(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .catalog
        .product(&id)
        .await
        .map_err(upstream(&request_id))?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound("product not found".to_string()).with_request_id(&request_id.0)
        })
}

async fn get_course(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> ApiResult<Json<Course>> {
    state
        .catalog
        .course(&id)
        .await
        .map_err(upstream(&request_id))?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound("course not found".to_string()).with_request_id(&request_id.0)
        })
}

async fn toggle_favorite(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> ApiResult<Json<PagedList<Favorite>>> {
    let user = require_user(&auth, &request_id, "sign in to bookmark services")?;

    let favorites = state
        .catalog
        .toggle_favorite(&id, &user.token)
        .await
        .map_err(upstream(&request_id))?;

    info!(
        request_id = %request_id.0,
        user_id = %user.user_id,
        product_id = %id,
        total = favorites.total_items,
        "favorite toggled"
    );
    Ok(Json(favorites))
}
