pub mod catalog;
pub mod health;
pub mod knowledge_hub;
pub mod marketplaces;
pub mod polls;
pub mod reports;

use axum::Router;

use crate::state::AppState;

pub fn v1_router(state: AppState) -> Router {
    Router::new()
        .merge(knowledge_hub::router(state.clone()))
        .merge(marketplaces::router(state.clone()))
        .merge(catalog::router(state.clone()))
        .merge(polls::router(state.clone()))
        .merge(reports::router(state))
}

pub fn health_router(state: AppState) -> Router {
    health::router(state)
}
