use anyhow::Context;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod error;
mod middleware;
mod routes;
mod state;

use hub_catalog::CatalogClient;
use hub_core::config::Settings;
use hub_core::coordinator::KnowledgeHub;
use hub_db::PgMediaSource;

use crate::middleware::{auth::session_auth, request_id::request_id};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let settings =
        Settings::from_env().context("DATABASE_URL or HUB_DATABASE_URL must be set")?;

    let db = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.database_url)
        .await?;

    let catalog = CatalogClient::new(settings.catalog_url.clone())?;
    let hub = Arc::new(KnowledgeHub::new(PgMediaSource::new(db.clone())));

    let addr: SocketAddr = settings.api_bind.parse()?;
    let state = AppState {
        db,
        catalog,
        hub,
        settings: Arc::new(settings),
    };

    let v1 = routes::v1_router(state.clone())
        .layer(from_fn_with_state(state.clone(), session_auth));

    let app = Router::new()
        .merge(routes::health_router(state.clone()))
        .merge(v1)
        .layer(from_fn(request_id));

    info!(%addr, env = %state.settings.hub_env, "starting api");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
