use sqlx::PgPool;
use std::sync::Arc;

use hub_catalog::CatalogClient;
use hub_core::config::Settings;
use hub_core::coordinator::KnowledgeHub;
use hub_db::PgMediaSource;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub catalog: CatalogClient,
    pub hub: Arc<KnowledgeHub<PgMediaSource>>,
    pub settings: Arc<Settings>,
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);
