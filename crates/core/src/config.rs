use serde::Deserialize;

use crate::url_state::DEFAULT_PER_PAGE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub hub_env: String,
    pub api_bind: String,
    pub catalog_url: String,
    pub db_max_connections: u32,
    pub default_per_page: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let database_url =
            std::env::var("HUB_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))?;
        let hub_env = std::env::var("HUB_ENV").unwrap_or_else(|_| "development".to_string());
        let api_bind =
            std::env::var("HUB_API_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let catalog_url = std::env::var("HUB_CATALOG_URL")
            .unwrap_or_else(|_| "http://localhost:3001/shop-api".to_string());
        let db_max_connections = std::env::var("HUB_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let default_per_page = std::env::var("HUB_DEFAULT_PER_PAGE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v >= 1)
            .unwrap_or(DEFAULT_PER_PAGE);

        Ok(Self {
            database_url,
            hub_env,
            api_bind,
            catalog_url,
            db_max_connections,
            default_per_page,
        })
    }
}
