use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    env: String,
    database: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(err) => {
            warn!(error = %err, "health check could not reach database");
            false
        }
    };
    let (status, body) = report(database_ok, &state.settings.hub_env);
    (status, Json(body))
}

fn report(database_ok: bool, env: &str) -> (StatusCode, HealthResponse) {
    let (status, label, database) = if database_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };
    (
        status,
        HealthResponse {
            status: label,
            env: env.to_string(),
            database,
        },
    )
}
