use axum::{Router, routing::get, Json, extract::State, response::Json as ResponseJson};
use crate::db::health_check;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    let database = match health_check(state.store.pool()).await {
        Ok(true) => "connected",
        _ => "unavailable",
    };

    let response = HealthResponse {
        status: if database == "connected" { "ok" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: database.to_string(),
    };

    Json(response)
}
