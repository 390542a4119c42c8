use axum::{
    Router,
    routing::post,
    Json,
    extract::{rejection::JsonRejection, State},
    response::Json as ResponseJson,
};
use crate::agents::DEFAULT_GOAL;
use crate::models::{AppState, JobReport, RunRequest};
use super::ApiError;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/runs", post(start_run))
        .with_state(state)
}

/// Runs the workflow to completion and returns the stored report.
async fn start_run(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<ResponseJson<JobReport>, ApiError> {
    let Json(request) = payload?;
    let goal = request.goal.as_deref().unwrap_or(DEFAULT_GOAL);
    info!(user_id = %request.user_id, "Received run request");

    let report = state.agent.run(&request.user_id, goal).await?;
    Ok(Json(report))
}
