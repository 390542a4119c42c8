use axum::{
    Router,
    routing::get,
    Json,
    extract::{State, Path},
    response::Json as ResponseJson,
};
use crate::models::{AppState, JobReport, JobSummary};
use crate::types::AppError;
use super::ApiError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs/{job_id}", get(get_job))
        .route("/api/users/{user_id}/jobs", get(list_jobs))
        .with_state(state)
}

async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<ResponseJson<JobReport>, ApiError> {
    let report = state
        .store
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown job_id: {}", job_id)))?;

    Ok(Json(report))
}

async fn list_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ResponseJson<Vec<JobSummary>>, ApiError> {
    Ok(Json(state.store.list_jobs(&user_id).await?))
}
