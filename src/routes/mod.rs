//! API Routes
//!
//! - `/` - Web form that triggers a run and renders the report
//! - `/api/runs` - Run the workflow for a user and goal
//! - `/api/jobs/{job_id}` - Fetch one stored report
//! - `/api/users/{user_id}/jobs` - A user's job history
//! - `/api/health` - Health check

pub mod runs;
pub mod jobs;
pub mod health;
pub mod ui;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use crate::agents::RunError;
use crate::middleware::apply_cors;
use crate::models::{AppState, ErrorResponse};
use crate::types::AppError;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(runs::router(state.clone()))
        .merge(jobs::router(state.clone()))
        .merge(health::router(state));

    let router = Router::new()
        .merge(api_router)
        .merge(ui::router())
        .layer(TraceLayer::new_for_http());

    apply_cors(router)
}

/// JSON error body with a status derived from the error kind.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Search(_) | AppError::Generation(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            status: status_for(&error),
            body: ErrorResponse {
                error: error.to_string(),
                kind: error.kind().to_string(),
                job_id: None,
            },
        }
    }
}

impl From<RunError> for ApiError {
    fn from(error: RunError) -> Self {
        let mut api_error = ApiError::from(error.source);
        api_error.body.job_id = error.job_id;
        api_error
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::from(AppError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
