//! Route handlers and request logging.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::server::AppState;
use crate::storage::{COURSES_KEY, DEPARTMENTS_KEY, TIMETABLE_KEY, offerings_key};

/// Error body `{"error": ...}` with a matching status.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Validation(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// GET /
pub async fn home() -> Json<Value> {
    Json(json!({ "home": "🏠" }))
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "pong": "🏓" }))
}

/// GET /scrape
///
/// Runs the full pipeline before answering. A second caller waits for the
/// first run to finish.
pub async fn scrape(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let _guard = state.scrape_lock.lock().await;

    match state.pipeline.run().await {
        Ok(report) => Ok(Json(json!({
            "message": "😅... finished!",
            "report": report,
        }))),
        Err(e) => {
            log::error!("Scrape failed: {e}");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// GET /departments
pub async fn departments(State(state): State<AppState>) -> Result<Response, ApiError> {
    artifact(&state, DEPARTMENTS_KEY).await
}

/// GET /courses
pub async fn courses(State(state): State<AppState>) -> Result<Response, ApiError> {
    artifact(&state, COURSES_KEY).await
}

/// GET /courses/:dept
pub async fn department_courses(
    State(state): State<AppState>,
    Path(dept): Path<String>,
) -> Result<Response, ApiError> {
    artifact(&state, &offerings_key(&dept)).await
}

/// GET /timetable
pub async fn timetable(State(state): State<AppState>) -> Result<Response, ApiError> {
    artifact(&state, TIMETABLE_KEY).await
}

/// Serve a stored artifact verbatim.
async fn artifact(state: &AppState, key: &str) -> Result<Response, ApiError> {
    match state.storage.read_raw(key).await? {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response()),
        None => Err(ApiError::NotFound(format!("{key} has not been scraped yet"))),
    }
}

/// Log method, path, status and elapsed time for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
