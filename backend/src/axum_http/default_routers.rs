use axum::{http::StatusCode, response::IntoResponse};
use tracing::info;

use super::error_responses::{ApiResponse, error_envelope};

pub async fn not_found() -> impl IntoResponse {
    info!("backend router: not_found handler invoked");
    error_envelope(StatusCode::NOT_FOUND, "Not found")
}

pub async fn health_check() -> impl IntoResponse {
    ApiResponse::ok("OK")
}
