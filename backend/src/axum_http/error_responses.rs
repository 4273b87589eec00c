use std::sync::OnceLock;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::{config::stage::Stage, usecases::UseCaseError};

static EXPOSE_INTERNAL_ERRORS: OnceLock<bool> = OnceLock::new();

/// Internal error detail is only sent to clients outside production.
pub fn configure_error_detail(stage: Stage) {
    let _ = EXPOSE_INTERNAL_ERRORS.set(!stage.is_production());
}

fn expose_internal_errors() -> bool {
    EXPOSE_INTERNAL_ERRORS.get().copied().unwrap_or(false)
}

/// Envelope shared by every response: `{code, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, "OK", data)
    }

    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, "Created", data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

pub fn error_envelope(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse::<()> {
        code: status.as_u16(),
        message: message.into(),
        data: None,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            UseCaseError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                if expose_internal_errors() {
                    format!("Internal server error: {err:#}")
                } else {
                    "Internal server error".to_string()
                }
            }
            UseCaseError::Configuration(msg) | UseCaseError::Upstream(msg) => {
                error!(status = status.as_u16(), %msg, "http: request failed");
                msg.clone()
            }
            other => other.to_string(),
        };

        error_envelope(status, message)
    }
}

impl From<JsonRejection> for UseCaseError {
    fn from(rejection: JsonRejection) -> Self {
        UseCaseError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for UseCaseError {
    fn from(rejection: QueryRejection) -> Self {
        UseCaseError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for UseCaseError {
    fn from(rejection: PathRejection) -> Self {
        UseCaseError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn use_case_errors_render_the_envelope() {
        let response = UseCaseError::NotFound("payment not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "payment not found");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn internal_detail_is_hidden_by_default() {
        let response =
            UseCaseError::Internal(anyhow::anyhow!("password authentication failed")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn success_envelope_carries_data() {
        let response = ApiResponse::created(serde_json::json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["code"], 201);
        assert_eq!(body["data"]["id"], 1);
    }
}
