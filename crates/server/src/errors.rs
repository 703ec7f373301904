use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::ServiceError;
use tracing::{error, warn};

/// JSON error body shared by every handler: `{"error", "code", "message"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: String,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status, error, code: code.into(), message: message.into() }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, code = %self.code, error = %self.message, "request failed");
        } else {
            warn!(status = %self.status, code = %self.code, error = %self.message, "request rejected");
        }
        let body = serde_json::json!({"error": self.error, "code": self.code, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, error) = match &e {
            ServiceError::AlreadyExists { .. } => (StatusCode::CONFLICT, "Conflict"),
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::ImmutableFieldViolation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable Entity"),
            ServiceError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        Self::new(status, error, e.code(), e.to_string())
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        let ModelError::Validation(msg) = e;
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", "validation", msg)
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", "malformed-body", e.body_text())
    }
}
