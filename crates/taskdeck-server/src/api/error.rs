//! HTTP mapping for `TaskdeckError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use taskdeck_core::error::TaskdeckError;

/// Every handler failure is reported as a generic server error.
#[derive(Debug)]
pub struct ApiError(pub TaskdeckError);

impl From<TaskdeckError> for ApiError {
    fn from(e: TaskdeckError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.0.client_code().as_str(),
                "message": self.0.to_string(),
            }
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
