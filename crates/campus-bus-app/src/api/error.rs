use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_bus_types::ValidationError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Bus not found: {0}")]
    BusNotFound(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code(),
            ApiError::MalformedPayload(_) => "malformed_payload",
            ApiError::BusNotFound(_) => "bus_not_found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) | ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::BusNotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = json!({ "error": self.code(), "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}
