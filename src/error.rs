use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::response::ErrorResponse;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid form payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to render document: {0}")]
    Render(String),

    /// Raw transport error text.
    #[error("{0}")]
    Delivery(String),

    #[error("Email delivery timed out after {0} ms")]
    DeliveryTimeout(u64),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::MalformedPayload(_) | SubmissionError::Configuration(_) => {
                StatusCode::BAD_REQUEST
            }
            SubmissionError::Render(_) | SubmissionError::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SubmissionError::DeliveryTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::MalformedPayload(_) => "malformed_payload",
            SubmissionError::Configuration(_) => "configuration",
            SubmissionError::Render(_) => "render",
            SubmissionError::Delivery(_) => "delivery",
            SubmissionError::DeliveryTimeout(_) => "delivery_timeout",
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
