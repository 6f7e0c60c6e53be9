//! Mapping from store errors to HTTP responses

use super::views;
use crate::error::AvaliacaoError;
use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Client sent feedback that failed validation
    #[error("Invalid feedback: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(AvaliacaoError),
}

impl From<AvaliacaoError> for ApiError {
    fn from(err: AvaliacaoError) -> Self {
        match err {
            AvaliacaoError::Validation(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other),
        }
    }
}

/// Undecodable form bodies are client mistakes like any other invalid input
impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                warn!("Rejected feedback: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    Html(views::form_page(Some(message.as_str()))),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page(
                        "Something went wrong",
                        "The request could not be completed. Please try again later.",
                    )),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = AvaliacaoError::Validation("attendant name is required".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_internal_error() {
        let err: ApiError = AvaliacaoError::Database("disk I/O error".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
