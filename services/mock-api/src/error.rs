//! Error responses of the development API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MockApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for MockApiError {
    fn into_response(self) -> Response {
        let status = match self {
            MockApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MockApiError::Forbidden => StatusCode::FORBIDDEN,
            MockApiError::NotFound(_) => StatusCode::NOT_FOUND,
            MockApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MockApiError::Conflict(_) => StatusCode::CONFLICT,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type MockResult<T> = Result<T, MockApiError>;
