//! Error responses
//!
//! Every failure is answered as `{"detail": "<message>"}`, the shape HTTP
//! clients of the agent already parse.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ha_client::ClientError;
use serde::Serialize;
use thiserror::Error;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be read as the expected JSON
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// The request itself was rejected before anything was forwarded
    #[error("{0}")]
    BadRequest(String),

    /// Home Assistant could not be reached or refused the call
    #[error("{0}")]
    Upstream(#[from] ClientError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
