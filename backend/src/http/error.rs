//! HTTP error handling.
//!
//! Every error leaves the service as a VOTable error document so SIA clients
//! can read it the same way as a result.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::db::RepositoryError;
use crate::models::ParamError;
use crate::services::{votable_error, VOTABLE_MEDIA_TYPE};

/// Message returned for failures whose detail must stay in the logs.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid query parameter
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    Repository(RepositoryError),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            AppError::Repository(e) => {
                tracing::error!(error = %e, operation = ?e.context().operation, "repository error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (
            status,
            [(header::CONTENT_TYPE, VOTABLE_MEDIA_TYPE)],
            votable_error(&message),
        )
            .into_response()
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}
