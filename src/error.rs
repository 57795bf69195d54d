use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Directory is not registered for sharing: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Path escapes the shared directory")]
    Traversal,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShareError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShareError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ShareError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShareError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ShareError::Traversal => StatusCode::FORBIDDEN,
            ShareError::NotFound(_) => StatusCode::NOT_FOUND,
            ShareError::InvalidFilename(_) => StatusCode::NOT_FOUND,
            ShareError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = views::error_page(&self.to_string());
        (status, Html(body)).into_response()
    }
}
