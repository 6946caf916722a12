use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::application::dto::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No image provided")]
    NoImage,
    #[error("Invalid image")]
    InvalidImage,
    #[error("Malformed multipart body")]
    MalformedUpload,
    #[error("Detection failed")]
    DetectionFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoImage | ApiError::InvalidImage | ApiError::MalformedUpload => StatusCode::BAD_REQUEST,
            ApiError::DetectionFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
