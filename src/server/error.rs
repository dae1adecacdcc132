use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ServiceError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest { message: String },
    Rejected { status: StatusCode, message: String },
    Internal { message: String },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            HttpError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            HttpError::Rejected { status, message } => (status, message),
            HttpError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidInput(message) => HttpError::BadRequest { message },
            other => HttpError::Internal {
                message: format!("Server Error: {}", other),
            },
        }
    }
}

// Malformed bodies and oversized uploads keep the status axum assigns.
impl From<MultipartError> for HttpError {
    fn from(error: MultipartError) -> Self {
        HttpError::Rejected {
            status: error.status(),
            message: error.body_text(),
        }
    }
}

// Bodies that are not multipart at all, e.g. a missing boundary.
impl From<MultipartRejection> for HttpError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response =
            HttpError::from(ServiceError::InvalidInput("Not video.".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn service_failures_map_to_internal_with_message() {
        let error = HttpError::from(ServiceError::MissingOutput(PathBuf::from("/tmp/work")));
        match &error {
            HttpError::Internal { message } => {
                assert!(message.starts_with("Server Error: "));
                assert!(message.contains("SRT file not found"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
