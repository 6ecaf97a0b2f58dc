use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;
use crate::api::validation::FieldErrors;
use crate::store::StoreError;

/// Every failure a handler can report; each variant maps to exactly one
/// status code and envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(FieldErrors),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a store failure. Backend detail is logged here and replaced
    /// by `failure` in the response.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Contact not found"),
            StoreError::DuplicateEmail => ApiError::Conflict("Email already exists"),
            other => {
                log::error!("{}: {}", failure, other);
                ApiError::Internal(failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::ValidationFailed(errors) => response::validation_error(errors, status),
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => response::error(message, status),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert!(matches!(
            ApiError::from_store(StoreError::NotFound, "Failed to fetch contact"),
            ApiError::NotFound("Contact not found")
        ));
        assert!(matches!(
            ApiError::from_store(StoreError::DuplicateEmail, "Failed to create contact"),
            ApiError::Conflict("Email already exists")
        ));

        let internal = ApiError::from_store(
            StoreError::Unavailable("connection refused on 10.0.0.3".to_string()),
            "Failed to fetch contacts",
        );
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "Failed to fetch contacts");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ValidationFailed(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("x").status(), StatusCode::CONFLICT);
    }
}
