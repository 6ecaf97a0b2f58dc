//! Uniform JSON envelope written by every contact endpoint.
//!
//! Success: `{"success": true, "message": ..., "data"?: ...}`
//! Paginated: the success shape plus `"meta": {page, limit, total, total_pages}`
//! Error: `{"success": false, "message": ..., "errors"?: {field: message}}`

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::validation::FieldErrors;
use crate::model::PaginationMeta;

pub const VALIDATION_FAILED: &str = "Validation failed";

/// Written verbatim when even the error envelope cannot be encoded
pub const FALLBACK_BODY: &str = r#"{"success":false,"message":"Internal server error"}"#;

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedBody<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

pub fn success<T: Serialize>(data: Option<T>, message: &str, status: StatusCode) -> Response {
    write_json(
        status,
        &SuccessBody {
            success: true,
            message: message.to_string(),
            data,
        },
    )
}

pub fn error(message: &str, status: StatusCode) -> Response {
    write_json(
        status,
        &ErrorBody {
            success: false,
            message: message.to_string(),
            errors: None,
        },
    )
}

pub fn validation_error(errors: FieldErrors, status: StatusCode) -> Response {
    write_json(
        status,
        &ErrorBody {
            success: false,
            message: VALIDATION_FAILED.to_string(),
            errors: Some(errors),
        },
    )
}

pub fn paginated<T: Serialize>(
    data: Vec<T>,
    meta: PaginationMeta,
    message: &str,
    status: StatusCode,
) -> Response {
    write_json(
        status,
        &PaginatedBody {
            success: true,
            message: message.to_string(),
            data,
            meta,
        },
    )
}

/// Encode `body` as the response. An encoding failure becomes a 500 error
/// envelope; if that fails too the fixed literal is sent, so this never
/// recurses more than once.
pub fn write_json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_bytes(status, bytes),
        Err(err) => {
            log::error!("Failed to encode response body: {}", err);
            let fallback = ErrorBody {
                success: false,
                message: "Failed to encode response".to_string(),
                errors: None,
            };
            match serde_json::to_vec(&fallback) {
                Ok(bytes) => json_bytes(StatusCode::INTERNAL_SERVER_ERROR, bytes),
                Err(_) => json_bytes(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FALLBACK_BODY.as_bytes().to_vec(),
                ),
            }
        }
    }
}

fn json_bytes(status: StatusCode, bytes: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        Body::from(bytes),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[tokio::test]
    async fn test_success_omits_absent_data() {
        let response = success::<()>(None, "Contact deleted successfully", StatusCode::OK);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({"success": true, "message": "Contact deleted successfully"})
        );
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let mut errors = FieldErrors::new();
        errors.insert("name".to_string(), "name is required".to_string());

        let response = validation_error(errors, StatusCode::BAD_REQUEST);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["name"], "name is required");
    }

    #[tokio::test]
    async fn test_paginated_carries_success_flag_and_meta() {
        let meta = PaginationMeta {
            page: 2,
            limit: 10,
            total: 25,
            total_pages: 3,
        };
        let body = body_json(paginated(vec![1, 2, 3], meta, "ok", StatusCode::OK)).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["meta"]["total_pages"], 3);
    }

    #[tokio::test]
    async fn test_encoding_failure_becomes_internal_error() {
        let response = success(Some(Unencodable), "never sent", StatusCode::CREATED);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to encode response");
    }

    #[test]
    fn test_fallback_literal_is_valid_json() {
        let body: ErrorBody = serde_json::from_str(FALLBACK_BODY).unwrap();
        assert!(!body.success);
    }
}
