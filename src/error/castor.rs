use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CastorError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} already exists: {key}")]
    Conflict { kind: &'static str, key: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl CastorError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        CastorError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn conflict(kind: &'static str, key: impl Into<String>) -> Self {
        CastorError::Conflict {
            kind,
            key: key.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CastorError::Validation(message.into())
    }
}

impl IntoResponse for CastorError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CastorError::NotFound { kind, key } => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{kind} not found."),
                    details: Some(json!({ "kind": kind, "key": key })),
                },
            ),

            CastorError::Conflict { kind, key } => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "CONFLICT".to_string(),
                    message: format!("{kind} already exists."),
                    details: Some(json!({ "kind": kind, "key": key })),
                },
            ),

            CastorError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorObject {
                    code: "VALIDATION_ERROR".to_string(),
                    message,
                    details: None,
                },
            ),

            CastorError::JsonError(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorObject {
                    code: "MALFORMED_PAYLOAD".to_string(),
                    message: "Failed to parse payload.".to_string(),
                    details: None,
                },
            ),

            CastorError::StoreUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorObject {
                    code: "STORE_UNAVAILABLE".to_string(),
                    message: "Settings store is unavailable.".to_string(),
                    details: None,
                },
            ),

            CastorError::DatabaseError(_)
            | CastorError::RactorError(_)
            | CastorError::UnexpectedError(_)
            | CastorError::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        let cases = [
            (CastorError::not_found("model", "openai/x"), StatusCode::NOT_FOUND),
            (CastorError::conflict("prompt", "p"), StatusCode::CONFLICT),
            (
                CastorError::validation("id must not be empty"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CastorError::StoreUnavailable("pool closed".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CastorError::UnexpectedError("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn not_found_message_names_kind_and_key() {
        let err = CastorError::not_found("database", "PROD");
        assert_eq!(err.to_string(), "database not found: PROD");
    }
}
