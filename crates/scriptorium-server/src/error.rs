use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scriptorium_core::ValidationErrors;
use scriptorium_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Request-scoped error taxonomy, mapped onto HTTP at the edge.
///
/// Unauthorized access is deliberately masked as NotFound on every
/// endpoint except autosave: the surface hides existence rather than
/// admitting there is something to be forbidden from.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("internal error")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ArticleNotFound
            | StoreError::TopicNotFound
            | StoreError::AuthorNotFound => ApiError::NotFound,
            StoreError::TagNotFound(id) => {
                ApiError::Validation(scriptorium_core::FieldError::new(
                    "tags",
                    format!("unknown tag id: {id}"),
                )
                .into())
            }
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::Db(err) => {
                tracing::error!(error = %err, "database error");
                ApiError::Internal
            }
            StoreError::Media(err) => {
                tracing::error!(error = %err, "media store error");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::MalformedInput(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors.errors() })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}
