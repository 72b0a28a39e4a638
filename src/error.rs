use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::r2d2::PoolError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

/// Field name to messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    inner: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.inner.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.inner.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid payload")]
    Validation(ValidationErrors),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Blocking task failed: {0}")]
    Task(#[from] JoinError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedPayload(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotAuthenticated | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Pool(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => AppError::NotFound,
            e => AppError::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

// Ids in paths are integers, anything else cannot name a row.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(errors) => json!(errors),
            AppError::BadRequest(message) => json!({ "errors": message }),
            e @ (AppError::Database(_) | AppError::Pool(_) | AppError::Task(_)) => {
                error!("{e}");
                json!({ "detail": "Internal server error" })
            }
            e => json!({ "detail": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_of(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("tags", "This field is required.");
        errors.add("ingredients", "first");
        errors.add("ingredients", "second");

        let (status, body) = body_of(AppError::Validation(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "ingredients": ["first", "second"], "tags": ["This field is required."] })
        );
    }

    #[tokio::test]
    async fn business_rule_errors_use_errors_key() {
        let (status, body) = body_of(AppError::bad_request("Already subscribed")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": "Already subscribed" }));
    }

    #[tokio::test]
    async fn diesel_not_found_becomes_404() {
        let (status, body) = body_of(diesel::result::Error::NotFound.into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "Not found." }));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) =
            body_of(AppError::Database(diesel::result::Error::RollbackTransaction)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": "Internal server error" }));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_bad_request() {
        let (status, body) = body_of(AppError::MalformedPayload("expected value".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "Malformed payload: expected value" }));
    }

    #[test]
    fn empty_validation_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(AppError::NotAuthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
