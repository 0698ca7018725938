//! HTTP error taxonomy.
//!
//! Every handler failure ends up as one of these variants. Unauthorized and
//! NotFound carry fixed messages: a caller never learns which auth check
//! failed, nor whether a note it cannot see exists under another owner.

use crate::db::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const UNAUTHORIZED_MESSAGE: &str = "Invalid authentication credentials";
pub const NOT_FOUND_MESSAGE: &str = "Note not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// Wrong email or password at login
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!("Request failed: {:#}", source);
        }

        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, _) = body_json(ApiError::Validation("bad".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = body_json(ApiError::Conflict("dup".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = body_json(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], UNAUTHORIZED_MESSAGE);

        let (status, _) = body_json(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = ApiError::from(anyhow::anyhow!("disk I/O error at /var/db/notes.db"));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
