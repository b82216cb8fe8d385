//! Error handling for the HTTP layer
//!
//! Every error renders as `{"message": "..."}`. The message is the generic,
//! client-facing text chosen by the handler; the underlying cause is only
//! logged.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed (422)
    #[error("unprocessable entity: {message}")]
    Unprocessable {
        message: String,
        code: String,
        cause: Option<String>,
    },

    /// A storage operation failed (400)
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        code: String,
        cause: Option<String>,
    },

    /// A required path parameter was empty (500)
    #[error("missing parameter: {message}")]
    MissingParameter { message: String, code: String },
}

impl AppError {
    /// Create an unprocessable-entity error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
            code: "unprocessable_entity".to_string(),
            cause: None,
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
            cause: None,
        }
    }

    /// Create a missing path parameter error
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::MissingParameter {
            message: message.into(),
            code: "missing_parameter".to_string(),
        }
    }

    /// Attach the underlying cause for logging. It never reaches the client.
    pub fn with_cause(mut self, err: impl Display) -> Self {
        match &mut self {
            Self::Unprocessable { cause, .. } | Self::BadRequest { cause, .. } => {
                *cause = Some(err.to_string());
            }
            _ => {}
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::MissingParameter { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let (error_code, message, cause) = match self {
            AppError::Unprocessable {
                message,
                code,
                cause,
            }
            | AppError::BadRequest {
                message,
                code,
                cause,
            } => (code, message, cause),
            AppError::MissingParameter { message, code } => (code, message, None),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                cause = cause.as_deref().unwrap_or("-"),
                "request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                cause = cause.as_deref().unwrap_or("-"),
                "request error"
            );
        }

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::unprocessable("request failed").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::bad_request("could not get books").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::missing_parameter("id cannot be empty").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_carries_only_the_message() {
        let response = AppError::bad_request("could not get the book")
            .with_cause("relation \"books\" does not exist")
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "could not get the book" })
        );
    }

    #[tokio::test]
    async fn test_missing_parameter_renders_as_server_error() {
        let response = AppError::missing_parameter("id cannot be empty").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "id cannot be empty" })
        );
    }

    #[test]
    fn test_with_cause_is_ignored_for_parameter_errors() {
        let error = AppError::missing_parameter("id cannot be empty").with_cause("ignored");
        assert!(matches!(error, AppError::MissingParameter { .. }));
    }
}
