use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::{auth::AuthError, storage::StorageError},
    dto::validation::describe_errors,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The database could not serve the request.
    #[error("{0}")]
    Storage(#[source] StorageError),
    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),
    /// Authenticated caller lacks the role or scope for the operation.
    #[error("{0}")]
    Forbidden(String),
    /// Invalid input provided by the client.
    #[error("{message}")]
    InvalidInput {
        message: String,
        details: Option<Value>,
    },
    /// Requested resource was not found.
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },
    /// An external service (auth provider, messaging) failed.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
}

impl ServiceError {
    /// Invalid input without details.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            message: message.into(),
            details: None,
        }
    }

    /// Not found without details.
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    /// Failure of an upstream call, keeping its text as details.
    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        ServiceError::Upstream {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    /// Attach a structured payload to a 400 or 404 error.
    pub fn with_details(self, details: Value) -> Self {
        match self {
            ServiceError::InvalidInput { message, .. } => ServiceError::InvalidInput {
                message,
                details: Some(details),
            },
            ServiceError::NotFound { message, .. } => ServiceError::NotFound {
                message,
                details: Some(details),
            },
            other => other,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(message) => ServiceError::Unauthorized(message),
            unavailable => ServiceError::upstream("Authentication service failure", unavailable),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<Value>,
    },
    /// Unauthorized access attempt.
    #[error("{0}")]
    Unauthorized(String),
    /// Caller is authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },
    /// The path exists but not for this HTTP method.
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Database unreachable.
    #[error("{message}")]
    ServiceUnavailable { message: String, details: String },
    /// Internal or upstream error.
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::BadRequest { details, .. } | AppError::NotFound { details, .. } => {
                details.clone()
            }
            AppError::ServiceUnavailable { details, .. } => Some(Value::String(details.clone())),
            AppError::Internal { details, .. } => details.clone().map(Value::String),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::bad_request(describe_errors(&err))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(StorageError::Unavailable { message, .. }) => {
                AppError::ServiceUnavailable {
                    message: "Database unavailable".into(),
                    details: message,
                }
            }
            ServiceError::Storage(other) => AppError::Internal {
                message: "Database request failed".into(),
                details: Some(other.to_string()),
            },
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::Forbidden(message) => AppError::Forbidden(message),
            ServiceError::InvalidInput { message, details } => {
                AppError::BadRequest { message, details }
            }
            ServiceError::NotFound { message, details } => AppError::NotFound { message, details },
            ServiceError::Upstream { message, details } => AppError::Internal { message, details },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let payload = Json(ErrorBody {
            success: false,
            error: self.to_string(),
            details: self.details(),
        });

        (self.status(), payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unreachable_database_is_503_with_details() {
        let storage = StorageError::unavailable(
            "connection refused".into(),
            std::io::Error::other("refused"),
        );
        let (status, body) = body_of(ServiceError::from(storage).into()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Database unavailable");
        assert_eq!(body["details"], "connection refused");
    }

    #[tokio::test]
    async fn rejected_storage_request_is_500() {
        let storage = StorageError::rejected("esg_scores", "null value in column");
        let (status, body) = body_of(ServiceError::from(storage).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["details"], "null value in column");
    }

    #[tokio::test]
    async fn not_found_keeps_structured_details() {
        let err = ServiceError::not_found("Invalid endpoint")
            .with_details(serde_json::json!({"available_endpoints": ["/metrics"]}));
        let (status, body) = body_of(err.into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Invalid endpoint");
        assert_eq!(body["details"]["available_endpoints"][0], "/metrics");
    }

    #[tokio::test]
    async fn plain_errors_omit_details() {
        let (status, body) = body_of(AppError::Unauthorized("Unauthorized".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("details").is_none());
    }
}
