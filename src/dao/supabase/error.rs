//! Error types shared by the Supabase REST and auth clients.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::{auth::AuthError, storage::StorageError};

/// Convenient result alias returning [`SupabaseError`] failures.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Failures that can occur while talking to Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Required environment variable is missing.
    #[error("missing Supabase environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Supabase client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send Supabase request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Supabase answered with a non-success status.
    #[error("Supabase returned {status} for `{path}`: {message}")]
    RequestStatus {
        path: String,
        status: StatusCode,
        message: String,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode Supabase response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Response body was received but is not valid JSON.
    #[error("Supabase returned malformed JSON for `{path}`")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SupabaseError> for StorageError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::InvalidJson { path, source } => StorageError::decode(path, source),
            SupabaseError::RequestStatus {
                path,
                status,
                message,
            } if status.is_client_error() => StorageError::rejected(path, message),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

impl From<SupabaseError> for AuthError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::RequestStatus {
                status, message, ..
            } if status.is_client_error() => AuthError::Rejected(message),
            other => AuthError::unavailable(other.to_string(), other),
        }
    }
}

/// Pull the human readable message out of a Supabase error body.
///
/// PostgREST uses `message`, GoTrue uses `msg` or `error_description`.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(
            error_message(r#"{"code":"23502","message":"null value in column"}"#),
            "null value in column"
        );
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message("  gateway timeout "), "gateway timeout");
    }

    #[test]
    fn client_errors_become_rejections() {
        let err = SupabaseError::RequestStatus {
            path: "esg_scores".into(),
            status: StatusCode::BAD_REQUEST,
            message: "bad column".into(),
        };
        assert!(matches!(StorageError::from(err), StorageError::Rejected { .. }));

        let err = SupabaseError::RequestStatus {
            path: "esg_scores".into(),
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".into(),
        };
        assert!(matches!(StorageError::from(err), StorageError::Unavailable { .. }));
    }

    #[test]
    fn malformed_json_is_a_decode_failure() {
        let source = serde_json::from_slice::<serde_json::Value>(b"<html>").unwrap_err();
        let err = SupabaseError::InvalidJson {
            path: "casinos".into(),
            source,
        };
        assert!(matches!(StorageError::from(err), StorageError::Decode { .. }));
    }
}
