//! Seam between the services and the hosted authentication provider.

use std::error::Error;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity known to the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued after a successful password sign-in.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Failures reported by an [`AuthProvider`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider refused the credentials or the operation.
    #[error("{0}")]
    Rejected(String),
    /// The provider could not be reached or answered garbage.
    #[error("auth provider unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl AuthError {
    /// Provider could not be reached.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        AuthError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Operations the backend needs from the authentication service.
pub trait AuthProvider: Send + Sync {
    /// Password sign-in returning a fresh session.
    fn sign_in(&self, email: &str, password: &str)
    -> BoxFuture<'static, Result<AuthSession, AuthError>>;
    /// Resolve an access token; `Ok(None)` when the token is not valid.
    fn user_for_token(&self, token: &str) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>>;
    /// Administrative lookup by email.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>>;
    /// Administrative password change.
    fn update_password(&self, user_id: &str, password: &str)
    -> BoxFuture<'static, Result<(), AuthError>>;
    /// Revoke the session behind `token`.
    fn sign_out(&self, token: &str) -> BoxFuture<'static, Result<(), AuthError>>;
}
