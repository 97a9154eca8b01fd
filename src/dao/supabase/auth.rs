use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::dao::auth::{AuthError, AuthProvider, AuthSession, AuthUser};

use super::{
    config::SupabaseConfig,
    error::{SupabaseError, SupabaseResult, error_message},
};

const AUTH_PREFIX: &str = "auth/v1";
const ADMIN_PAGE_SIZE: usize = 200;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct UserPage {
    #[serde(default)]
    users: Vec<AuthUser>,
}

/// [`AuthProvider`] backed by the project's GoTrue endpoint.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: Arc<str>,
    service_key: Arc<str>,
    sign_in_key: Arc<str>,
}

impl SupabaseAuth {
    /// Build the HTTP client for the project's auth endpoints.
    pub fn connect(config: &SupabaseConfig) -> SupabaseResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| SupabaseError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url()),
            service_key: Arc::from(config.service_role_key.as_str()),
            sign_in_key: Arc::from(config.sign_in_key()),
        })
    }

    fn request(&self, method: Method, path: &str, key: &str) -> RequestBuilder {
        let url = format!("{}/{AUTH_PREFIX}/{path}", self.base_url);
        self.client.request(method, url).header("apikey", key)
    }

    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path, &self.service_key)
            .bearer_auth(self.service_key.as_ref())
    }

    async fn send(path: &str, builder: RequestBuilder) -> SupabaseResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: path.to_string(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SupabaseError::RequestStatus {
            path: path.to_string(),
            status,
            message: error_message(&body),
        })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(path: &str, response: Response) -> SupabaseResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|source| SupabaseError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }
}

impl AuthProvider for SupabaseAuth {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> BoxFuture<'static, Result<AuthSession, AuthError>> {
        let auth = self.clone();
        let body = json!({ "email": email, "password": password });
        Box::pin(async move {
            let path = "token";
            let builder = auth
                .request(Method::POST, path, &auth.sign_in_key)
                .query(&[("grant_type", "password")])
                .json(&body);
            let response = Self::send(path, builder).await?;
            let token: TokenResponse = Self::decode(path, response).await?;
            Ok(AuthSession {
                access_token: token.access_token,
                user: token.user,
            })
        })
    }

    fn user_for_token(&self, token: &str) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>> {
        let auth = self.clone();
        let token = token.to_string();
        Box::pin(async move {
            let path = "user";
            let builder = auth
                .request(Method::GET, path, &auth.sign_in_key)
                .bearer_auth(&token);
            match Self::send(path, builder).await {
                Ok(response) => Ok(Some(Self::decode(path, response).await?)),
                Err(SupabaseError::RequestStatus { status, .. })
                    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) =>
                {
                    Ok(None)
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> BoxFuture<'static, Result<Option<AuthUser>, AuthError>> {
        let auth = self.clone();
        let email = email.to_lowercase();
        Box::pin(async move {
            let path = "admin/users";
            let mut page = 1usize;
            loop {
                let builder = auth.admin(Method::GET, path).query(&[
                    ("page", page.to_string()),
                    ("per_page", ADMIN_PAGE_SIZE.to_string()),
                ]);
                let response = Self::send(path, builder).await?;
                let UserPage { users } = Self::decode(path, response).await?;
                let fetched = users.len();
                if let Some(user) = users.into_iter().find(|user| {
                    user.email
                        .as_deref()
                        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(&email))
                }) {
                    return Ok(Some(user));
                }
                if fetched < ADMIN_PAGE_SIZE {
                    return Ok(None);
                }
                page += 1;
            }
        })
    }

    fn update_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> BoxFuture<'static, Result<(), AuthError>> {
        let auth = self.clone();
        let path = format!("admin/users/{user_id}");
        let body = json!({ "password": password });
        Box::pin(async move {
            let builder = auth.admin(Method::PUT, &path).json(&body);
            Self::send(&path, builder).await?;
            Ok(())
        })
    }

    fn sign_out(&self, token: &str) -> BoxFuture<'static, Result<(), AuthError>> {
        let auth = self.clone();
        let token = token.to_string();
        Box::pin(async move {
            let path = "logout";
            let builder = auth
                .request(Method::POST, path, &auth.sign_in_key)
                .bearer_auth(&token);
            Self::send(path, builder).await?;
            Ok(())
        })
    }
}
