use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    dto::{
        auth::{ActionResponse, CurrentUserResponse, LoginRequest, LoginResponse},
        extract::{ValidatedJson, bearer_token},
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Login flow backed by the hosted auth service.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; includes the landing page for the role", body = LoginResponse),
        (status = 401, description = "Invalid credentials or missing profile")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses(
        (status = 200, description = "Current profile", body = CurrentUserResponse),
        (status = 401, description = "Missing or expired token")
    )
)]
pub async fn me(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, AppError> {
    Ok(Json(
        auth_service::current_profile(&state, bearer_token(&headers)).await?,
    ))
}

/// Drop the cached profile and end the provider session.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Signed out", body = ActionResponse))
)]
pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        auth_service::logout(&state, bearer_token(&headers)).await?,
    ))
}
