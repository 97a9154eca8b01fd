use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::post,
};

use crate::{
    dto::{
        extract::{ValidatedJson, bearer_token},
        password::{ResetPasswordRequest, ResetPasswordResponse},
    },
    error::AppError,
    services::password_service::{self, AdminCaller},
    state::SharedState,
};

/// Administrator password resets.
pub fn router() -> Router<SharedState> {
    Router::new().route("/reset-staff-password", post(reset_staff_password))
}

/// Administrator resolved from the `Authorization` header before the body is read.
pub struct Administrator(pub AdminCaller);

impl FromRequestParts<SharedState> for Administrator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);
        let caller = password_service::authorize_admin(state, token).await?;
        Ok(Self(caller))
    }
}

/// Set a new password for a staff member of the caller's casino.
#[utoipa::path(
    post,
    path = "/reset-staff-password",
    tag = "auth",
    params(("Authorization" = String, Header, description = "Bearer token of a casino or super admin")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ResetPasswordResponse),
        (status = 400, description = "Missing field or password too short"),
        (status = 401, description = "Missing or rejected token"),
        (status = 403, description = "Caller is not an administrator or the staff member belongs to another casino"),
        (status = 404, description = "Unknown staff member or auth account"),
        (status = 500, description = "Auth service refused the update")
    )
)]
pub async fn reset_staff_password(
    State(state): State<SharedState>,
    Administrator(caller): Administrator,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    Ok(Json(
        password_service::reset_staff_password(&state, &caller, payload).await?,
    ))
}
