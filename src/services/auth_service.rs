//! Sign-in, session lookup and sign-out on top of the hosted auth provider.

use tracing::{debug, warn};

use crate::{
    dao::models::UserProfile,
    dto::{
        auth::{ActionResponse, CurrentUserResponse, LoginRequest, LoginResponse},
        now_rfc3339,
    },
    error::ServiceError,
    state::SharedState,
};

/// Landing page for a platform role.
pub fn redirect_path(role: &str) -> &'static str {
    match role {
        "super_admin" => "/admin",
        "casino_admin" => "/casino/dashboard",
        "regulator" => "/regulator/dashboard",
        "staff" => "/staff/academy",
        _ => "/",
    }
}

async fn load_profile(state: &SharedState, email: &str) -> Result<UserProfile, ServiceError> {
    state
        .people()
        .profile_by_email(email)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Failed to load profile".into()))
}

/// Sign in, load the profile and cache it under the new token.
pub async fn login(
    state: &SharedState,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let session = state.auth().sign_in(&email, &password).await?;
    let profile = load_profile(state, &email).await?;

    if profile.source.as_deref() == Some("users") {
        let people = state.people();
        let user_id = profile.id.clone();
        tokio::spawn(async move {
            if let Err(err) = people.touch_last_login(&user_id, &now_rfc3339()).await {
                warn!(error = %err, user_id = %user_id, "failed to record last login");
            }
        });
    }

    state.profiles().insert(&session.access_token, profile.clone());
    debug!(user_id = %session.user.id, role = %profile.role, "user signed in");

    Ok(LoginResponse {
        success: true,
        redirect_path: redirect_path(&profile.role).to_string(),
        user: profile,
        access_token: session.access_token,
    })
}

/// Profile behind a bearer token, served from the cache while it is fresh.
pub async fn current_profile(
    state: &SharedState,
    token: Option<String>,
) -> Result<CurrentUserResponse, ServiceError> {
    let token =
        token.ok_or_else(|| ServiceError::Unauthorized("Missing authorization header".into()))?;

    if let Some(user) = state.profiles().get(&token) {
        return Ok(CurrentUserResponse {
            success: true,
            user,
        });
    }

    let email = state
        .auth()
        .user_for_token(&token)
        .await?
        .and_then(|user| user.email)
        .ok_or_else(|| ServiceError::Unauthorized("Invalid or expired session".into()))?;
    let user = load_profile(state, &email).await?;
    state.profiles().insert(&token, user.clone());

    Ok(CurrentUserResponse {
        success: true,
        user,
    })
}

/// Evict the cached profile and sign out at the provider.
pub async fn logout(
    state: &SharedState,
    token: Option<String>,
) -> Result<ActionResponse, ServiceError> {
    let token =
        token.ok_or_else(|| ServiceError::Unauthorized("Missing authorization header".into()))?;

    state.profiles().evict(&token);
    if let Err(err) = state.auth().sign_out(&token).await {
        warn!(error = %err, "auth provider sign-out failed");
    }

    Ok(ActionResponse {
        success: true,
        message: "Signed out".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_paths_follow_role() {
        assert_eq!(redirect_path("super_admin"), "/admin");
        assert_eq!(redirect_path("casino_admin"), "/casino/dashboard");
        assert_eq!(redirect_path("regulator"), "/regulator/dashboard");
        assert_eq!(redirect_path("staff"), "/staff/academy");
        assert_eq!(redirect_path("casino_staff"), "/");
        assert_eq!(redirect_path(""), "/");
    }
}
