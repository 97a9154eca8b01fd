//! Staff password reset performed by a casino or platform administrator.

use tracing::{info, warn};

use crate::{
    dto::password::{ResetPasswordRequest, ResetPasswordResponse},
    error::ServiceError,
    state::SharedState,
};

const CASINO_ADMIN: &str = "casino_admin";
const SUPER_ADMIN: &str = "super_admin";

/// Authenticated administrator allowed to reset staff passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCaller {
    pub user_id: String,
    pub email: Option<String>,
    pub role: String,
    /// Casino a `casino_admin` is restricted to; `None` for super admins.
    pub casino_id: Option<String>,
}

impl AdminCaller {
    fn is_casino_admin(&self) -> bool {
        self.role == CASINO_ADMIN
    }
}

/// Resolve the bearer token to an administrator.
///
/// The casino of a `casino_admin` is taken from their staff row, falling back
/// to `users.casino_id`.
pub async fn authorize_admin(
    state: &SharedState,
    token: Option<String>,
) -> Result<AdminCaller, ServiceError> {
    let token =
        token.ok_or_else(|| ServiceError::Unauthorized("Missing authorization header".into()))?;

    let user = match state.auth().user_for_token(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Unauthorized("Unauthorized".into())),
        Err(err) => {
            warn!(error = %err, "token verification failed");
            return Err(ServiceError::Unauthorized("Unauthorized".into()));
        }
    };

    let people = state.people();
    let record = people
        .user_by_id(&user.id)
        .await?
        .filter(|record| record.role == CASINO_ADMIN || record.role == SUPER_ADMIN)
        .ok_or_else(|| {
            ServiceError::Forbidden(
                "Insufficient permissions. Only casino admins can reset passwords.".into(),
            )
        })?;

    let casino_id = if record.role == CASINO_ADMIN {
        let staff_casino = match user.email.as_deref() {
            Some(email) => people
                .staff_by_email(email)
                .await?
                .and_then(|staff| staff.casino_id),
            None => None,
        };
        staff_casino.or(record.casino_id)
    } else {
        None
    };

    Ok(AdminCaller {
        user_id: user.id,
        email: user.email,
        role: record.role,
        casino_id,
    })
}

/// Replace the password of the staff member identified by `staff_email`.
pub async fn reset_staff_password(
    state: &SharedState,
    caller: &AdminCaller,
    request: ResetPasswordRequest,
) -> Result<ResetPasswordResponse, ServiceError> {
    let staff_email = request.staff_email.unwrap_or_default();
    let new_password = request.new_password.unwrap_or_default();

    let staff = state
        .people()
        .staff_by_email(&staff_email)
        .await?
        .ok_or_else(|| ServiceError::not_found("Staff member not found"))?;

    if caller.is_casino_admin() {
        let same_casino = matches!(
            (&caller.casino_id, &staff.casino_id),
            (Some(own), Some(theirs)) if own == theirs
        );
        if !same_casino {
            warn!(
                caller = %caller.user_id,
                staff_id = %staff.id,
                "cross-casino password reset refused"
            );
            return Err(ServiceError::Forbidden(
                "Cannot reset password for staff from another casino".into(),
            ));
        }
    }

    let auth_user = state
        .auth()
        .find_user_by_email(&staff_email)
        .await
        .map_err(|err| ServiceError::upstream("Authentication service failure", err))?
        .ok_or_else(|| ServiceError::not_found("User not found in authentication system"))?;

    state
        .auth()
        .update_password(&auth_user.id, &new_password)
        .await
        .map_err(|err| ServiceError::upstream("Failed to update password", err))?;

    info!(caller = %caller.user_id, staff_id = %staff.id, "staff password reset");

    Ok(ResetPasswordResponse {
        success: true,
        message: format!("Password reset successfully for {}", staff.display_name()),
        staff_id: staff.id,
        staff_email: staff.email,
    })
}
