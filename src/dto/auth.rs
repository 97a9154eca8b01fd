use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::UserProfile, dto::validation::validate_present};

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required, custom(function = "validate_present"))]
    pub email: Option<String>,
    #[validate(required, custom(function = "validate_present"))]
    pub password: Option<String>,
}

/// Successful sign-in: profile, provider token and the landing page for the role.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
    pub access_token: String,
    pub redirect_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Acknowledgement carrying a human readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}
