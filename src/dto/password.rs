use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::{validate_new_password, validate_present};

/// Body of `POST /reset-staff-password`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(
        required(message = "Missing required fields: staff_email, new_password"),
        custom(function = "validate_present")
    )]
    pub staff_email: Option<String>,
    /// At least six characters.
    #[validate(
        required(message = "Missing required fields: staff_email, new_password"),
        custom(function = "validate_new_password")
    )]
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetPasswordResponse {
    pub success: bool,
    pub message: String,
    pub staff_id: String,
    pub staff_email: String,
}
