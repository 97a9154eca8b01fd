use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::LicensedModule;

/// Decision of the module guard for the calling user.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleAccessResponse {
    pub success: bool,
    pub module: String,
    /// Functional role of the caller, if any.
    pub role: Option<String>,
    pub granted: bool,
    /// Whether the caller's casino licenses the module; always true for
    /// platform-wide roles.
    pub licensed: bool,
    /// Fallback text shown instead of the module when access is refused.
    pub message: Option<String>,
    pub required_roles: Vec<String>,
}

/// Allowed functional roles of one module.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModulePermissions {
    pub module: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleTableResponse {
    pub success: bool,
    pub modules: Vec<ModulePermissions>,
}

/// Outcome of the casino administration page guard.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageGuardResponse {
    pub success: bool,
    pub granted: bool,
    /// Page the caller is sent to when not granted.
    pub redirect_to: Option<String>,
}

/// Software modules the caller's casino may use.
#[derive(Debug, Serialize, ToSchema)]
pub struct CasinoModulesResponse {
    pub success: bool,
    /// Platform role of the caller, if signed in.
    pub role: Option<String>,
    pub casino_id: Option<String>,
    /// Platform-wide roles see the whole active catalogue.
    pub all_modules: bool,
    pub modules: Vec<LicensedModule>,
}
