//! Module-level role guard and the casino administration page guard.

use crate::{
    dao::models::UserProfile,
    dto::access::{ModuleAccessResponse, ModulePermissions, ModuleTableResponse, PageGuardResponse},
    error::ServiceError,
    services::{auth_service, licensing},
    state::SharedState,
};

/// Functional roles allowed per dashboard module.
pub const MODULE_PERMISSIONS: &[(&str, &[&str])] = &[
    (
        "player_risk_score",
        &["SUPPORT", "COMPLIANCE", "RISK_ANALYST", "REGULATOR"],
    ),
    (
        "operational_alerts",
        &["SUPPORT", "COMPLIANCE", "RISK_ANALYST"],
    ),
    ("interventions", &["COMPLIANCE", "RISK_ANALYST"]),
    ("behavioral_risk_intelligence", &["RISK_ANALYST", "REGULATOR"]),
    ("esg_dashboard", &["EXECUTIVE", "RISK_ANALYST", "REGULATOR"]),
    ("casino_comparison", &["EXECUTIVE", "REGULATOR"]),
    ("financial_reports", &["EXECUTIVE"]),
    ("demo_mode", &["RISK_ANALYST", "EXECUTIVE", "REGULATOR"]),
    (
        "compliance_overview",
        &["COMPLIANCE", "RISK_ANALYST", "REGULATOR"],
    ),
    ("audit_logs", &["REGULATOR"]),
];

const UNAUTHENTICATED_MESSAGE: &str =
    "Authentication required. Please log in to access this content.";

/// Allowed roles for a module; unknown modules allow nobody.
pub fn allowed_roles(module: &str) -> &'static [&'static str] {
    MODULE_PERMISSIONS
        .iter()
        .find(|(name, _)| *name == module)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

/// Outcome of the module guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDecision {
    /// Module may be opened.
    Granted,
    /// No valid session.
    Unauthenticated,
    /// Functional role not listed for the module.
    Denied {
        role: Option<String>,
        required: &'static [&'static str],
    },
    /// The role may open the module but the caller's casino does not license it.
    Unlicensed,
}

impl ModuleDecision {
    /// Text rendered in place of the module when access is refused.
    pub fn fallback_message(&self, module: &str) -> Option<String> {
        match self {
            ModuleDecision::Granted => None,
            ModuleDecision::Unauthenticated => Some(UNAUTHENTICATED_MESSAGE.to_string()),
            ModuleDecision::Denied { role, required } => Some(format!(
                "Access Restricted: Your role ({}) does not have permission to view this {module}. Required roles: {}",
                role.as_deref().unwrap_or("Unknown"),
                required.join(", ")
            )),
            ModuleDecision::Unlicensed => Some(format!(
                "Module Not Licensed: {module} is not enabled for your casino. Contact your administrator to enable it."
            )),
        }
    }

    /// Downgrade a role grant when the module is not licensed to the caller.
    pub fn with_licence(self, licensed: bool) -> Self {
        match self {
            ModuleDecision::Granted if !licensed => ModuleDecision::Unlicensed,
            other => other,
        }
    }
}

/// Decide whether a user with the given functional role may open `module`.
pub fn check_module(user: Option<&UserProfile>, module: &str) -> ModuleDecision {
    let Some(user) = user else {
        return ModuleDecision::Unauthenticated;
    };
    let required = allowed_roles(module);
    match user.user_role.as_deref() {
        Some(role) if required.contains(&role) => ModuleDecision::Granted,
        role => ModuleDecision::Denied {
            role: role.map(str::to_string),
            required,
        },
    }
}

/// Page the casino administration area sends a platform role to; `None` when granted.
pub fn casino_admin_redirect(role: Option<&str>) -> Option<&'static str> {
    match role {
        Some("casino_admin" | "super_admin") => None,
        Some("casino_staff") => Some("/staff/academy"),
        Some("regulator") => Some("/regulator/dashboard"),
        _ => Some("/login"),
    }
}

/// Role table of every dashboard module.
pub fn module_table() -> ModuleTableResponse {
    ModuleTableResponse {
        success: true,
        modules: MODULE_PERMISSIONS
            .iter()
            .map(|(module, roles)| ModulePermissions {
                module: module.to_string(),
                roles: roles.iter().map(|role| role.to_string()).collect(),
            })
            .collect(),
    }
}

/// Profile of the caller, `None` when the token is missing or not accepted.
pub(crate) async fn caller_profile(
    state: &SharedState,
    token: Option<String>,
) -> Result<Option<UserProfile>, ServiceError> {
    match auth_service::current_profile(state, token).await {
        Ok(response) => Ok(Some(response.user)),
        Err(ServiceError::Unauthorized(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Role and licence check of the caller for one module.
pub async fn module_access(
    state: &SharedState,
    token: Option<String>,
    module: &str,
) -> Result<ModuleAccessResponse, ServiceError> {
    let user = caller_profile(state, token).await?;
    let licensed = match &user {
        Some(user) => licensing::resolve_licence(state, user)
            .await?
            .has_module(module),
        None => false,
    };
    let decision = check_module(user.as_ref(), module).with_licence(licensed);

    Ok(ModuleAccessResponse {
        success: true,
        module: module.to_string(),
        role: user.and_then(|user| user.user_role),
        granted: decision == ModuleDecision::Granted,
        licensed,
        message: decision.fallback_message(module),
        required_roles: allowed_roles(module)
            .iter()
            .map(|role| role.to_string())
            .collect(),
    })
}

/// Where the casino administration page sends the caller, if anywhere.
pub async fn casino_admin_guard(
    state: &SharedState,
    token: Option<String>,
) -> Result<PageGuardResponse, ServiceError> {
    let user = caller_profile(state, token).await?;
    let redirect = casino_admin_redirect(user.as_ref().map(|user| user.role.as_str()));

    Ok(PageGuardResponse {
        success: true,
        granted: redirect.is_none(),
        redirect_to: redirect.map(str::to_string),
    })
}
