//! Per-casino software module licensing.
//!
//! Casino-scoped roles see the modules their casino has enabled; platform-wide
//! roles see the whole active catalogue and hold every licence.

use crate::{
    dao::models::{LicensedModule, SoftwareModule, UserProfile},
    dto::{access::CasinoModulesResponse, now_rfc3339},
    error::ServiceError,
    services::access::caller_profile,
    state::SharedState,
};

/// Modules available to one caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleLicence {
    /// `super_admin` and `regulator`: the active catalogue, every slug allowed.
    All(Vec<LicensedModule>),
    /// Casino-scoped roles; `casino_id` is `None` when it could not be resolved.
    Casino {
        casino_id: Option<String>,
        modules: Vec<LicensedModule>,
    },
}

impl ModuleLicence {
    /// True when the caller may use the module identified by `slug`.
    pub fn has_module(&self, slug: &str) -> bool {
        match self {
            ModuleLicence::All(_) => true,
            ModuleLicence::Casino { modules, .. } => modules.iter().any(|module| module.slug == slug),
        }
    }

    fn casino_id(&self) -> Option<&str> {
        match self {
            ModuleLicence::All(_) => None,
            ModuleLicence::Casino { casino_id, .. } => casino_id.as_deref(),
        }
    }

    fn into_modules(self) -> Vec<LicensedModule> {
        match self {
            ModuleLicence::All(modules) | ModuleLicence::Casino { modules, .. } => modules,
        }
    }
}

/// Roles that see every casino and hence every module.
pub fn is_platform_wide(role: &str) -> bool {
    matches!(role, "super_admin" | "regulator")
}

fn catalogue_entry(module: SoftwareModule, enabled_at: &str) -> LicensedModule {
    LicensedModule {
        module_id: module.id,
        name: module.name,
        slug: module.slug,
        description: module.description,
        category: module.category,
        enabled_at: Some(enabled_at.to_string()),
        expires_at: None,
    }
}

/// Resolve the caller's casino and the modules licensed to it.
///
/// A `casino_admin` is bound to the casino on their profile. Staff fall back
/// to the staff row linked to their account. Other roles hold no licence.
pub async fn resolve_licence(
    state: &SharedState,
    user: &UserProfile,
) -> Result<ModuleLicence, ServiceError> {
    let role = user.role.as_str();
    if is_platform_wide(role) {
        let enabled_at = now_rfc3339();
        let modules = state
            .modules()
            .active_catalogue()
            .await?
            .into_iter()
            .map(|module| catalogue_entry(module, &enabled_at))
            .collect();
        return Ok(ModuleLicence::All(modules));
    }

    let casino_id = match role {
        "casino_admin" => user.casino_id.clone(),
        "staff" | "casino_staff" => match &user.casino_id {
            Some(casino_id) => Some(casino_id.clone()),
            None => state.people().staff_casino(&user.id).await?,
        },
        _ => None,
    };
    let modules = match &casino_id {
        Some(casino_id) => state.modules().licensed_for_casino(casino_id).await?,
        None => Vec::new(),
    };
    Ok(ModuleLicence::Casino { casino_id, modules })
}

/// Licensed modules of the caller; an anonymous caller gets an empty list.
pub async fn casino_modules(
    state: &SharedState,
    token: Option<String>,
) -> Result<CasinoModulesResponse, ServiceError> {
    let Some(user) = caller_profile(state, token).await? else {
        return Ok(CasinoModulesResponse {
            success: true,
            role: None,
            casino_id: None,
            all_modules: false,
            modules: Vec::new(),
        });
    };

    let licence = resolve_licence(state, &user).await?;
    Ok(CasinoModulesResponse {
        success: true,
        all_modules: matches!(licence, ModuleLicence::All(_)),
        casino_id: licence
            .casino_id()
            .map(str::to_string)
            .or_else(|| user.casino_id.clone()),
        role: Some(user.role),
        modules: licence.into_modules(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(slug: &str) -> LicensedModule {
        LicensedModule {
            module_id: format!("m-{slug}"),
            name: slug.replace('_', " "),
            slug: slug.into(),
            description: None,
            category: None,
            enabled_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn casino_licence_checks_slugs() {
        let licence = ModuleLicence::Casino {
            casino_id: Some("c1".into()),
            modules: vec![module("player_risk_score")],
        };
        assert!(licence.has_module("player_risk_score"));
        assert!(!licence.has_module("audit_logs"));

        let unresolved = ModuleLicence::Casino {
            casino_id: None,
            modules: Vec::new(),
        };
        assert!(!unresolved.has_module("player_risk_score"));
    }

    #[test]
    fn platform_roles_hold_every_licence() {
        assert!(ModuleLicence::All(Vec::new()).has_module("anything"));
        assert!(is_platform_wide("super_admin"));
        assert!(is_platform_wide("regulator"));
        assert!(!is_platform_wide("casino_admin"));
    }
}
