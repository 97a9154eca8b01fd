mod profile_cache;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::{
        auth::AuthProvider, database::Database, esg::EsgRepository,
        integration::IntegrationRepository, modules::ModuleRepository, people::PeopleRepository,
        risk::RiskRepository, wellbeing::WellbeingRepository,
    },
    messaging::WhatsAppGateway,
};

pub use self::profile_cache::{PROFILE_TTL, ProfileCache};

/// Handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: backend handles, configuration and the profile cache.
pub struct AppState {
    db: Arc<dyn Database>,
    auth: Arc<dyn AuthProvider>,
    whatsapp: Arc<dyn WhatsAppGateway>,
    config: AppConfig,
    profiles: ProfileCache,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        db: Arc<dyn Database>,
        auth: Arc<dyn AuthProvider>,
        whatsapp: Arc<dyn WhatsAppGateway>,
        config: AppConfig,
    ) -> SharedState {
        Arc::new(Self {
            db,
            auth,
            whatsapp,
            config,
            profiles: ProfileCache::default(),
        })
    }

    /// Raw storage backend.
    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Hosted auth provider.
    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    /// Gateway used for WhatsApp sends.
    pub fn whatsapp(&self) -> &dyn WhatsAppGateway {
        self.whatsapp.as_ref()
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Profiles resolved for `/auth/me`, keyed by access token.
    pub fn profiles(&self) -> &ProfileCache {
        &self.profiles
    }

    /// Behavioural risk profiles.
    pub fn risk(&self) -> RiskRepository {
        RiskRepository::new(self.db.clone())
    }

    /// ESG scores and their inputs.
    pub fn esg(&self) -> EsgRepository {
        EsgRepository::new(self.db.clone())
    }

    /// Casino integration settings and call log.
    pub fn integrations(&self) -> IntegrationRepository {
        IntegrationRepository::new(self.db.clone())
    }

    /// Software module catalogue and licences.
    pub fn modules(&self) -> ModuleRepository {
        ModuleRepository::new(self.db.clone())
    }

    /// Users, staff and players.
    pub fn people(&self) -> PeopleRepository {
        PeopleRepository::new(self.db.clone())
    }

    /// Wellbeing sessions, scores and invitations.
    pub fn wellbeing(&self) -> WellbeingRepository {
        WellbeingRepository::new(self.db.clone())
    }
}
