//! Application-level configuration loaded from the process environment.

use std::env;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    dao::supabase::{SupabaseConfig, SupabaseError},
    messaging::{TwilioCredentials, twilio::DEFAULT_API_BASE},
};

/// Port used when neither `PORT` nor `SERVER_PORT` is set.
pub const DEFAULT_PORT: u16 = 8080;
/// Base URL of the browser app used in invitation links when `PUBLIC_APP_URL` is unset.
pub const DEFAULT_PUBLIC_APP_URL: &str = "http://localhost:3000";
/// Environment variable selecting the storage backend.
const STORE_ENV: &str = "SAFEBET_STORE";

/// Errors raised for environment values that are present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for `{var}`")]
    InvalidValue { var: &'static str, value: String },
    #[error("`SAFEBET_STORE=supabase` requires the Supabase settings")]
    Supabase(#[source] SupabaseError),
}

/// Which database and auth backends the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Supabase,
    Memory,
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreKind,
    pub supabase: Option<SupabaseConfig>,
    /// Platform-level Twilio account used for wellbeing invitations.
    pub twilio: Option<TwilioCredentials>,
    pub twilio_api_base: String,
    pub public_app_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreKind::Memory,
            supabase: None,
            twilio: None,
            twilio_api_base: DEFAULT_API_BASE.to_string(),
            public_app_url: DEFAULT_PUBLIC_APP_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load the configuration through `lookup`, falling back to the in-memory
    /// store when Supabase is not configured and no store was requested.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let port = match get("PORT").or_else(|| get("SERVER_PORT")) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { var: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let requested = match get(STORE_ENV).map(|value| value.trim().to_ascii_lowercase()) {
            None => None,
            Some(value) if value == "supabase" => Some(StoreKind::Supabase),
            Some(value) if value == "memory" => Some(StoreKind::Memory),
            Some(value) => {
                return Err(ConfigError::InvalidValue {
                    var: STORE_ENV,
                    value,
                });
            }
        };

        let supabase = SupabaseConfig::from_lookup(&lookup);
        let (store, supabase) = match (requested, supabase) {
            (Some(StoreKind::Memory), _) => (StoreKind::Memory, None),
            (_, Ok(config)) => (StoreKind::Supabase, Some(config)),
            (Some(StoreKind::Supabase), Err(err)) => return Err(ConfigError::Supabase(err)),
            (None, Err(err)) => {
                warn!(error = %err, "Supabase not configured; using the in-memory store");
                (StoreKind::Memory, None)
            }
        };

        let twilio = match (
            get("TWILIO_ACCOUNT_SID"),
            get("TWILIO_AUTH_TOKEN"),
            get("TWILIO_WHATSAPP_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(whatsapp_number)) => {
                Some(TwilioCredentials {
                    account_sid,
                    auth_token,
                    whatsapp_number,
                })
            }
            _ => {
                info!("platform Twilio account not configured; invitations are simulated");
                None
            }
        };

        Ok(Self {
            port,
            store,
            supabase,
            twilio,
            twilio_api_base: get("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            public_app_url: get("PUBLIC_APP_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PUBLIC_APP_URL.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn empty_environment_falls_back_to_memory() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.supabase.is_none());
        assert!(config.twilio.is_none());
        assert_eq!(config.public_app_url, DEFAULT_PUBLIC_APP_URL);
    }

    #[test]
    fn supabase_settings_select_supabase_store() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co/"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SERVER_PORT", "9000"),
            ("PUBLIC_APP_URL", "https://app.safebet.example/"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreKind::Supabase);
        assert_eq!(config.port, 9000);
        assert_eq!(config.public_app_url, "https://app.safebet.example");
    }

    #[test]
    fn explicit_supabase_store_requires_settings() {
        let result = AppConfig::from_lookup(lookup(&[("SAFEBET_STORE", "supabase")]));
        assert!(matches!(result, Err(ConfigError::Supabase(_))));

        let result = AppConfig::from_lookup(lookup(&[("SAFEBET_STORE", "redis")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn twilio_needs_every_setting() {
        let partial = AppConfig::from_lookup(lookup(&[("TWILIO_ACCOUNT_SID", "AC1")])).unwrap();
        assert!(partial.twilio.is_none());

        let full = AppConfig::from_lookup(lookup(&[
            ("TWILIO_ACCOUNT_SID", "AC1"),
            ("TWILIO_AUTH_TOKEN", "tok"),
            ("TWILIO_WHATSAPP_NUMBER", "+1555"),
        ]))
        .unwrap();
        assert_eq!(full.twilio.map(|t| t.account_sid).as_deref(), Some("AC1"));
    }
}
