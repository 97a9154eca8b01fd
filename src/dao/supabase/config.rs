use super::error::{SupabaseError, SupabaseResult};

/// Runtime configuration describing how to reach the Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
    /// Key used for end-user password sign-in; the service key is used when absent.
    pub anon_key: Option<String>,
}

impl SupabaseConfig {
    /// Project URL and service role key; the anon key defaults to the service key.
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            anon_key: None,
        }
    }

    /// Key used for password sign-in.
    pub fn with_anon_key(mut self, anon_key: impl Into<String>) -> Self {
        self.anon_key = Some(anon_key.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`SupabaseConfig::from_env`] but reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SupabaseResult<Self> {
        let non_empty = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(SupabaseError::MissingEnvVar { var })
        };
        let url = non_empty("SUPABASE_URL")?;
        let key = non_empty("SUPABASE_SERVICE_ROLE_KEY")?;

        let mut config = Self::new(url, key);
        if let Ok(anon_key) = non_empty("SUPABASE_ANON_KEY") {
            config = config.with_anon_key(anon_key);
        }
        Ok(config)
    }

    pub(crate) fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub(crate) fn sign_in_key(&self) -> &str {
        self.anon_key.as_deref().unwrap_or(&self.service_role_key)
    }
}
