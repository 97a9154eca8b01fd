use serde::Serialize;
use utoipa::ToSchema;

/// Overall state reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The database answered the ping.
    Ok,
    /// The database could not be reached; requests needing it fail with 503.
    Degraded,
}

/// Body of `GET /healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Storage backend in use, `supabase` or `memory`.
    pub store: &'static str,
}
