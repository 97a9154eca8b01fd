use tracing::warn;

use crate::{
    config::StoreKind,
    dto::health::{HealthResponse, HealthStatus},
    state::SharedState,
};

/// Ping the database and report whether it answered.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = match state.database().health_check().await {
        Ok(()) => HealthStatus::Ok,
        Err(err) => {
            warn!(error = %err, "database health check failed");
            HealthStatus::Degraded
        }
    };
    let store = match state.config().store {
        StoreKind::Supabase => "supabase",
        StoreKind::Memory => "memory",
    };
    HealthResponse { status, store }
}
