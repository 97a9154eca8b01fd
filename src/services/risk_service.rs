use tracing::debug;

use crate::{
    dto::risk::{NewRiskProfile, PlayerRiskHistory, RiskProfileCreated},
    error::ServiceError,
    state::SharedState,
};

/// Number of profiles returned by the history lookup.
pub const HISTORY_LIMIT: usize = 10;

/// Persist a behavioural risk profile and echo the stored row.
pub async fn record_profile(
    state: &SharedState,
    profile: NewRiskProfile,
) -> Result<RiskProfileCreated, ServiceError> {
    let profile = state.risk().insert_profile(&profile).await?;
    debug!(profile_id = %profile.id, player_id = %profile.player_id, "risk profile stored");
    Ok(RiskProfileCreated {
        success: true,
        profile,
    })
}

/// Latest profiles of a player together with the newest score and level.
pub async fn player_history(
    state: &SharedState,
    player_id: &str,
) -> Result<PlayerRiskHistory, ServiceError> {
    let profiles = state
        .risk()
        .recent_for_player(player_id, HISTORY_LIMIT)
        .await?;
    let latest = profiles.first();

    Ok(PlayerRiskHistory {
        success: true,
        player_id: player_id.to_string(),
        latest_score: latest.and_then(|p| p.risk_score).unwrap_or(0.0),
        latest_level: latest
            .and_then(|p| p.risk_level.clone())
            .unwrap_or_else(|| "low".to_string()),
        profiles,
    })
}
