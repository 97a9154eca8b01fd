use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::RiskProfile, dto::validation::validate_present};

/// Behavioural risk profile submitted by the scoring pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewRiskProfile {
    #[validate(required, custom(function = "validate_present"))]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_id: Option<String>,
    /// Overall risk score, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impulse_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub betting_velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatigue_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_shift_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advised_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_triggered: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiskProfileCreated {
    pub success: bool,
    /// Row as persisted, including generated id and timestamp.
    pub profile: RiskProfile,
}

/// Latest profiles of a player, newest first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRiskHistory {
    pub success: bool,
    pub player_id: String,
    pub profiles: Vec<RiskProfile>,
    /// Score of the newest profile, 0 when there is none.
    pub latest_score: f64,
    /// Level of the newest profile, `low` when there is none.
    pub latest_level: String,
}
