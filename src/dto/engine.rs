use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Aggregated play statistics the rule-based predictor scores.
///
/// Missing numbers count as zero and an unknown game type is neutral.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PlayerFeatures {
    pub visits: f64,
    pub total_bet: f64,
    pub avg_bet_size: f64,
    pub winnings: f64,
    pub withdrawals: f64,
    pub session_minutes: f64,
    pub game_type: String,
    /// `1` when earlier risk indicators were recorded.
    pub risky_behavior: f64,
}

/// Body of `POST /safeplay-ai-risk-engine/predict`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    #[serde(default)]
    pub features: Option<PlayerFeatures>,
}

/// Body of `POST /safeplay-ai-risk-engine/batch-predict`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchPredictRequest {
    /// Must be an array of `{player_id, features}`.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub players: Option<Value>,
}

/// One entry of a batch request.
#[derive(Debug, Deserialize)]
pub struct BatchPlayer {
    #[serde(default)]
    pub player_id: Value,
    pub features: PlayerFeatures,
}

/// Band of a 0..=100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Critical,
}

/// Points contributed by each factor before the game multiplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RiskFactors {
    pub visits_risk: u32,
    pub bet_size_risk: u32,
    pub session_risk: u32,
    pub loss_risk: u32,
    pub behavior_risk: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Prediction {
    pub risk_score: u32,
    pub risk_label: RiskLabel,
    pub confidence: f64,
    pub factors: RiskFactors,
    pub recommendations: Vec<String>,
}

/// Description of the scoring model.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub training_samples: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: Prediction,
    pub model_info: ModelInfo,
    pub timestamp: String,
}

/// Prediction tagged with the player it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerPrediction {
    #[schema(value_type = Object)]
    pub player_id: Value,
    pub prediction: Prediction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchPredictResponse {
    pub success: bool,
    pub predictions: Vec<PlayerPrediction>,
    pub count: usize,
    pub timestamp: String,
}

/// Static metadata reported by the engine health check.
#[derive(Debug, Serialize, ToSchema)]
pub struct EngineHealth {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: &'static str,
    pub timestamp: String,
}
