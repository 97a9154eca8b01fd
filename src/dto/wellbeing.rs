use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_present;

/// Session to score.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RiskCalculationRequest {
    #[validate(
        required(message = "session_id is required"),
        custom(function = "validate_present")
    )]
    pub session_id: Option<String>,
}

/// Factors, recommendations and confidence behind a score.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskExplanation {
    pub factors: Vec<String>,
    /// Percentage, grows with the number of captured events.
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

/// Behavioural scores derived from one wellbeing game session.
///
/// Sub-scores are 0 to 100. Higher patience and recovery are better; the
/// combined index is higher for riskier play.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WellbeingRiskScore {
    pub behaviour_risk_index: f64,
    pub impulsivity_score: f64,
    pub risk_escalation_score: f64,
    pub patience_score: f64,
    pub recovery_response_score: f64,
    pub explanation: RiskExplanation,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiskCalculationResponse {
    pub success: bool,
    pub risk_score: WellbeingRiskScore,
}
