use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::EsgComplianceScore, dto::validation::validate_present};

/// ESG rating submitted for a casino and reporting period.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewEsgScore {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub wellbeing_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub humanity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub recovery_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub carbon_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub total_esg_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esg_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub ethical_revenue_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub intervention_success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub self_correction_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period_end: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EsgScoreCreated {
    pub success: bool,
    pub score: EsgComplianceScore,
}

/// Latest ESG rating of a casino.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CasinoEsgSummary {
    pub success: bool,
    pub casino_id: String,
    pub casino_name: String,
    pub latest_score: Option<EsgComplianceScore>,
    /// `N/A` when the casino has no score yet.
    pub grade: String,
    pub total_score: f64,
}
