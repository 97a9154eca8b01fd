use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_present;

/// Casino and period to score against King IV.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EsgCalculationRequest {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    /// Inclusive period bounds, ISO dates.
    #[validate(required, custom(function = "validate_present"))]
    pub period_start: Option<String>,
    #[validate(required, custom(function = "validate_present"))]
    pub period_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PillarScore {
    pub score: f64,
    pub weighted: f64,
    pub weight: &'static str,
}

/// Per-pillar scores and their weights.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PillarBreakdown {
    pub environmental: PillarScore,
    pub social: PillarScore,
    pub governance: PillarScore,
}

/// King IV governance outcomes, each the mean compliance of its principles.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OutcomeScores {
    pub ethical_culture: f64,
    pub good_performance: f64,
    pub effective_control: f64,
    pub legitimacy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    New,
    Improving,
    Declining,
    Stable,
}

/// Composite compared with the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreTrend {
    pub current: f64,
    pub previous: Option<f64>,
    pub change: Option<f64>,
    pub direction: TrendDirection,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EsgCalculationResponse {
    pub success: bool,
    /// The stored `esg_scores` row.
    #[schema(value_type = Object)]
    pub score: Value,
    pub breakdown: PillarBreakdown,
    pub outcomes: OutcomeScores,
    pub trend: ScoreTrend,
}
