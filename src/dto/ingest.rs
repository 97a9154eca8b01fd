use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_present;

/// Accepted `contribution_type` values.
pub const CONTRIBUTION_TYPES: &[&str] = &[
    "nrgp",
    "sargf",
    "treatment_program",
    "research",
    "education",
    "other",
];

/// Accepted `period_type` values.
pub const PERIOD_TYPES: &[&str] = &["monthly", "quarterly", "annual"];

/// Responsible-gambling funding paid by a casino.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContributionRequest {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    #[serde(default)]
    pub contribution_type: Option<String>,
    #[serde(default)]
    pub contribution_amount: Option<f64>,
    #[serde(default)]
    pub contribution_date: Option<String>,
    #[serde(default)]
    pub recipient_organization: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One employee responsible-gambling training record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TrainingRecord {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub training_program: Option<String>,
    #[serde(default)]
    pub training_provider: Option<String>,
    #[serde(default)]
    pub training_date: Option<String>,
    /// `completed`, `in_progress` or `scheduled`.
    #[serde(default)]
    pub completion_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_completed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub certificate_issued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_training_due: Option<String>,
}

/// The training endpoint accepts one record or a batch.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TrainingPayload {
    Batch(Vec<TrainingRecord>),
    Single(TrainingRecord),
}

impl TrainingPayload {
    /// Flatten the payload into the records to insert.
    pub fn into_records(self) -> Vec<TrainingRecord> {
        match self {
            TrainingPayload::Batch(records) => records,
            TrainingPayload::Single(record) => vec![record],
        }
    }
}

impl Validate for TrainingPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            TrainingPayload::Batch(records) => records.iter().try_for_each(Validate::validate),
            TrainingPayload::Single(record) => record.validate(),
        }
    }
}

/// Operational figures reported for one period. Absent values are left untouched on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MetricValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nrgp_contribution_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_players_screened: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_players_identified: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interventions_performed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_interventions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_exclusions_active: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_exclusions_new: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees_trained: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_completion_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_hours_delivered: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_gambling_referrals: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helpline_contacts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counseling_sessions_funded: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_investment_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_jobs_created: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_audits_passed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_issues_resolved: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_violations: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewable_energy_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_emissions_tons: Option<f64>,
}

/// Operational ESG metrics of one casino and reporting period.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MetricsRequest {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    #[validate(required, custom(function = "validate_present"))]
    pub reporting_period: Option<String>,
    #[serde(default)]
    pub period_type: Option<String>,
    #[serde(flatten)]
    pub values: MetricValues,
}

/// Acknowledgement of an ingest call with the stored rows.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[schema(value_type = Object)]
    pub data: Value,
}
