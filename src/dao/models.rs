//! Typed projections of the rows this service reads from the managed database.
//!
//! Columns are optional unless the database guarantees them; rows echoed back
//! to API clients keep whatever the database returned for those columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Behavioural risk profile produced by the external scoring service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RiskProfile {
    pub id: String,
    pub player_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub casino_id: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub impulse_level: Option<f64>,
    #[serde(default)]
    pub betting_velocity: Option<f64>,
    #[serde(default)]
    pub session_duration_minutes: Option<f64>,
    #[serde(default)]
    pub reaction_time_ms: Option<f64>,
    #[serde(default)]
    pub fatigue_index: Option<f64>,
    #[serde(default)]
    pub personality_shift_score: Option<f64>,
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub advised_break: Option<bool>,
    #[serde(default)]
    pub intervention_triggered: Option<bool>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

/// Composite ESG rating stored per casino and reporting period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EsgComplianceScore {
    pub id: String,
    pub casino_id: String,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub wellbeing_index: Option<f64>,
    #[serde(default)]
    pub humanity_score: Option<f64>,
    #[serde(default)]
    pub recovery_rate: Option<f64>,
    #[serde(default)]
    pub promo_risk_level: Option<String>,
    #[serde(default)]
    pub carbon_score: Option<f64>,
    #[serde(default)]
    pub total_esg_score: Option<f64>,
    #[serde(default)]
    pub esg_grade: Option<String>,
    #[serde(default)]
    pub ethical_revenue_percentage: Option<f64>,
    #[serde(default)]
    pub intervention_success_rate: Option<f64>,
    #[serde(default)]
    pub self_correction_rate: Option<f64>,
    #[serde(default)]
    pub reporting_period_start: Option<String>,
    #[serde(default)]
    pub reporting_period_end: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Casino identity (`casinos` table).
#[derive(Debug, Clone, Deserialize)]
pub struct Casino {
    pub id: String,
    pub name: String,
}

/// Per-casino third-party integration settings; `credentials` is free-form JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationConfig {
    pub id: String,
    pub casino_id: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub credentials: Value,
}

/// Audit row written after every outbound integration call.
#[derive(Debug, Clone, Serialize)]
pub struct NewApiLog {
    pub config_id: String,
    pub request_type: String,
    pub endpoint: String,
    pub request_payload: Value,
    pub response_status: u16,
    pub response_payload: Value,
    pub response_time_ms: u64,
    pub error_message: Option<String>,
}

/// Platform account row (`users` table).
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub casino_id: Option<String>,
}

/// Casino employee row (`staff` table).
#[derive(Debug, Clone, Deserialize)]
pub struct StaffRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub casino_id: Option<String>,
}

impl StaffRecord {
    /// "First Last", skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Profile returned by the `get_user_by_email_fast` procedure; `source` says
/// whether the row came from `users` or `staff`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub casino_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Casino patron row (`players` table).
#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub casino_id: Option<String>,
}

/// Catalogue entry of a wellbeing mini-game.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConcept {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// Invitation row as inserted, before delivery is attempted.
#[derive(Debug, Clone, Serialize)]
pub struct NewInvitation {
    pub campaign_id: Option<String>,
    pub player_id: String,
    pub game_concept_id: String,
    pub secure_token: String,
    pub channel: String,
    pub sent_at: String,
    pub expires_at: String,
    pub status: String,
}

/// Stored invitation; only the fields read back are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub secure_token: String,
}

/// One play-through of a wellbeing game.
#[derive(Debug, Clone, Deserialize)]
pub struct WellbeingSession {
    pub id: String,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub casino_id: Option<String>,
    #[serde(default)]
    pub game_concept_id: Option<String>,
}

/// One gameplay event captured by a wellbeing mini-game.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TelemetryEvent {
    pub event_type: String,
    #[serde(default)]
    pub decision_speed_ms: Option<f64>,
    #[serde(default)]
    pub risk_level_chosen: Option<String>,
    #[serde(default)]
    pub event_data: Value,
    #[serde(default)]
    pub event_sequence: Option<i64>,
}

/// Operational ESG inputs reported by a casino for one period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsgMetrics {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nrgp_contribution_amount: Option<f64>,
    #[serde(default)]
    pub high_risk_players_identified: Option<f64>,
    #[serde(default)]
    pub interventions_performed: Option<f64>,
    #[serde(default)]
    pub successful_interventions: Option<f64>,
    #[serde(default)]
    pub employees_trained: Option<f64>,
    #[serde(default)]
    pub training_completion_rate: Option<f64>,
    #[serde(default)]
    pub compliance_audits_passed: Option<f64>,
    #[serde(default)]
    pub regulatory_violations: Option<f64>,
    #[serde(default)]
    pub renewable_energy_kwh: Option<f64>,
    #[serde(default)]
    pub carbon_emissions_tons: Option<f64>,
}

/// Self-exclusion registered by a player.
#[derive(Debug, Clone, Deserialize)]
pub struct SelfExclusion {
    #[serde(default)]
    pub counseling_sessions_completed: Option<f64>,
    #[serde(default)]
    pub counseling_sessions_required: Option<f64>,
}

/// Player protection intervention and its outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionIntervention {
    pub intervention_date: String,
    pub created_at: String,
}

/// Submission state of a regulatory ESG report.
#[derive(Debug, Clone, Deserialize)]
pub struct EsgReportStatus {
    #[serde(default)]
    pub status: Option<String>,
}

/// King IV principle joined onto a compliance status row.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipleRef {
    pub id: Value,
}

/// Compliance state of one King IV principle.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceStatus {
    #[serde(default)]
    pub compliance_score: Option<f64>,
}

/// Composite of an earlier scoring period, used for the trend.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviousEsgScore {
    #[serde(default)]
    pub composite_score: Option<f64>,
}

/// Software module licensed to a casino, as returned by `get_casino_modules`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LicensedModule {
    pub module_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub enabled_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Row of the `software_modules` catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct SoftwareModule {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}
